//! 원격 소스 통합 테스트
//!
//! mockito 서버로 KRX, ECOS, FRED, 미국 종목 목록 응답을 흉내 냅니다.

use std::sync::Arc;

use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use rust_decimal_macros::dec;
use snowball_core::{AppConfig, LookbackWindow, MarketCategory, SeriesFrame};
use snowball_data::provider::{EcosClient, FredClient, KrxClient};
use snowball_data::{
    usd_krw_ohlc, AdapterRequest, DataError, EcosAdapter, FredAdapter, KrxEquityAdapter,
    KrxIndexAdapter, SourceAdapter, SourceRegistry, SymbolDirectory, TimeSeries,
};

const ITEM_LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<StatisticItemList>
<list_total_count>3</list_total_count>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME>원/달러(종가)</ITEM_NAME>
<ITEM_CODE>0000003</ITEM_CODE>
<CYCLE>D</CYCLE>
<START_TIME>19640504</START_TIME>
<END_TIME>20240105</END_TIME>
<DATA_CNT>100</DATA_CNT>
</row>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME>원/달러(종가)</ITEM_NAME>
<ITEM_CODE>0000013</ITEM_CODE>
<CYCLE>D</CYCLE>
<START_TIME>19640504</START_TIME>
<END_TIME>20240105</END_TIME>
<DATA_CNT>200</DATA_CNT>
</row>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME>원/엔(100엔)</ITEM_NAME>
<ITEM_CODE>0000002</ITEM_CODE>
<CYCLE>D</CYCLE>
<START_TIME>19640504</START_TIME>
<END_TIME>20240105</END_TIME>
<DATA_CNT>300</DATA_CNT>
</row>
</StatisticItemList>"#;

const SEARCH_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<StatisticSearch>
<list_total_count>3</list_total_count>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME1>원/달러(종가)</ITEM_NAME1>
<TIME>20221230</TIME>
<DATA_VALUE>1,264.5</DATA_VALUE>
</row>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME1>원/달러(종가)</ITEM_NAME1>
<TIME>20240103</TIME>
<DATA_VALUE>1,301.5</DATA_VALUE>
</row>
<row>
<STAT_CODE>731Y003</STAT_CODE>
<ITEM_NAME1>원/달러(종가)</ITEM_NAME1>
<TIME>20240104</TIME>
<DATA_VALUE>1,310</DATA_VALUE>
</row>
</StatisticSearch>"#;

const TABLE_LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<StatisticTableList>
<list_total_count>2</list_total_count>
<row>
<STAT_CODE>817Y002</STAT_CODE>
<STAT_NAME>1.3.2.2. 시장금리(일별)</STAT_NAME>
<CYCLE>D</CYCLE>
<SRCH_YN>Y</SRCH_YN>
<ORG_NAME>한국은행</ORG_NAME>
</row>
<row>
<STAT_CODE>0000000001</STAT_CODE>
<STAT_NAME>1. 통화/금융</STAT_NAME>
<CYCLE></CYCLE>
<SRCH_YN>N</SRCH_YN>
<ORG_NAME></ORG_NAME>
</row>
</StatisticTableList>"#;

const NO_DATA_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<RESULT>
<CODE>INFO-200</CODE>
<MESSAGE>해당하는 데이터가 없습니다.</MESSAGE>
</RESULT>"#;

const US_LISTING: &str = "\
Nasdaq Traded|Symbol|Security Name|Listing Exchange|Market Category|ETF|Round Lot Size|Test Issue|Financial Status|CQS Symbol|NASDAQ Symbol|NextShares
Y|AAPL|Apple Inc. - Common Stock|Q|Q|N|100|N|N||AAPL|N
Y|SPY|SPDR S&P 500 ETF Trust|P| |Y|100|N||SPY|SPY|N
File Creation Time: 0105202422:00|||||||||||
";

fn config(server: &ServerGuard) -> AppConfig {
    let mut config = AppConfig::default();
    config.sources.krx_base_url = server.url();
    config.sources.ecos_base_url = server.url();
    config.sources.ecos_api_key = "testkey".to_string();
    config.sources.fred_base_url = format!("{}/fredgraph.csv", server.url());
    config.sources.us_listing_url = format!("{}/nasdaqtraded.txt", server.url());
    config.sources.request_timeout_secs = 5;
    config
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
}

fn request(ticker: &str, label: Option<&str>) -> AdapterRequest {
    AdapterRequest::new(
        ticker,
        label.map(str::to_string),
        LookbackWindow::new(as_of(), 1),
        1,
    )
}

#[tokio::test]
async fn test_krx_equity_adapter_repairs_halted_rows() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("MDCSTAT01701".to_string()),
            Matcher::Regex("isuCd=KR7005930003".to_string()),
            Matcher::Regex("strtDd=20230105".to_string()),
            Matcher::Regex("endDd=20240105".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"output":[
                {"TRD_DD":"2024/01/04","TDD_OPNPRC":"0","TDD_HGPRC":"0","TDD_LWPRC":"0","TDD_CLSPRC":"77,600","ACC_TRDVOL":"0"},
                {"TRD_DD":"2024/01/03","TDD_OPNPRC":"78,500","TDD_HGPRC":"78,800","TDD_LWPRC":"77,000","TDD_CLSPRC":"77,000","ACC_TRDVOL":"21,753,644"}
            ]}"#,
        )
        .create_async()
        .await;

    let adapter = KrxEquityAdapter::new(KrxClient::new(&config(&server).sources).unwrap());
    let frame = adapter.fetch(&request("005930", None)).await.unwrap();
    let table = frame.as_ohlcv().unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.first_date(), NaiveDate::from_ymd_opt(2024, 1, 3));
    assert_eq!(table.bars()[0].volume, 21_753_644);

    let halted = &table.bars()[1];
    assert_eq!(halted.open, dec!(77600));
    assert_eq!(halted.high, dec!(77600));
    assert_eq!(halted.low, dec!(77600));
    assert_eq!(halted.close, dec!(77600));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_krx_index_adapter_splits_ticker() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("MDCSTAT00301".to_string()),
            Matcher::Regex("indIdx=1".to_string()),
            Matcher::Regex("indIdx2=001".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"output":[
                {"TRD_DD":"2024/01/04","OPNPRC_IDX":"0","HGPRC_IDX":"0","LWPRC_IDX":"0","CLSPRC_IDX":"2,587.02","ACC_TRDVOL":"412,345"}
            ]}"#,
        )
        .create_async()
        .await;

    let adapter = KrxIndexAdapter::new(KrxClient::new(&config(&server).sources).unwrap());
    let frame = adapter.fetch(&request("1001", None)).await.unwrap();
    let bar = &frame.as_ohlcv().unwrap().bars()[0];

    assert_eq!(bar.open, dec!(2587.02));
    assert_eq!(bar.volume, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_krx_http_error_is_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(500)
        .create_async()
        .await;

    let adapter = KrxEquityAdapter::new(KrxClient::new(&config(&server).sources).unwrap());
    let err = adapter.fetch(&request("005930", None)).await.unwrap_err();
    assert!(matches!(err, DataError::SourceUnavailable { ref provider, .. } if provider == "krx"));
}

#[tokio::test]
async fn test_ecos_adapter_selects_largest_item() {
    let mut server = Server::new_async().await;
    let items = server
        .mock(
            "GET",
            "/StatisticItemList/testkey/xml/kr/1/10000/731Y003",
        )
        .with_status(200)
        .with_body(ITEM_LIST_XML)
        .create_async()
        .await;
    let search = server
        .mock(
            "GET",
            "/StatisticSearch/testkey/xml/kr/1/100000/731Y003/D/20230105/20240105/0000013",
        )
        .with_status(200)
        .with_body(SEARCH_XML)
        .create_async()
        .await;

    let adapter = EcosAdapter::new(EcosClient::new(&config(&server).sources).unwrap());
    let frame = adapter
        .fetch(&request("731Y003", Some("원/달러(종가)")))
        .await
        .unwrap();

    let series = frame.as_values().unwrap();
    assert_eq!(series.name(), "원/달러(종가)");
    // 구간 밖 시점(20221230)은 제외
    assert_eq!(series.len(), 2);
    assert_eq!(
        series.value_at(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()),
        Some(dec!(1301.5))
    );
    items.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_ecos_adapter_label_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/StatisticItemList/".to_string()))
        .with_status(200)
        .with_body(ITEM_LIST_XML)
        .create_async()
        .await;

    let adapter = EcosAdapter::new(EcosClient::new(&config(&server).sources).unwrap());
    let err = adapter
        .fetch(&request("731Y003", Some("원/파운드")))
        .await
        .unwrap_err();

    match err {
        DataError::LabelNotFound {
            table,
            label,
            available,
        } => {
            assert_eq!(table, "731Y003");
            assert_eq!(label, "원/파운드");
            assert_eq!(available, vec!["원/달러(종가)", "원/엔(100엔)"]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_ecos_no_data_is_empty_series() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Regex("^/StatisticItemList/".to_string()))
        .with_status(200)
        .with_body(ITEM_LIST_XML)
        .create_async()
        .await;
    server
        .mock("GET", Matcher::Regex("^/StatisticSearch/".to_string()))
        .with_status(200)
        .with_body(NO_DATA_XML)
        .create_async()
        .await;

    let adapter = EcosAdapter::new(EcosClient::new(&config(&server).sources).unwrap());
    let frame = adapter
        .fetch(&request("731Y003", Some("원/엔(100엔)")))
        .await
        .unwrap();
    assert!(frame.is_empty());
}

#[tokio::test]
async fn test_fred_adapter_clips_window() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/fredgraph.csv")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".to_string(), "DGS10".to_string()),
            Matcher::UrlEncoded("cosd".to_string(), "2023-01-05".to_string()),
            Matcher::UrlEncoded("coed".to_string(), "2024-01-05".to_string()),
        ]))
        .with_status(200)
        .with_body("observation_date,DGS10\n2023-01-04,3.69\n2024-01-02,3.95\n2024-01-03,.\n")
        .create_async()
        .await;

    let adapter = FredAdapter::new(FredClient::new(&config(&server).sources).unwrap());
    let frame = adapter.fetch(&request("DGS10", None)).await.unwrap();

    let series = frame.as_values().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[0].value, Some(dec!(3.95)));
    assert_eq!(series.points()[1].value, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_usd_krw_ohlc_joins_four_legs() {
    let mut server = Server::new_async().await;
    let item_list = r#"<StatisticItemList>
<list_total_count>4</list_total_count>
<row><ITEM_NAME>원/달러(시가)</ITEM_NAME><ITEM_CODE>0000001</ITEM_CODE><CYCLE>D</CYCLE><START_TIME>20000101</START_TIME><END_TIME>20240105</END_TIME><DATA_CNT>10</DATA_CNT></row>
<row><ITEM_NAME>원/달러(고가)</ITEM_NAME><ITEM_CODE>0000002</ITEM_CODE><CYCLE>D</CYCLE><START_TIME>20000101</START_TIME><END_TIME>20240105</END_TIME><DATA_CNT>10</DATA_CNT></row>
<row><ITEM_NAME>원/달러(저가)</ITEM_NAME><ITEM_CODE>0000003</ITEM_CODE><CYCLE>D</CYCLE><START_TIME>20000101</START_TIME><END_TIME>20240105</END_TIME><DATA_CNT>10</DATA_CNT></row>
<row><ITEM_NAME>원/달러(종가)</ITEM_NAME><ITEM_CODE>0000004</ITEM_CODE><CYCLE>D</CYCLE><START_TIME>20000101</START_TIME><END_TIME>20240105</END_TIME><DATA_CNT>10</DATA_CNT></row>
</StatisticItemList>"#;
    let item_mock = server
        .mock("GET", Matcher::Regex("^/StatisticItemList/".to_string()))
        .with_status(200)
        .with_body(item_list)
        .expect(4)
        .create_async()
        .await;

    for (code, value) in [
        ("0000001", "1,300"),
        ("0000002", "1,310"),
        ("0000003", "1,295"),
        ("0000004", "1,305"),
    ] {
        let body = format!(
            "<StatisticSearch><list_total_count>1</list_total_count>\
             <row><TIME>20240104</TIME><DATA_VALUE>{}</DATA_VALUE></row>\
             </StatisticSearch>",
            value
        );
        server
            .mock(
                "GET",
                Matcher::Regex(format!("^/StatisticSearch/.*/{}", code)),
            )
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
    }

    let registry = SourceRegistry::new().with_adapter(
        MarketCategory::MacroStatistics,
        Arc::new(EcosAdapter::new(
            EcosClient::new(&config(&server).sources).unwrap(),
        )),
    );
    let table = usd_krw_ohlc(&registry, as_of(), 1).await.unwrap();

    assert_eq!(table.len(), 1);
    let bar = &table.bars()[0];
    assert_eq!(bar.open, dec!(1300));
    assert_eq!(bar.high, dec!(1310));
    assert_eq!(bar.low, dec!(1295));
    assert_eq!(bar.close, dec!(1305));
    assert_eq!(bar.volume, 0);
    item_mock.assert_async().await;
}

#[tokio::test]
async fn test_directory_locate_loads_only_needed_catalogs() {
    let mut server = Server::new_async().await;
    let tables = server
        .mock("GET", Matcher::Regex("^/StatisticTableList/".to_string()))
        .with_status(200)
        .with_body(TABLE_LIST_XML)
        .expect(1)
        .create_async()
        .await;
    let listing = server
        .mock("GET", "/nasdaqtraded.txt")
        .with_status(200)
        .with_body(US_LISTING)
        .expect(1)
        .create_async()
        .await;

    let mut directory = SymbolDirectory::new(&config(&server)).unwrap();

    // 자릿수 규칙은 네트워크를 사용하지 않음
    assert_eq!(directory.locate("1001").await.unwrap(), MarketCategory::LocalIndex);
    assert_eq!(directory.locate("005930").await.unwrap(), MarketCategory::LocalEquity);

    assert_eq!(
        directory.locate("817Y002").await.unwrap(),
        MarketCategory::MacroStatistics
    );
    assert_eq!(directory.locate("AAPL").await.unwrap(), MarketCategory::ForeignEquity);
    assert_eq!(directory.locate("DGS10").await.unwrap(), MarketCategory::ForeignMacro);
    // 검색 불가능한 통계표는 카탈로그에 없음
    assert_eq!(
        directory.locate("0000000001").await.unwrap(),
        MarketCategory::ForeignMacro
    );

    let catalog = directory.macro_catalog().await.unwrap();
    assert_eq!(catalog["817Y002"].name, "시장금리(일별)");

    tables.assert_async().await;
    listing.assert_async().await;
}

#[tokio::test]
async fn test_directory_local_equities_skips_holidays() {
    let mut server = Server::new_async().await;
    let saturday = server
        .mock("POST", "/")
        .match_body(Matcher::Regex("trdDd=20240106".to_string()))
        .with_status(200)
        .with_body(r#"{"OutBlock_1":[]}"#)
        .create_async()
        .await;
    let friday = server
        .mock("POST", "/")
        .match_body(Matcher::Regex("trdDd=20240105".to_string()))
        .with_status(200)
        .with_body(
            r#"{"OutBlock_1":[
                {"ISU_SRT_CD":"005930","ISU_CD":"KR7005930003","ISU_ABBRV":"삼성전자","MKT_NM":"KOSPI","SECT_TP_NM":""},
                {"ISU_SRT_CD":"123456","ISU_CD":"KR7123456000","ISU_ABBRV":"테스트","MKT_NM":"KOSDAQ","SECT_TP_NM":"중견기업부"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/nasdaqtraded.txt")
        .with_status(200)
        .with_body(US_LISTING)
        .create_async()
        .await;

    let mut directory = SymbolDirectory::new(&config(&server))
        .unwrap()
        .with_listing_date(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());

    let equities = directory.local_equities().await.unwrap();
    assert_eq!(equities.len(), 2);
    assert_eq!(equities["005930"].sector.as_deref(), Some("반도체"));
    assert_eq!(equities["123456"].sector.as_deref(), Some("중견기업부"));

    // 두 번째 호출은 캐시 사용
    directory.local_equities().await.unwrap();
    let hits = directory.search("삼성", 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].ticker, "005930");
    assert_eq!(hits[0].category, MarketCategory::LocalEquity);

    let hits = directory.search("s", 10).await.unwrap();
    // 국내 종목이 먼저, 해외 종목은 심볼 순
    assert_eq!(
        hits.iter().map(|h| h.ticker.as_str()).collect::<Vec<_>>(),
        vec!["AAPL", "SPY"]
    );

    saturday.assert_async().await;
    friday.assert_async().await;
}

#[tokio::test]
async fn test_directory_listing_unavailable_after_lookback() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"output":[]}"#)
        .create_async()
        .await;

    let mut directory = SymbolDirectory::new(&config(&server)).unwrap();
    let err = directory.local_equities().await.unwrap_err();
    assert!(matches!(err, DataError::SourceUnavailable { ref provider, .. } if provider == "krx"));
}

#[tokio::test]
async fn test_time_series_locate_with_registry() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(
            r#"{"output":[
                {"TRD_DD":"2024/01/04","TDD_OPNPRC":"78,000","TDD_HGPRC":"78,500","TDD_LWPRC":"77,500","TDD_CLSPRC":"77,600","ACC_TRDVOL":"1,000"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let config = config(&server);
    let registry = SourceRegistry::new().with_adapter(
        MarketCategory::LocalEquity,
        Arc::new(KrxEquityAdapter::new(KrxClient::new(&config.sources).unwrap())),
    );
    let mut directory = SymbolDirectory::new(&config).unwrap();
    let mut series = TimeSeries::locate("005930", &mut directory, registry, &config.cache)
        .await
        .unwrap();

    assert_eq!(series.category(), MarketCategory::LocalEquity);
    assert_eq!(series.unit(), "KRW");
    let first = series.fetch().await.unwrap();
    let second = series.fetch().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(matches!(first.as_ref(), SeriesFrame::Ohlcv(t) if t.len() == 1));
}

#[tokio::test]
async fn test_krx_preferred_share_resolves_isin_from_listing() {
    let mut server = Server::new_async().await;
    let listing = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("MDCSTAT01501".to_string()),
            Matcher::Regex("trdDd=20240105".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"OutBlock_1":[
                {"ISU_SRT_CD":"005930","ISU_CD":"KR7005930003","ISU_ABBRV":"삼성전자","MKT_NM":"KOSPI","SECT_TP_NM":""},
                {"ISU_SRT_CD":"005935","ISU_CD":"KR7005931001","ISU_ABBRV":"삼성전자우","MKT_NM":"KOSPI","SECT_TP_NM":""}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let ohlcv = server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("MDCSTAT01701".to_string()),
            Matcher::Regex("isuCd=KR7005931001".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"output":[
                {"TRD_DD":"2024/01/04","TDD_OPNPRC":"62,000","TDD_HGPRC":"62,300","TDD_LWPRC":"61,500","TDD_CLSPRC":"61,800","ACC_TRDVOL":"1,234,567"}
            ]}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let adapter = KrxEquityAdapter::new(KrxClient::new(&config(&server).sources).unwrap());
    let frame = adapter.fetch(&request("005935", None)).await.unwrap();
    let table = frame.as_ohlcv().unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.bars()[0].close, dec!(61800));
    listing.assert_async().await;
    ohlcv.assert_async().await;
}

#[tokio::test]
async fn test_krx_unlisted_preferred_share_is_invalid_input() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("MDCSTAT01501".to_string()))
        .with_status(200)
        .with_body(
            r#"{"OutBlock_1":[
                {"ISU_SRT_CD":"005930","ISU_CD":"KR7005930003","ISU_ABBRV":"삼성전자","MKT_NM":"KOSPI","SECT_TP_NM":""}
            ]}"#,
        )
        .create_async()
        .await;

    let adapter = KrxEquityAdapter::new(KrxClient::new(&config(&server).sources).unwrap());
    let err = adapter.fetch(&request("999995", None)).await.unwrap_err();
    assert!(matches!(err, DataError::InvalidInput(_)));
}

/// 연결만 받고 응답하지 않는 서버를 띄웁니다.
async fn stalled_server() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        }
    });
    (format!("http://{}", addr), handle)
}

#[tokio::test]
async fn test_fred_adapter_times_out_on_stalled_server() {
    let (url, handle) = stalled_server().await;
    let mut config = AppConfig::default();
    config.sources.fred_base_url = format!("{}/fredgraph.csv", url);
    config.sources.request_timeout_secs = 1;

    let adapter = FredAdapter::new(FredClient::new(&config.sources).unwrap());
    let err = adapter.fetch(&request("DGS10", None)).await.unwrap_err();

    assert!(matches!(err, DataError::Timeout { ref provider, .. } if provider == "fred"));
    handle.abort();
}

#[tokio::test]
async fn test_krx_adapter_times_out_on_stalled_server() {
    let (url, handle) = stalled_server().await;
    let mut config = AppConfig::default();
    config.sources.krx_base_url = url;
    config.sources.request_timeout_secs = 1;

    let adapter = KrxIndexAdapter::new(KrxClient::new(&config.sources).unwrap());
    let err = adapter.fetch(&request("1001", None)).await.unwrap_err();

    assert!(matches!(err, DataError::Timeout { ref provider, .. } if provider == "krx"));
    handle.abort();
}

#[tokio::test]
async fn test_directory_macro_items_cached_per_table() {
    let mut server = Server::new_async().await;
    let items = server
        .mock(
            "GET",
            "/StatisticItemList/testkey/xml/kr/1/10000/731Y003",
        )
        .with_status(200)
        .with_body(ITEM_LIST_XML)
        .expect(1)
        .create_async()
        .await;

    let mut directory = SymbolDirectory::new(&config(&server)).unwrap();

    let first = directory
        .macro_series_within_table("731Y003")
        .await
        .unwrap()
        .to_vec();
    assert_eq!(first.len(), 3);
    assert_eq!(first[1].name, "원/달러(종가)");
    assert_eq!(first[1].code, "0000013");
    assert_eq!(first[1].cycle, "D");
    assert_eq!(first[1].start, "19640504");
    assert_eq!(first[1].end, "20240105");
    assert_eq!(first[1].count, 200);

    let second = directory
        .macro_series_within_table("731Y003")
        .await
        .unwrap();
    assert_eq!(second, first.as_slice());

    items.assert_async().await;
}

#[tokio::test]
#[ignore = "실제 네트워크 필요"]
async fn test_live_fred_smoke() {
    let config = AppConfig::default();
    let adapter = FredAdapter::new(FredClient::new(&config.sources).unwrap());
    let frame = adapter.fetch(&request("DGS10", None)).await.unwrap();
    assert!(!frame.is_empty());
}
