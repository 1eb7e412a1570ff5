//! KRX(한국거래소) 정보데이터시스템 클라이언트.
//!
//! 지수/개별종목 일별 시세와 전종목 목록을 조회합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use snowball_data::provider::KrxClient;
//!
//! let krx = KrxClient::new(&sources)?;
//! let bars = krx.stock_ohlcv("005930", start, end).await?;
//! ```

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snowball_core::{format_yyyymmdd, OhlcvBar, SourcesConfig};
use tracing::{debug, info};

use super::{http_client, parse_grouped_number, send_for_text, snippet};
use crate::error::{DataError, Result};

const PROVIDER: &str = "krx";

/// 지수 일별 시세 bld.
const BLD_INDEX_OHLCV: &str = "dbms/MDC/STAT/standard/MDCSTAT00301";

/// 개별종목 일별 시세 bld.
const BLD_STOCK_OHLCV: &str = "dbms/MDC/STAT/standard/MDCSTAT01701";

/// 전종목 시세 bld (종목 목록 용도).
const BLD_STOCK_LISTING: &str = "dbms/MDC/STAT/standard/MDCSTAT01501";

/// 휴장일을 건너뛰기 위해 종목 목록 기준일을 거슬러 올라가는 최대 일수.
pub const LISTING_LOOKBACK_DAYS: i64 = 10;

const REFERER: &str = "https://data.krx.co.kr/contents/MDC/MDI/outerLoader/index.cmd";

/// KRX 응답 구조.
///
/// 화면마다 "output" 또는 "OutBlock_1" 키를 사용합니다.
#[derive(Debug, Deserialize)]
struct KrxResponse<T> {
    #[serde(default = "Vec::new", alias = "OutBlock_1")]
    output: Vec<T>,
}

/// 지수 OHLCV 레코드.
#[derive(Debug, Deserialize)]
struct KrxIndexRecord {
    #[serde(rename = "TRD_DD", default)]
    trd_dd: String,
    #[serde(rename = "OPNPRC_IDX", default)]
    open: String,
    #[serde(rename = "HGPRC_IDX", default)]
    high: String,
    #[serde(rename = "LWPRC_IDX", default)]
    low: String,
    #[serde(rename = "CLSPRC_IDX", default)]
    close: String,
    #[serde(rename = "ACC_TRDVOL", default)]
    volume: String,
}

/// 개별종목 OHLCV 레코드.
#[derive(Debug, Deserialize)]
struct KrxStockRecord {
    #[serde(rename = "TRD_DD", default)]
    trd_dd: String,
    #[serde(rename = "TDD_OPNPRC", default)]
    open: String,
    #[serde(rename = "TDD_HGPRC", default)]
    high: String,
    #[serde(rename = "TDD_LWPRC", default)]
    low: String,
    #[serde(rename = "TDD_CLSPRC", default)]
    close: String,
    #[serde(rename = "ACC_TRDVOL", default)]
    volume: String,
}

/// 전종목 목록 레코드.
#[derive(Debug, Deserialize)]
struct KrxListingRecord {
    #[serde(rename = "ISU_SRT_CD", default)]
    code: String,
    #[serde(rename = "ISU_CD", default)]
    isin: String,
    #[serde(rename = "ISU_ABBRV", default)]
    name: String,
    #[serde(rename = "MKT_NM", default)]
    market: String,
    #[serde(rename = "SECT_TP_NM", default)]
    sector: String,
}

/// 목록 조회 대상 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KrxMarket {
    /// 전체
    All,
    /// 유가증권시장
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl KrxMarket {
    fn id(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Kospi => "STK",
            Self::Kosdaq => "KSQ",
        }
    }
}

/// 상장 종목 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrxListing {
    /// 단축코드 (6자리)
    pub code: String,
    /// 표준코드 (ISIN)
    pub isin: String,
    /// 종목 약명
    pub name: String,
    /// 시장 이름 (KOSPI, KOSDAQ, KONEX)
    pub market: String,
    /// 소속부 (없으면 `None`)
    pub sector: Option<String>,
}

/// 보통주 단축코드 여부. 우선주 등 다른 종류주는 마지막 자리가 0이 아닙니다.
pub fn is_common_share(code: &str) -> bool {
    code.len() == 6 && code.ends_with('0')
}

/// 6자리 보통주 단축코드로 표준코드(ISIN)를 계산합니다.
///
/// `KR7` + 단축코드 + `00` 뒤에 Luhn 검증 숫자를 붙입니다.
/// 보통주에만 유효하며, 다른 종류주는 [`KrxClient::resolve_isin`]으로 목록에서 찾습니다.
pub fn stock_isin(code: &str) -> String {
    let body = format!("KR7{}00", code);
    let digits: Vec<u32> = body
        .chars()
        .filter_map(|c| c.to_digit(36))
        .flat_map(|v| {
            if v >= 10 {
                vec![v / 10, v % 10]
            } else {
                vec![v]
            }
        })
        .collect();

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                doubled / 10 + doubled % 10
            } else {
                d
            }
        })
        .sum();

    format!("{}{}", body, (10 - sum % 10) % 10)
}

/// KRX 정보데이터시스템 클라이언트.
#[derive(Debug, Clone)]
pub struct KrxClient {
    client: reqwest::Client,
    endpoint: String,
}

impl KrxClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: config.krx_base_url.clone(),
        })
    }

    async fn request<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<Vec<T>> {
        debug!(endpoint = %self.endpoint, params = ?params, "KRX 요청");

        let request = self
            .client
            .post(&self.endpoint)
            .header("Referer", REFERER)
            .form(params);
        let text = send_for_text(PROVIDER, request).await?;

        debug!(response_len = text.len(), "KRX 응답 수신");

        let parsed: KrxResponse<T> = serde_json::from_str(&text).map_err(|e| {
            DataError::SchemaMismatch(format!("KRX JSON 파싱 실패: {} - {}", e, snippet(&text)))
        })?;
        Ok(parsed.output)
    }

    /// 지수 일별 OHLCV를 조회합니다 (보정 전 원시 값).
    ///
    /// 지수 코드 4자리 중 첫 자리는 계열 구분, 나머지는 지수 번호입니다.
    pub async fn index_ohlcv(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        let (group, number) = split_index_ticker(ticker)?;
        let (start_s, end_s) = (format_yyyymmdd(start), format_yyyymmdd(end));
        let params = [
            ("bld", BLD_INDEX_OHLCV),
            ("indIdx", group),
            ("indIdx2", number),
            ("strtDd", start_s.as_str()),
            ("endDd", end_s.as_str()),
        ];

        let records: Vec<KrxIndexRecord> = self.request(&params).await?;
        let bars = records
            .iter()
            .map(|r| to_bar(&r.trd_dd, &r.open, &r.high, &r.low, &r.close, &r.volume))
            .collect::<Result<Vec<_>>>()?;

        info!(ticker = ticker, count = bars.len(), "KRX 지수 시세 조회 완료");
        Ok(bars)
    }

    /// 개별종목 일별 OHLCV를 조회합니다 (수정주가, 보정 전 원시 값).
    pub async fn stock_ohlcv(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<OhlcvBar>> {
        let isin = self.resolve_isin(code, end).await?;
        let (start_s, end_s) = (format_yyyymmdd(start), format_yyyymmdd(end));
        let params = [
            ("bld", BLD_STOCK_OHLCV),
            ("isuCd", isin.as_str()),
            ("strtDd", start_s.as_str()),
            ("endDd", end_s.as_str()),
            ("adjStkPrc", "2"),
        ];

        let records: Vec<KrxStockRecord> = self.request(&params).await?;
        let bars = records
            .iter()
            .map(|r| to_bar(&r.trd_dd, &r.open, &r.high, &r.low, &r.close, &r.volume))
            .collect::<Result<Vec<_>>>()?;

        info!(code = code, count = bars.len(), "KRX 종목 시세 조회 완료");
        Ok(bars)
    }

    /// 기준일의 상장 종목 목록을 조회합니다.
    pub async fn listing(&self, market: KrxMarket, date: NaiveDate) -> Result<Vec<KrxListing>> {
        let trd_dd = format_yyyymmdd(date);
        let params = [
            ("bld", BLD_STOCK_LISTING),
            ("mktId", market.id()),
            ("trdDd", trd_dd.as_str()),
        ];

        let records: Vec<KrxListingRecord> = self.request(&params).await?;
        let listings: Vec<KrxListing> = records
            .into_iter()
            .filter(|r| !r.code.is_empty())
            .map(|r| KrxListing {
                code: r.code,
                isin: r.isin,
                name: r.name,
                market: r.market,
                sector: Some(r.sector).filter(|s| !s.is_empty() && s != "-"),
            })
            .collect();

        info!(market = ?market, count = listings.len(), "KRX 종목 목록 조회 완료");
        Ok(listings)
    }

    /// 기준일부터 거슬러 올라가며 비어 있지 않은 첫 종목 목록을 조회합니다.
    ///
    /// [`LISTING_LOOKBACK_DAYS`]일 안에 목록이 없으면 `SourceUnavailable`입니다.
    pub async fn latest_listing(
        &self,
        market: KrxMarket,
        date: NaiveDate,
    ) -> Result<Vec<KrxListing>> {
        for offset in 0..LISTING_LOOKBACK_DAYS {
            let day = date - Duration::days(offset);
            let listings = self.listing(market, day).await?;
            if !listings.is_empty() {
                return Ok(listings);
            }
            debug!(date = %day, "KRX 종목 목록 없음, 이전 일자 조회");
        }
        Err(DataError::unavailable(
            PROVIDER,
            format!(
                "{} 이전 {}일 동안 종목 목록이 비어 있습니다",
                date, LISTING_LOOKBACK_DAYS
            ),
        ))
    }

    /// 단축코드의 표준코드(ISIN)를 구합니다.
    ///
    /// 보통주는 계산으로 구하고, 그 외 종류주는 기준일 종목 목록의 `ISU_CD`를 사용합니다.
    pub async fn resolve_isin(&self, code: &str, date: NaiveDate) -> Result<String> {
        if is_common_share(code) {
            return Ok(stock_isin(code));
        }

        let listings = self.latest_listing(KrxMarket::All, date).await?;
        let isin = listings
            .into_iter()
            .find(|l| l.code == code)
            .map(|l| l.isin)
            .ok_or_else(|| {
                DataError::InvalidInput(format!("KRX 종목 목록에 없는 종목입니다: {}", code))
            })?;

        debug!(code = code, isin = %isin, "종목 목록에서 표준코드 확인");
        Ok(isin)
    }
}

fn split_index_ticker(ticker: &str) -> Result<(&str, &str)> {
    if ticker.len() != 4 || !ticker.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataError::InvalidInput(format!(
            "지수 코드는 4자리 숫자여야 합니다: {}",
            ticker
        )));
    }
    Ok(ticker.split_at(1))
}

/// KRX 날짜 문자열 파싱 (YYYY/MM/DD 또는 YYYYMMDD).
fn parse_krx_date(s: &str) -> Result<NaiveDate> {
    let format = if s.contains('/') { "%Y/%m/%d" } else { "%Y%m%d" };
    NaiveDate::parse_from_str(s.trim(), format)
        .map_err(|e| DataError::SchemaMismatch(format!("날짜 파싱 실패: {} - {}", s, e)))
}

/// KRX 가격 파싱. 거래가 없던 날의 `-`는 0으로 처리합니다.
fn parse_krx_price(s: &str) -> Result<Decimal> {
    Ok(parse_grouped_number(s)?.unwrap_or(Decimal::ZERO))
}

fn parse_krx_volume(s: &str) -> Result<u64> {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return Ok(0);
    }
    cleaned
        .parse()
        .map_err(|_| DataError::SchemaMismatch(format!("거래량 파싱 실패: {}", s)))
}

fn to_bar(
    date: &str,
    open: &str,
    high: &str,
    low: &str,
    close: &str,
    volume: &str,
) -> Result<OhlcvBar> {
    Ok(OhlcvBar::new(
        parse_krx_date(date)?,
        parse_krx_price(open)?,
        parse_krx_price(high)?,
        parse_krx_price(low)?,
        parse_krx_price(close)?,
        parse_krx_volume(volume)?,
    ))
}
