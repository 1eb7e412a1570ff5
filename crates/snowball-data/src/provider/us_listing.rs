//! 미국 상장 종목 디렉터리 클라이언트.
//!
//! Nasdaq Trader의 `nasdaqtraded.txt`(파이프 구분)를 읽습니다.
//! 마지막 줄의 `File Creation Time` 푸터와 테스트 종목은 제외합니다.

use snowball_core::SourcesConfig;
use tracing::{debug, info};

use super::{http_client, send_for_text};
use crate::error::{DataError, Result};

const PROVIDER: &str = "us-listing";

/// 미국 상장 종목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsListing {
    /// 심볼
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 상장 거래소
    pub exchange: String,
    /// ETF 여부
    pub etf: bool,
}

/// 상장 거래소 코드를 이름으로 변환합니다.
fn exchange_name(code: &str) -> &str {
    match code {
        "Q" => "NASDAQ",
        "N" => "NYSE",
        "A" => "NYSE MKT",
        "P" => "NYSE ARCA",
        "Z" => "BATS",
        "V" => "IEXG",
        other => other,
    }
}

/// 미국 상장 종목 목록 클라이언트.
#[derive(Debug, Clone)]
pub struct UsListingClient {
    client: reqwest::Client,
    url: String,
}

impl UsListingClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            url: config.us_listing_url.clone(),
        })
    }

    /// 전체 목록을 조회합니다.
    pub async fn fetch(&self) -> Result<Vec<UsListing>> {
        debug!(url = %self.url, "미국 종목 목록 요청");
        let text = send_for_text(PROVIDER, self.client.get(&self.url)).await?;

        let listings = parse_listing(&text)?;
        info!(count = listings.len(), "미국 종목 목록 조회 완료");
        Ok(listings)
    }
}

/// 파이프 구분 목록을 파싱합니다.
pub(crate) fn parse_listing(text: &str) -> Result<Vec<UsListing>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index_of = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DataError::SchemaMismatch(format!("미국 종목 목록에 {} 컬럼이 없습니다", name)))
    };
    let symbol_idx = index_of("Symbol")?;
    let name_idx = index_of("Security Name")?;
    let exchange_idx = index_of("Listing Exchange")?;
    let etf_idx = index_of("ETF")?;
    let test_idx = index_of("Test Issue")?;

    let mut listings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let first = record.get(0).unwrap_or_default();
        if first.starts_with("File Creation Time") || record.len() <= test_idx {
            continue;
        }
        if record.get(test_idx) == Some("Y") {
            continue;
        }

        let symbol = record.get(symbol_idx).unwrap_or_default().trim();
        if symbol.is_empty() {
            continue;
        }
        listings.push(UsListing {
            symbol: symbol.to_string(),
            name: record.get(name_idx).unwrap_or_default().trim().to_string(),
            exchange: exchange_name(record.get(exchange_idx).unwrap_or_default()).to_string(),
            etf: record.get(etf_idx) == Some("Y"),
        });
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Nasdaq Traded|Symbol|Security Name|Listing Exchange|Market Category|ETF|Round Lot Size|Test Issue|Financial Status|CQS Symbol|NASDAQ Symbol|NextShares
Y|AAPL|Apple Inc. - Common Stock|Q|Q|N|100|N|N||AAPL|N
Y|SPY|SPDR S&P 500 ETF Trust|P| |Y|100|N||SPY|SPY|N
Y|ZXZZT|NASDAQ TEST STOCK|Q|G|N|100|Y|N||ZXZZT|N
File Creation Time: 0102202422:00|||||||||||
";

    #[test]
    fn test_parse_listing() {
        let listings = parse_listing(SAMPLE).unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].symbol, "AAPL");
        assert_eq!(listings[0].exchange, "NASDAQ");
        assert!(!listings[0].etf);

        assert_eq!(listings[1].symbol, "SPY");
        assert_eq!(listings[1].exchange, "NYSE ARCA");
        assert!(listings[1].etf);
    }

    #[test]
    fn test_missing_columns() {
        assert!(matches!(
            parse_listing("Symbol|Name\nAAPL|Apple\n"),
            Err(DataError::SchemaMismatch(_))
        ));
    }
}
