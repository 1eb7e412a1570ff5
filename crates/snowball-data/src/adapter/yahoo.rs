//! Yahoo Finance 해외 주식 어댑터.

use std::error::Error as StdError;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use snowball_core::{OhlcvBar, OhlcvTable, SeriesFrame, SourcesConfig};
use time::OffsetDateTime;
use tracing::{debug, info};
use yahoo_finance_api as yahoo;

use super::{AdapterRequest, SourceAdapter};
use crate::error::{DataError, Result};

const PROVIDER: &str = "yahoo";

/// Yahoo 시세 한 행 (원시 값).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct QuoteRow {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&yahoo::Quote> for QuoteRow {
    fn from(quote: &yahoo::Quote) -> Self {
        Self {
            timestamp: quote.timestamp as i64,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume as u64,
        }
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(6))
}

/// 원시 시세를 로컬 OHLCV 스키마로 변환합니다.
///
/// 종가가 유효하지 않은 행은 제외하고, 날짜는 UTC 기준 거래일을 사용합니다.
pub(crate) fn quotes_to_table(rows: &[QuoteRow]) -> OhlcvTable {
    let bars = rows
        .iter()
        .filter_map(|row| {
            let date = DateTime::from_timestamp(row.timestamp, 0)?.date_naive();
            let close = to_decimal(row.close)?;
            Some(OhlcvBar::new(
                date,
                to_decimal(row.open).unwrap_or(close),
                to_decimal(row.high).unwrap_or(close),
                to_decimal(row.low).unwrap_or(close),
                close,
                row.volume,
            ))
        })
        .collect();
    OhlcvTable::new(bars)
}

fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let month = time::Month::try_from(date.month() as u8)
        .map_err(|e| DataError::InvalidInput(format!("월 변환 실패: {}", e)))?;
    let day = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(|e| DataError::InvalidInput(format!("날짜 변환 실패: {}", e)))?;
    Ok(day.midnight().assume_utc())
}

/// 오류 원인 체인에 타임아웃이 있는지 확인합니다.
pub(crate) fn caused_by_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        if e.to_string().to_lowercase().contains("timed out") {
            return true;
        }
        current = e.source();
    }
    false
}

/// Yahoo 오류를 데이터 오류로 변환합니다. 타임아웃은 별도 종류로 구분합니다.
pub(crate) fn yahoo_error(ticker: &str, err: yahoo::YahooError) -> DataError {
    let timed_out = match &err {
        yahoo::YahooError::ConnectionFailed(e) => e.is_timeout() || caused_by_timeout(&err),
        _ => caused_by_timeout(&err),
    };
    if timed_out {
        DataError::Timeout {
            provider: PROVIDER.to_string(),
            message: format!("{}: {}", ticker, err),
        }
    } else {
        DataError::unavailable(PROVIDER, format!("{}: {}", ticker, err))
    }
}

/// 해외 주식 어댑터.
pub struct YahooAdapter {
    connector: yahoo::YahooConnector,
}

impl YahooAdapter {
    /// 설정의 요청 타임아웃을 적용한 어댑터를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        let connector = yahoo::YahooConnector::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DataError::Config(format!("Yahoo 커넥터 생성 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl SourceAdapter for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame> {
        // 종료 시각은 배타적이므로 기준일 다음 날 자정까지 요청
        let start = to_offset_datetime(request.window.start)?;
        let end = to_offset_datetime(request.window.end + Duration::days(1))?;

        debug!(
            ticker = %request.ticker,
            years = request.lookback_years,
            window = %request.window,
            "Yahoo Finance 시세 요청"
        );

        let response = self
            .connector
            .get_quote_history(&request.ticker, start, end)
            .await
            .map_err(|e| yahoo_error(&request.ticker, e))?;
        let quotes = response
            .quotes()
            .map_err(|e| DataError::SchemaMismatch(format!("Yahoo 시세 파싱 실패: {}", e)))?;

        let rows: Vec<QuoteRow> = quotes.iter().map(QuoteRow::from).collect();
        let table = quotes_to_table(&rows).within(request.window.start, request.window.end);

        info!(ticker = %request.ticker, count = table.len(), "Yahoo 시세 조회 완료");
        Ok(SeriesFrame::Ohlcv(table))
    }
}
