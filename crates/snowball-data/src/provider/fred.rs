//! FRED(St. Louis Fed) 그래프 CSV 클라이언트.
//!
//! 인증키 없이 `fredgraph.csv?id=..&cosd=..&coed=..`로 단일 시계열을 받습니다.
//! 첫 컬럼은 날짜(`YYYY-MM-DD`), 두 번째 컬럼은 값이며 `.`은 결측입니다.

use chrono::NaiveDate;
use snowball_core::{SourcesConfig, ValuePoint, ValueSeries};
use tracing::{debug, info};

use super::{http_client, parse_grouped_number, send_for_text};
use crate::error::{DataError, Result};

const PROVIDER: &str = "fred";

/// FRED 클라이언트.
#[derive(Debug, Clone)]
pub struct FredClient {
    client: reqwest::Client,
    base_url: String,
}

impl FredClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.fred_base_url.clone(),
        })
    }

    /// `[start, end]` 구간의 시계열을 조회합니다.
    pub async fn series(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ValueSeries> {
        let (cosd, coed) = (start.to_string(), end.to_string());
        debug!(series_id = series_id, start = %cosd, end = %coed, "FRED 요청");

        let request = self.client.get(&self.base_url).query(&[
            ("id", series_id),
            ("cosd", cosd.as_str()),
            ("coed", coed.as_str()),
        ]);
        let text = send_for_text(PROVIDER, request).await?;

        let series = parse_csv(series_id, &text)?;
        info!(series_id = series_id, count = series.len(), "FRED 시계열 조회 완료");
        Ok(series)
    }
}

/// FRED CSV 본문을 시계열로 변환합니다.
pub(crate) fn parse_csv(series_id: &str, text: &str) -> Result<ValueSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.len() < 2 {
        return Err(DataError::SchemaMismatch(format!(
            "FRED 응답 컬럼이 부족합니다: {:?}",
            headers
        )));
    }

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|e| {
            DataError::SchemaMismatch(format!("FRED 날짜 파싱 실패: {} - {}", raw_date, e))
        })?;
        let value = parse_grouped_number(record.get(1).unwrap_or_default())?;
        points.push(ValuePoint::new(date, value));
    }

    Ok(ValueSeries::new(series_id, points))
}
