//! ECOS 매크로 통계 어댑터.

use async_trait::async_trait;
use snowball_core::{Cycle, LookbackWindow, SeriesFrame, ValuePoint, ValueSeries};
use tracing::debug;

use super::{AdapterRequest, SourceAdapter};
use crate::error::{DataError, Result};
use crate::provider::{parse_grouped_number, EcosClient, EcosItem};

/// 라벨에 해당하는 세부항목을 고릅니다.
///
/// 같은 라벨이 여러 행이면 자료 수가 가장 많은 행을 선택하고,
/// 자료 수가 같으면 목록에서 먼저 나온 행을 선택합니다.
pub fn select_item<'a>(items: &'a [EcosItem], table: &str, label: &str) -> Result<&'a EcosItem> {
    let mut selected: Option<&EcosItem> = None;
    for item in items.iter().filter(|item| item.name == label) {
        match selected {
            Some(best) if best.count >= item.count => {}
            _ => selected = Some(item),
        }
    }

    selected.ok_or_else(|| {
        let mut available: Vec<String> = Vec::new();
        for item in items {
            if !available.contains(&item.name) {
                available.push(item.name.clone());
            }
        }
        DataError::LabelNotFound {
            table: table.to_string(),
            label: label.to_string(),
            available,
        }
    })
}

/// 검색 범위를 항목의 수록 기간과 요청 구간의 교집합으로 좁힙니다.
///
/// 같은 주기의 기간 문자열은 사전순 비교가 시간순과 같습니다.
fn search_range(item: &EcosItem, cycle: Cycle, window: &LookbackWindow) -> (String, String) {
    let from = cycle.format_period(window.start);
    let to = cycle.format_period(window.end);

    let start = if item.start.is_empty() || item.start < from {
        from
    } else {
        item.start.clone()
    };
    let end = if item.end.is_empty() || item.end > to {
        to
    } else {
        item.end.clone()
    };
    (start, end)
}

/// 조회 결과를 날짜 인덱스 시계열로 변환합니다.
pub(crate) fn build_series(
    label: &str,
    cycle: Cycle,
    rows: &[(String, String)],
    window: &LookbackWindow,
) -> Result<ValueSeries> {
    let points = rows
        .iter()
        .map(|(time, value)| -> Result<ValuePoint> {
            let date = cycle.parse_period(time).ok_or_else(|| {
                DataError::SchemaMismatch(format!("ECOS 시점 파싱 실패 ({}): {}", cycle, time))
            })?;
            Ok(ValuePoint::new(date, parse_grouped_number(value)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ValueSeries::new(label, points).within(window.start, window.end))
}

/// 한국은행 ECOS 어댑터.
#[derive(Debug, Clone)]
pub struct EcosAdapter {
    client: EcosClient,
}

impl EcosAdapter {
    /// 새 어댑터를 생성합니다.
    pub fn new(client: EcosClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for EcosAdapter {
    fn name(&self) -> &'static str {
        "ecos"
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame> {
        let table = request.ticker.as_str();
        let label = request
            .label
            .as_deref()
            .ok_or_else(|| DataError::MissingLabel {
                ticker: table.to_string(),
            })?;

        let items = self.client.item_list(table).await?;
        let item = select_item(&items, table, label)?;
        let cycle = Cycle::from_code(&item.cycle).ok_or_else(|| {
            DataError::SchemaMismatch(format!("지원하지 않는 ECOS 주기: {}", item.cycle))
        })?;

        let (start, end) = search_range(item, cycle, &request.window);
        debug!(
            table = table,
            item = %item.code,
            count = item.count,
            start = %start,
            end = %end,
            "ECOS 항목 선택"
        );
        if start > end {
            return Ok(SeriesFrame::Values(ValueSeries::new(label, Vec::new())));
        }

        let rows = self
            .client
            .search(table, cycle, &start, &end, &item.code)
            .await?;
        let series = build_series(label, cycle, &rows, &request.window)?;
        Ok(SeriesFrame::Values(series))
    }
}
