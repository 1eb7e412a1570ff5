//! OHLCV 테이블과 단일 값 시계열.
//!
//! 모든 데이터 소스의 결과는 두 가지 형태 중 하나로 정규화됩니다:
//! - [`OhlcvTable`]: 일별 시가/고가/저가/종가/거래량
//! - [`ValueSeries`]: 날짜별 단일 값 (매크로 지표 등)

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// OHLCV 테이블의 표준 컬럼 이름.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// 일별 OHLCV 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: u64,
}

impl OhlcvBar {
    /// 새 레코드를 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 거래가 없었던 세션인지 여부 (시가 0).
    pub fn is_halted(&self) -> bool {
        self.open.is_zero()
    }
}

/// 날짜 오름차순으로 정렬되고 날짜 중복이 없는 OHLCV 테이블.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OhlcvTable {
    bars: Vec<OhlcvBar>,
}

impl OhlcvTable {
    /// 레코드 목록으로 테이블을 생성합니다.
    ///
    /// 날짜 기준으로 정렬하며, 같은 날짜가 여러 번 나오면 뒤의 레코드가 남습니다.
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        let deduped: BTreeMap<NaiveDate, OhlcvBar> =
            bars.into_iter().map(|bar| (bar.date, bar)).collect();
        Self {
            bars: deduped.into_values().collect(),
        }
    }

    /// 컬럼만 있고 행이 없는 테이블.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 컬럼 이름.
    pub fn columns(&self) -> [&'static str; 5] {
        OHLCV_COLUMNS
    }

    /// 전체 레코드.
    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// 마지막 거래일.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// 각 레코드에 변환을 적용한 새 테이블을 만듭니다.
    pub fn map_bars<F>(self, f: F) -> Self
    where
        F: FnMut(OhlcvBar) -> OhlcvBar,
    {
        Self::new(self.bars.into_iter().map(f).collect())
    }

    /// `[start, end]` 구간의 레코드만 남깁니다.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date <= end)
                .cloned()
                .collect(),
        }
    }

    /// 종가 시계열.
    pub fn close_series(&self, name: impl Into<String>) -> ValueSeries {
        ValueSeries::new(
            name,
            self.bars
                .iter()
                .map(|b| ValuePoint::new(b.date, Some(b.close)))
                .collect(),
        )
    }
}

/// 단일 값 시계열의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePoint {
    /// 기준일
    pub date: NaiveDate,
    /// 값 (결측이면 `None`)
    pub value: Option<Decimal>,
}

impl ValuePoint {
    /// 새 점을 생성합니다.
    pub fn new(date: NaiveDate, value: Option<Decimal>) -> Self {
        Self { date, value }
    }
}

/// 이름이 붙은 단일 값 시계열.
///
/// 날짜 오름차순이며 날짜 중복이 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSeries {
    name: String,
    points: Vec<ValuePoint>,
}

impl ValueSeries {
    /// 점 목록으로 시계열을 생성합니다. 같은 날짜는 뒤의 값이 남습니다.
    pub fn new(name: impl Into<String>, points: Vec<ValuePoint>) -> Self {
        let deduped: BTreeMap<NaiveDate, Option<Decimal>> =
            points.into_iter().map(|p| (p.date, p.value)).collect();
        Self {
            name: name.into(),
            points: deduped
                .into_iter()
                .map(|(date, value)| ValuePoint { date, value })
                .collect(),
        }
    }

    /// 시계열 이름.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 전체 점.
    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    /// 점 개수 (결측 포함).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 결측을 제외한 (날짜, 값) 목록.
    pub fn observed(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// 특정 날짜의 값.
    pub fn value_at(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.points[i].value)
    }

    /// `[start, end]` 구간의 점만 남깁니다.
    pub fn within(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }
}

/// 데이터 소스가 반환하는 두 가지 결과 형태.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SeriesFrame {
    /// OHLCV 테이블
    Ohlcv(OhlcvTable),
    /// 단일 값 시계열
    Values(ValueSeries),
}

impl SeriesFrame {
    /// 테이블 형태이면 참조를 반환합니다.
    pub fn as_ohlcv(&self) -> Option<&OhlcvTable> {
        match self {
            Self::Ohlcv(table) => Some(table),
            Self::Values(_) => None,
        }
    }

    /// 값 시계열 형태이면 참조를 반환합니다.
    pub fn as_values(&self) -> Option<&ValueSeries> {
        match self {
            Self::Ohlcv(_) => None,
            Self::Values(series) => Some(series),
        }
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        match self {
            Self::Ohlcv(table) => table.len(),
            Self::Values(series) => series.len(),
        }
    }

    /// 비어 있는지 여부.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 종가(테이블) 또는 값 시계열 그 자체.
    pub fn close_series(&self, name: &str) -> ValueSeries {
        match self {
            Self::Ohlcv(table) => table.close_series(name),
            Self::Values(series) => series.clone(),
        }
    }
}
