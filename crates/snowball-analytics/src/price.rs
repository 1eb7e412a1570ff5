//! 가격 기반 지표.
//!
//! - 대표가 (Typical Price)
//! - 52주 최고/최저 종가
//! - 구간별 상대 수익률

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snowball_core::{OhlcvTable, SeriesFrame, ValuePoint, ValueSeries};

/// 52주 구간 (일).
pub const WEEKS_52_DAYS: i64 = 365;

/// 상대 수익률 구간 (라벨, 일수).
pub const RETURN_WINDOWS: [(&str, i64); 6] = [
    ("3M", 92),
    ("6M", 183),
    ("1Y", 365),
    ("2Y", 730),
    ("3Y", 1095),
    ("5Y", 1825),
];

/// 지표 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    /// 날짜
    pub date: NaiveDate,
    /// 값
    pub value: f64,
}

/// 라벨이 붙은 지표 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricLine {
    /// 라벨 (예: "3M")
    pub label: String,
    /// 구간 일수
    pub days: i64,
    /// 날짜 오름차순 값
    pub points: Vec<LinePoint>,
}

impl MetricLine {
    /// 마지막 값.
    pub fn last(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// 값이 없는지 여부.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 대표가.
///
/// OHLCV 테이블은 (고가 + 저가 + 종가) / 3, 단일 값 시계열은 그 자체입니다.
pub fn typical_price(frame: &SeriesFrame) -> ValueSeries {
    match frame {
        SeriesFrame::Ohlcv(table) => ValueSeries::new(
            "typical",
            table
                .bars()
                .iter()
                .map(|b| ValuePoint::new(b.date, Some((b.high + b.low + b.close) / Decimal::from(3))))
                .collect(),
        ),
        SeriesFrame::Values(series) => series.clone(),
    }
}

fn trailing_closes(table: &OhlcvTable, days: i64) -> impl Iterator<Item = Decimal> + '_ {
    let from = table.last_date().map(|last| last - Duration::days(days));
    table
        .bars()
        .iter()
        .filter(move |b| from.is_some_and(|from| b.date >= from))
        .map(|b| b.close)
}

/// 마지막 행 기준 365일 최고 종가. 빈 테이블이면 `None`.
pub fn high_52w(table: &OhlcvTable) -> Option<Decimal> {
    trailing_closes(table, WEEKS_52_DAYS).max()
}

/// 마지막 행 기준 365일 최저 종가. 빈 테이블이면 `None`.
pub fn low_52w(table: &OhlcvTable) -> Option<Decimal> {
    trailing_closes(table, WEEKS_52_DAYS).min()
}

/// 관측값만 f64 점으로 변환합니다.
pub(crate) fn to_points(series: &ValueSeries) -> Vec<LinePoint> {
    series
        .observed()
        .filter_map(|(date, value)| {
            value.to_f64().map(|value| LinePoint { date, value })
        })
        .collect()
}

/// 마지막 점 기준 `days`일 이내의 점.
pub(crate) fn trailing(points: &[LinePoint], days: i64) -> &[LinePoint] {
    let Some(last) = points.last() else {
        return points;
    };
    let from = last.date - Duration::days(days);
    let start = points.partition_point(|p| p.date < from);
    &points[start..]
}

/// 구간별 누적 수익률 (%).
///
/// 각 구간의 첫 점을 0%로 두고 이후 값은 `100 * (값 / 첫 값 - 1)`입니다.
/// 첫 값이 0이면 해당 구간은 비어 있습니다.
pub fn relative_returns(close: &ValueSeries) -> Vec<MetricLine> {
    let points = to_points(close);
    RETURN_WINDOWS
        .iter()
        .map(|&(label, days)| {
            let window = trailing(&points, days);
            let points = match window.first() {
                Some(base) if base.value != 0.0 => window
                    .iter()
                    .map(|p| LinePoint {
                        date: p.date,
                        value: 100.0 * (p.value / base.value - 1.0),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            MetricLine {
                label: label.to_string(),
                days,
                points,
            }
        })
        .collect()
}
