//! 지지선/저항선.
//!
//! 가장 높은(낮은) 두 꼭지점을 잇는 직선입니다. 두 꼭지점은 최소
//! [`MIN_TIP_DISTANCE_DAYS`]일 떨어져 있어야 합니다.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snowball_core::{OhlcvBar, SeriesFrame};

use crate::error::{MetricsError, MetricsResult};
use crate::price::{to_points, LinePoint};

/// 두 꼭지점 사이 최소 간격 (일).
pub const MIN_TIP_DISTANCE_DAYS: i64 = 5;

/// 꼭지점 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tip {
    /// 고점 (저항선)
    Top,
    /// 저점 (지지선)
    Bottom,
}

/// 저항선과 지지선.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundLines {
    /// 저항선
    pub resist: Vec<LinePoint>,
    /// 지지선
    pub support: Vec<LinePoint>,
}

/// 두 꼭지점을 잇는 직선을 계산합니다.
///
/// 같은 값이면 더 최근 점을 먼저 고릅니다. x는 첫 점으로부터의 경과 일수 + 1 입니다.
pub fn tip_to_tip(points: &[LinePoint], tip: Tip, min_distance: i64) -> MetricsResult<Vec<LinePoint>> {
    let Some(first) = points.first().map(|p| p.date) else {
        return Err(MetricsError::InsufficientData {
            required: 2,
            provided: 0,
        });
    };
    let x = |date: NaiveDate| (1 + (date - first).num_days()) as f64;

    let mut ranked: Vec<&LinePoint> = points.iter().collect();
    ranked.sort_by(|a, b| {
        let by_value = match tip {
            Tip::Top => b.value.partial_cmp(&a.value),
            Tip::Bottom => a.value.partial_cmp(&b.value),
        };
        by_value.unwrap_or(Ordering::Equal).then(b.date.cmp(&a.date))
    });

    let (tip1, rest) = ranked.split_first().ok_or(MetricsError::InsufficientData {
        required: 2,
        provided: points.len(),
    })?;
    let tip2 = rest
        .iter()
        .find(|p| (p.date - tip1.date).num_days().abs() >= min_distance)
        .ok_or_else(|| {
            MetricsError::CalculationError(format!(
                "{}일 이상 떨어진 두 번째 꼭지점이 없습니다",
                min_distance
            ))
        })?;

    let (x1, y1) = (x(tip1.date), tip1.value);
    let (x2, y2) = (x(tip2.date), tip2.value);
    let slope = (y2 - y1) / (x2 - x1);
    let intercept = y2 - slope * x2;

    Ok(points
        .iter()
        .map(|p| LinePoint {
            date: p.date,
            value: slope * x(p.date) + intercept,
        })
        .collect())
}

/// 저항선/지지선.
///
/// OHLCV 테이블은 고가/저가, 단일 값 시계열은 값 자체를 사용합니다.
pub fn bound_lines(frame: &SeriesFrame) -> MetricsResult<BoundLines> {
    let (highs, lows) = match frame {
        SeriesFrame::Ohlcv(table) => {
            let column = |pick: fn(&OhlcvBar) -> Decimal| {
                table
                    .bars()
                    .iter()
                    .filter_map(|b| {
                        pick(b).to_f64().map(|value| LinePoint {
                            date: b.date,
                            value,
                        })
                    })
                    .collect::<Vec<_>>()
            };
            (column(|b| b.high), column(|b| b.low))
        }
        SeriesFrame::Values(series) => {
            let points = to_points(series);
            (points.clone(), points)
        }
    };

    Ok(BoundLines {
        resist: tip_to_tip(&highs, Tip::Top, MIN_TIP_DISTANCE_DAYS)?,
        support: tip_to_tip(&lows, Tip::Bottom, MIN_TIP_DISTANCE_DAYS)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use snowball_core::{OhlcvTable, ValuePoint, ValueSeries};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn points(values: &[f64]) -> Vec<LinePoint> {
        values
            .iter()
            .enumerate()
            .map(|(d, &value)| LinePoint {
                date: start() + Duration::days(d as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn test_tip_to_tip_skips_close_tips() {
        // 최고점 d2(10), 차순위 d3(9)는 너무 가까움 → d9(8)
        let values = [1.0, 2.0, 10.0, 9.0, 3.0, 2.0, 1.0, 2.0, 3.0, 8.0];
        let line = tip_to_tip(&points(&values), Tip::Top, 5).unwrap();

        assert_eq!(line.len(), values.len());
        assert!((line[2].value - 10.0).abs() < 1e-9);
        assert!((line[9].value - 8.0).abs() < 1e-9);
        // 기울기 -2/7
        assert!((line[0].value - (10.0 + 4.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tip_to_tip_bottom_prefers_latest_tie() {
        let values = [1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 1.0, 5.0];
        let line = tip_to_tip(&points(&values), Tip::Bottom, 5).unwrap();
        // 같은 저점 두 개 (d0, d6) → 수평선
        assert!(line.iter().all(|p| (p.value - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_tip_to_tip_errors() {
        assert!(matches!(
            tip_to_tip(&[], Tip::Top, 5),
            Err(MetricsError::InsufficientData { .. })
        ));
        assert!(matches!(
            tip_to_tip(&points(&[1.0, 2.0, 3.0]), Tip::Top, 5),
            Err(MetricsError::CalculationError(_))
        ));
    }

    #[test]
    fn test_bound_lines_for_table_and_series() {
        let bars: Vec<OhlcvBar> = (0..10)
            .map(|d| {
                let base = Decimal::from(100 + d);
                OhlcvBar::new(
                    start() + Duration::days(d),
                    base,
                    base + Decimal::from(5),
                    base - Decimal::from(5),
                    base,
                    1_000,
                )
            })
            .collect();
        let lines = bound_lines(&SeriesFrame::Ohlcv(OhlcvTable::new(bars))).unwrap();
        assert!((lines.resist[9].value - 114.0).abs() < 1e-9);
        assert!((lines.support[0].value - 95.0).abs() < 1e-9);

        let series = ValueSeries::new(
            "DGS10",
            (0..10)
                .map(|d| ValuePoint::new(start() + Duration::days(d), Some(Decimal::from(d % 4))))
                .collect(),
        );
        let lines = bound_lines(&SeriesFrame::Values(series)).unwrap();
        assert_eq!(lines.resist.len(), 10);
        assert_eq!(lines.support.len(), 10);
    }
}
