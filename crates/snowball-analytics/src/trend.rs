//! 회귀 추세선과 추세 강도.

use serde::{Deserialize, Serialize};
use snowball_core::ValueSeries;
use tracing::debug;

use crate::error::{MetricsError, MetricsResult};
use crate::price::{to_points, trailing, LinePoint, MetricLine};

/// 추세선 구간 (라벨, 일수).
pub const TREND_WINDOWS: [(&str, i64); 5] = [
    ("1M", 30),
    ("2M", 61),
    ("3M", 92),
    ("6M", 183),
    ("1Y", 365),
];

/// 최소제곱 직선.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// 기울기 (일당)
    pub slope: f64,
    /// 절편
    pub intercept: f64,
    /// 각 날짜의 회귀값
    pub points: Vec<LinePoint>,
}

/// 추세 강도.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStrength {
    /// 구간 라벨
    pub label: String,
    /// 일당 변화율 (%), 소수점 4자리
    pub value: Option<f64>,
}

/// 최소제곱 직선을 적합합니다.
///
/// x는 첫 점으로부터의 경과 일수 + 1 입니다.
pub fn fit(points: &[LinePoint]) -> MetricsResult<LinearFit> {
    let first = match points {
        [first, _, ..] => first.date,
        _ => {
            return Err(MetricsError::InsufficientData {
                required: 2,
                provided: points.len(),
            })
        }
    };

    let xs: Vec<f64> = points
        .iter()
        .map(|p| (1 + (p.date - first).num_days()) as f64)
        .collect();
    let n = points.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, p) in xs.iter().zip(points) {
        cov += (x - mean_x) * (p.value - mean_y);
        var_x += (x - mean_x).powi(2);
    }
    if var_x == 0.0 {
        return Err(MetricsError::CalculationError(
            "x 분산이 0입니다 (중복 날짜)".to_string(),
        ));
    }

    let slope = cov / var_x;
    let intercept = mean_y - slope * mean_x;
    let points = xs
        .iter()
        .zip(points)
        .map(|(x, p)| LinePoint {
            date: p.date,
            value: slope * x + intercept,
        })
        .collect();

    Ok(LinearFit {
        slope,
        intercept,
        points,
    })
}

/// 대표가의 구간별 회귀 추세선.
///
/// 구간 안에 점이 2개 미만이면 해당 추세선은 비어 있습니다.
pub fn trend_lines(typical: &ValueSeries) -> MetricsResult<Vec<MetricLine>> {
    let points = to_points(typical);
    if points.len() < 2 {
        return Err(MetricsError::InsufficientData {
            required: 2,
            provided: points.len(),
        });
    }

    let lines = TREND_WINDOWS
        .iter()
        .map(|&(label, days)| {
            let window = trailing(&points, days);
            let points = match fit(window) {
                Ok(fitted) => fitted.points,
                Err(e) => {
                    debug!(label = label, error = %e, "추세선 생략");
                    Vec::new()
                }
            };
            MetricLine {
                label: label.to_string(),
                days,
                points,
            }
        })
        .collect();
    Ok(lines)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 추세선별 강도: `round(100 * (끝 / 시작 - 1) / 일수, 4)`.
pub fn trend_strength(lines: &[MetricLine]) -> Vec<TrendStrength> {
    lines
        .iter()
        .map(|line| {
            let value = match (line.points.first(), line.points.last()) {
                (Some(first), Some(last)) if first.value != 0.0 => {
                    let days = (last.date - first.date).num_days();
                    (days > 0).then(|| {
                        round4(100.0 * (last.value / first.value - 1.0) / days as f64)
                    })
                }
                _ => None,
            };
            TrendStrength {
                label: line.label.clone(),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use snowball_core::ValuePoint;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
    }

    fn line_points(values: &[(i64, f64)]) -> Vec<LinePoint> {
        values
            .iter()
            .map(|&(d, value)| LinePoint {
                date: start() + Duration::days(d),
                value,
            })
            .collect()
    }

    #[test]
    fn test_fit_exact_line() {
        // y = 2x + 1, x = 1 + 경과일
        let points = line_points(&[(0, 3.0), (1, 5.0), (4, 11.0)]);
        let fitted = fit(&points).unwrap();

        assert!((fitted.slope - 2.0).abs() < 1e-9);
        assert!((fitted.intercept - 1.0).abs() < 1e-9);
        assert!((fitted.points[2].value - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_requires_two_points() {
        assert_eq!(
            fit(&line_points(&[(0, 1.0)])),
            Err(MetricsError::InsufficientData {
                required: 2,
                provided: 1
            })
        );
    }

    #[test]
    fn test_trend_lines_windows() {
        let typical = ValueSeries::new(
            "typical",
            (0..400)
                .map(|d| ValuePoint::new(start() + Duration::days(d), Some(Decimal::from(100 + d))))
                .collect(),
        );
        let lines = trend_lines(&typical).unwrap();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].label, "1M");
        // 경계일 포함
        assert_eq!(lines[0].points.len(), 31);
        assert_eq!(lines[4].points.len(), 366);

        let strength = trend_strength(&lines);
        let one_month = strength[0].value.unwrap();
        // 469 → 499, 30일
        assert!((one_month - 100.0 * (499.0 / 469.0 - 1.0) / 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_trend_strength_empty_line() {
        let line = MetricLine {
            label: "1Y".to_string(),
            days: 365,
            points: Vec::new(),
        };
        assert_eq!(trend_strength(&[line])[0].value, None);
    }

    proptest! {
        #[test]
        fn prop_fit_recovers_linear_series(
            slope in -50.0f64..50.0,
            intercept in -1000.0f64..1000.0,
            len in 2usize..60,
        ) {
            let points: Vec<LinePoint> = (0..len as i64)
                .map(|d| LinePoint {
                    date: start() + Duration::days(d * 2),
                    value: slope * (1 + d * 2) as f64 + intercept,
                })
                .collect();
            let fitted = fit(&points).unwrap();
            prop_assert!((fitted.slope - slope).abs() < 1e-6);
            prop_assert!((fitted.intercept - intercept).abs() < 1e-6);
        }
    }
}
