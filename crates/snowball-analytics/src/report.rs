//! 지표 요약 리포트.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snowball_core::SeriesFrame;
use tracing::info;

use crate::bound::{bound_lines, BoundLines};
use crate::error::MetricsResult;
use crate::price::{high_52w, low_52w, relative_returns, typical_price, MetricLine};
use crate::trend::{trend_lines, trend_strength, TrendStrength};

/// 구간별 최종 수익률.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// 구간 라벨
    pub label: String,
    /// 누적 수익률 (%)
    pub value: Option<f64>,
}

/// 한 종목의 파생 지표 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// 마지막 대표가
    pub typical: Option<Decimal>,
    /// 52주 최고 종가
    pub high_52w: Option<Decimal>,
    /// 52주 최저 종가
    pub low_52w: Option<Decimal>,
    /// 구간별 최종 수익률
    pub returns: Vec<PeriodReturn>,
    /// 추세 강도
    pub trend_strength: Vec<TrendStrength>,
    /// 추세선
    pub trend_lines: Vec<MetricLine>,
    /// 지지/저항선 (꼭지점을 찾지 못하면 `None`)
    pub bounds: Option<BoundLines>,
}

impl MetricsReport {
    /// 시계열 하나로 전체 지표를 계산합니다.
    ///
    /// 52주 최고/최저는 OHLCV 테이블에서만 계산됩니다.
    pub fn compute(frame: &SeriesFrame, name: &str) -> MetricsResult<Self> {
        let typical = typical_price(frame);
        let close = frame.close_series(name);
        let table = frame.as_ohlcv();

        let lines = trend_lines(&typical)?;
        let strength = trend_strength(&lines);
        let returns = relative_returns(&close)
            .into_iter()
            .map(|line| PeriodReturn {
                value: line.last(),
                label: line.label,
            })
            .collect();
        let bounds = bound_lines(frame).ok();

        info!(
            name = name,
            rows = frame.len(),
            bounds = bounds.is_some(),
            "파생 지표 계산 완료"
        );

        Ok(Self {
            typical: typical.observed().last().map(|(_, v)| v),
            high_52w: table.and_then(high_52w),
            low_52w: table.and_then(low_52w),
            returns,
            trend_strength: strength,
            trend_lines: lines,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;
    use snowball_core::{OhlcvBar, OhlcvTable, ValuePoint, ValueSeries};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
    }

    #[test]
    fn test_report_for_table() {
        let bars = (0..120)
            .map(|d| {
                let close = Decimal::from(1_000 + d * 10);
                OhlcvBar::new(
                    start() + Duration::days(d),
                    close,
                    close + dec!(30),
                    close - dec!(30),
                    close,
                    10_000,
                )
            })
            .collect();
        let frame = SeriesFrame::Ohlcv(OhlcvTable::new(bars));
        let report = MetricsReport::compute(&frame, "005930").unwrap();

        assert_eq!(report.typical, Some(dec!(2190)));
        assert_eq!(report.high_52w, Some(dec!(2190)));
        assert_eq!(report.low_52w, Some(dec!(1000)));
        assert_eq!(report.returns.len(), 6);
        assert!(report.trend_strength.iter().all(|s| s.value.unwrap() > 0.0));
        assert!(report.bounds.is_some());

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"trend_strength\""));
    }

    #[test]
    fn test_report_for_value_series() {
        let series = ValueSeries::new(
            "DGS10",
            (0..3)
                .map(|d| ValuePoint::new(start() + Duration::days(d), Some(Decimal::from(4 - d))))
                .collect(),
        );
        let report = MetricsReport::compute(&SeriesFrame::Values(series), "DGS10").unwrap();

        assert_eq!(report.typical, Some(dec!(2)));
        assert_eq!(report.high_52w, None);
        // 꼭지점 간격 부족
        assert!(report.bounds.is_none());
    }
}
