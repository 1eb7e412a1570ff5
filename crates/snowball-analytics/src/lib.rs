//! 파생 지표 계산.
//!
//! 이 크레이트는 캐시된 OHLCV 테이블과 단일 값 시계열 위에서 동작하는
//! 순수 함수들을 제공합니다:
//! - 대표가, 52주 최고/최저, 구간별 상대 수익률
//! - 회귀 추세선과 추세 강도
//! - 지지선/저항선
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use snowball_analytics::MetricsReport;
//!
//! let frame = series.fetch().await?;
//! let report = MetricsReport::compute(&frame, series.ticker())?;
//! println!("{:?}", report.trend_strength);
//! ```

pub mod bound;
pub mod error;
pub mod price;
pub mod report;
pub mod trend;

pub use bound::{bound_lines, tip_to_tip, BoundLines, Tip, MIN_TIP_DISTANCE_DAYS};
pub use error::{MetricsError, MetricsResult};
pub use price::{
    high_52w, low_52w, relative_returns, typical_price, LinePoint, MetricLine, RETURN_WINDOWS,
    WEEKS_52_DAYS,
};
pub use report::{MetricsReport, PeriodReturn};
pub use trend::{fit, trend_lines, trend_strength, LinearFit, TrendStrength, TREND_WINDOWS};
