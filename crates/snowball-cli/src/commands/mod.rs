//! CLI 명령어 구현 모듈.

pub mod fetch;
pub mod locate;
pub mod macro_items;
pub mod metrics;
pub mod output;
pub mod preset;
pub mod symbols;

use anyhow::{Context, Result};
use clap::Args;
use snowball_core::AppConfig;
use snowball_data::{SourceRegistry, SymbolDirectory, TimeSeries};
use tracing::debug;

/// 시계열 조회 공통 인자.
#[derive(Debug, Clone, Args)]
pub struct SeriesArgs {
    /// 티커 (예: 005930, 1001, 817Y002, AAPL, DGS10)
    pub ticker: String,

    /// 매크로 통계 세부항목 라벨 (예: "국고채(3년)")
    #[arg(short, long)]
    pub label: Option<String>,

    /// 기준일 (YYYYMMDD, 기본: 오늘)
    #[arg(short, long)]
    pub end: Option<String>,

    /// 조회 연수 (기본: 설정값)
    #[arg(short, long)]
    pub years: Option<u32>,
}

/// 기준일과 조회 연수를 시계열에 적용합니다.
pub fn apply_window(series: &mut TimeSeries, end: Option<&str>, years: Option<u32>) -> Result<()> {
    if let Some(end) = end {
        series
            .set_as_of_str(end)
            .with_context(|| format!("Invalid end date: {}", end))?;
    }
    if let Some(years) = years {
        series.set_lookback_years(years);
    }
    Ok(())
}

/// 인자로 시계열 접근자를 만듭니다.
pub async fn open_series(
    config: &AppConfig,
    directory: &mut SymbolDirectory,
    args: &SeriesArgs,
) -> Result<TimeSeries> {
    let registry =
        SourceRegistry::from_config(&config.sources).context("Failed to build source registry")?;
    let mut series = TimeSeries::locate(args.ticker.as_str(), directory, registry, &config.cache)
        .await
        .with_context(|| format!("Failed to locate ticker: {}", args.ticker))?;

    series.set_label(args.label.clone());
    apply_window(&mut series, args.end.as_deref(), args.years)?;

    debug!(
        ticker = %series.ticker(),
        category = %series.category(),
        window = %series.window(),
        "시계열 준비 완료"
    );
    Ok(series)
}
