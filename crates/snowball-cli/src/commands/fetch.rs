//! 시계열 조회 명령.

use anyhow::Result;
use snowball_core::AppConfig;
use snowball_data::SymbolDirectory;
use tracing::info;

use super::output::{render_frame, OutputFormat};
use super::{open_series, SeriesArgs};

/// 시계열을 조회해 지정한 형식의 문자열로 반환합니다.
pub async fn fetch(config: &AppConfig, args: &SeriesArgs, format: OutputFormat) -> Result<String> {
    let mut directory = SymbolDirectory::new(config)?;
    let mut series = open_series(config, &mut directory, args).await?;
    let frame = series.fetch().await?;

    let name = directory
        .display_name(series.ticker(), series.category(), series.label())
        .await?;
    info!(
        ticker = %series.ticker(),
        name = %name,
        unit = series.unit(),
        rows = frame.len(),
        "시계열 조회 완료"
    );

    render_frame(&frame, format)
}
