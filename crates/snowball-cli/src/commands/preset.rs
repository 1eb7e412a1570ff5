//! 매크로 프리셋 명령.

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use snowball_core::{parse_yyyymmdd, AppConfig, MarketCategory, SeriesFrame};
use snowball_data::{usd_krw_ohlc, MacroPreset, SourceRegistry};
use tracing::info;

use super::output::{render_frame, render_rows, OutputFormat, TableRow};

/// 원/달러 OHLC 프리셋 이름.
pub const USD_KRW_PRESET: &str = "usdkrw";

/// 프리셋 목록 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct PresetRow {
    pub name: String,
    pub ticker: String,
    pub label: Option<String>,
    pub category: String,
}

impl From<MacroPreset> for PresetRow {
    fn from(preset: MacroPreset) -> Self {
        let (ticker, label) = preset.source();
        Self {
            name: preset.name().to_string(),
            ticker: ticker.to_string(),
            label: label.map(str::to_string),
            category: preset.category().to_string(),
        }
    }
}

impl TableRow for PresetRow {
    fn header() -> Vec<(&'static str, usize)> {
        vec![("name", 14), ("ticker", 14), ("label", 20), ("category", 18)]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.ticker.clone(),
            self.label.clone().unwrap_or_else(|| "-".to_string()),
            self.category.clone(),
        ]
    }
}

/// 원/달러 OHLC를 포함한 전체 프리셋 목록.
pub fn preset_rows() -> Vec<PresetRow> {
    let mut rows: Vec<PresetRow> = MacroPreset::ALL.into_iter().map(PresetRow::from).collect();
    rows.push(PresetRow {
        name: USD_KRW_PRESET.to_string(),
        ticker: "731Y003".to_string(),
        label: Some("원/달러(시가/고가/저가/종가)".to_string()),
        category: MarketCategory::MacroStatistics.to_string(),
    });
    rows
}

/// 프리셋 시계열을 조회합니다. 이름이 없으면 프리셋 목록을 반환합니다.
pub async fn preset(
    config: &AppConfig,
    name: Option<&str>,
    end: Option<&str>,
    years: Option<u32>,
    format: OutputFormat,
) -> Result<String> {
    let Some(name) = name else {
        return render_rows(&preset_rows(), format);
    };

    let as_of = match end {
        Some(raw) => parse_yyyymmdd(raw).with_context(|| format!("Invalid end date: {}", raw))?,
        None => config.cache.today()?,
    };
    let years = years.unwrap_or(config.cache.lookback_years);
    let registry =
        SourceRegistry::from_config(&config.sources).context("Failed to build source registry")?;

    let frame = if name.eq_ignore_ascii_case(USD_KRW_PRESET) {
        SeriesFrame::Ohlcv(usd_krw_ohlc(&registry, as_of, years).await?)
    } else {
        let preset: MacroPreset = name.parse().map_err(|e: String| anyhow!(e))?;
        let mut series = preset.time_series(registry, as_of, years);
        series.fetch().await?.as_ref().clone()
    };

    info!(preset = %name, rows = frame.len(), "프리셋 조회 완료");
    render_frame(&frame, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rows() {
        let rows = preset_rows();
        assert_eq!(rows.len(), MacroPreset::ALL.len() + 1);

        let krty3y = rows.iter().find(|r| r.name == "krty3y").unwrap();
        assert_eq!(krty3y.ticker, "817Y002");
        assert_eq!(krty3y.label.as_deref(), Some("국고채(3년)"));

        let dgs10 = rows.iter().find(|r| r.name == "usty10y").unwrap();
        assert_eq!(dgs10.ticker, "DGS10");
        assert!(dgs10.label.is_none());

        assert_eq!(rows.last().unwrap().name, USD_KRW_PRESET);
    }
}
