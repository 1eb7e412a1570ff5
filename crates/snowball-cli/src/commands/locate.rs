//! 티커 분류 조회.

use anyhow::{Context, Result};
use serde::Serialize;
use snowball_core::{AppConfig, MarketCategory};
use snowball_data::SymbolDirectory;

use super::output::{render_rows, OutputFormat, TableRow};

/// 분류 결과.
#[derive(Debug, Clone, Serialize)]
pub struct LocateRow {
    pub ticker: String,
    pub name: String,
    pub category: MarketCategory,
    pub market: &'static str,
    pub unit: &'static str,
}

impl TableRow for LocateRow {
    fn header() -> Vec<(&'static str, usize)> {
        vec![
            ("ticker", 12),
            ("name", 30),
            ("category", 18),
            ("market", 8),
            ("unit", 6),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.ticker.clone(),
            self.name.clone(),
            self.category.to_string(),
            self.market.to_string(),
            self.unit.to_string(),
        ]
    }
}

/// 티커의 시장 분류를 판정하고 출력합니다.
pub async fn locate(
    config: &AppConfig,
    ticker: &str,
    label: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut directory = SymbolDirectory::new(config)?;
    let category = directory
        .locate(ticker)
        .await
        .with_context(|| format!("Failed to locate ticker: {}", ticker))?;
    let name = directory.display_name(ticker, category, label).await?;

    let row = LocateRow {
        ticker: ticker.to_string(),
        name,
        category,
        market: category.market_code(),
        unit: category.unit(),
    };
    render_rows(&[row], format)
}
