//! 통계표 세부항목 조회.

use anyhow::{Context, Result};
use serde::Serialize;
use snowball_core::AppConfig;
use snowball_data::{EcosItem, SymbolDirectory};

use super::output::{render_rows, OutputFormat, TableRow};

/// 세부항목 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct ItemRow {
    pub name: String,
    pub code: String,
    pub cycle: String,
    pub start: String,
    pub end: String,
    pub count: u64,
}

impl From<&EcosItem> for ItemRow {
    fn from(item: &EcosItem) -> Self {
        Self {
            name: item.name.clone(),
            code: item.code.clone(),
            cycle: item.cycle.clone(),
            start: item.start.clone(),
            end: item.end.clone(),
            count: item.count,
        }
    }
}

impl TableRow for ItemRow {
    fn header() -> Vec<(&'static str, usize)> {
        vec![
            ("name", 36),
            ("code", 12),
            ("cycle", 5),
            ("start", 8),
            ("end", 8),
            ("count", 8),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.code.clone(),
            self.cycle.clone(),
            self.start.clone(),
            self.end.clone(),
            self.count.to_string(),
        ]
    }
}

/// 통계표의 세부항목 목록을 반환합니다.
pub async fn macro_items(config: &AppConfig, table: &str, format: OutputFormat) -> Result<String> {
    let mut directory = SymbolDirectory::new(config)?;
    let items = directory
        .macro_series_within_table(table)
        .await
        .with_context(|| format!("Failed to list items of table: {}", table))?;

    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
    render_rows(&rows, format)
}
