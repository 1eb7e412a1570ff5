//! 종목 목록 조회.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use snowball_core::AppConfig;
use snowball_data::SymbolDirectory;
use tracing::info;

use super::output::{render_rows, OutputFormat, TableRow};

/// 목록 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolMarket {
    /// 국내 상장 종목
    Kr,
    /// 미국 상장 종목
    Us,
    /// ECOS 통계표
    Ecos,
}

/// 종목 목록 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolRow {
    pub ticker: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TableRow for SymbolRow {
    fn header() -> Vec<(&'static str, usize)> {
        vec![("ticker", 12), ("name", 40), ("market", 12), ("detail", 30)]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.ticker.clone(),
            self.name.clone(),
            self.market.clone().unwrap_or_else(|| "-".to_string()),
            self.detail.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}

fn matches(row: &SymbolRow, needle: &str) -> bool {
    row.ticker.to_lowercase().contains(needle) || row.name.to_lowercase().contains(needle)
}

/// 목록을 검색어로 거르고 티커 순으로 정렬합니다. `limit`이 0이면 제한이 없습니다.
pub fn select_rows(mut rows: Vec<SymbolRow>, search: Option<&str>, limit: usize) -> Vec<SymbolRow> {
    if let Some(search) = search {
        let needle = search.to_lowercase();
        rows.retain(|row| matches(row, &needle));
    }
    rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    if limit > 0 {
        rows.truncate(limit);
    }
    rows
}

/// 종목 목록을 조회합니다.
pub async fn symbols(
    config: &AppConfig,
    market: SymbolMarket,
    search: Option<&str>,
    limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let mut directory = SymbolDirectory::new(config)?;

    let rows: Vec<SymbolRow> = match market {
        SymbolMarket::Kr => directory
            .local_equities()
            .await?
            .values()
            .map(|e| SymbolRow {
                ticker: e.code.clone(),
                name: e.name.clone(),
                market: Some(e.market.clone()),
                detail: e.sector.clone(),
            })
            .collect(),
        SymbolMarket::Us => directory
            .foreign_equities()
            .await?
            .values()
            .map(|e| SymbolRow {
                ticker: e.symbol.clone(),
                name: e.name.clone(),
                market: Some(e.exchange.clone()),
                detail: e.etf.then(|| "ETF".to_string()),
            })
            .collect(),
        SymbolMarket::Ecos => directory
            .macro_catalog()
            .await?
            .values()
            .map(|t| SymbolRow {
                ticker: t.code.clone(),
                name: t.name.clone(),
                market: Some(t.cycle.clone()),
                detail: t.publisher.clone(),
            })
            .collect(),
    };

    let total = rows.len();
    let rows = select_rows(rows, search, limit);
    info!(market = ?market, total = total, count = rows.len(), "종목 목록 조회 완료");

    render_rows(&rows, format)
}
