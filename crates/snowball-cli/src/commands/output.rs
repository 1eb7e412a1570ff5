//! 출력 형식과 렌더링.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use snowball_core::{SeriesFrame, OHLCV_COLUMNS};
use tracing::info;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// 표 형식으로 출력할 수 있는 행.
pub trait TableRow: Serialize {
    /// 컬럼 헤더와 너비.
    fn header() -> Vec<(&'static str, usize)>;

    /// 셀 값 (헤더 순서).
    fn cells(&self) -> Vec<String>;
}

/// 문자열 자르기 (UTF-8 안전).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// 행 목록을 지정한 형식의 문자열로 변환합니다.
pub fn render_rows<T: TableRow>(rows: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(rows)),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(T::header().iter().map(|(name, _)| name.to_lowercase()))?;
            for row in rows {
                writer.write_record(row.cells())?;
            }
            let bytes = writer.into_inner().context("Failed to flush CSV")?;
            String::from_utf8(bytes).context("CSV output is not UTF-8")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).context("Failed to serialize to JSON")
        }
    }
}

fn format_table<T: TableRow>(rows: &[T]) -> String {
    let header = T::header();
    let mut output = String::new();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&header)
            .map(|(cell, (_, width))| format!("{:<width$}", truncate(cell, *width), width = *width))
            .collect::<Vec<_>>()
            .join(" ")
    };

    output.push_str(&line(header.iter().map(|(name, _)| name.to_uppercase()).collect()));
    output.push('\n');
    let total: usize = header.iter().map(|(_, w)| w + 1).sum();
    output.push_str(&"-".repeat(total));
    output.push('\n');
    for row in rows {
        output.push_str(line(row.cells()).trim_end());
        output.push('\n');
    }
    output.push_str(&format!("Total: {} rows", rows.len()));
    output
}

/// OHLCV 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcvRow {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: u64,
}

impl TableRow for OhlcvRow {
    fn header() -> Vec<(&'static str, usize)> {
        std::iter::once(("date", 10))
            .chain(OHLCV_COLUMNS.iter().map(|c| (*c, 14)))
            .collect()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.open.clone(),
            self.high.clone(),
            self.low.clone(),
            self.close.clone(),
            self.volume.to_string(),
        ]
    }
}

/// 단일 값 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct ValueRow {
    pub date: String,
    pub value: Option<String>,
}

impl TableRow for ValueRow {
    fn header() -> Vec<(&'static str, usize)> {
        vec![("date", 10), ("value", 14)]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.date.clone(), self.value.clone().unwrap_or_default()]
    }
}

/// 시계열 프레임을 문자열로 변환합니다.
pub fn render_frame(frame: &SeriesFrame, format: OutputFormat) -> Result<String> {
    match frame {
        SeriesFrame::Ohlcv(table) => {
            let rows: Vec<OhlcvRow> = table
                .bars()
                .iter()
                .map(|b| OhlcvRow {
                    date: b.date.to_string(),
                    open: b.open.to_string(),
                    high: b.high.to_string(),
                    low: b.low.to_string(),
                    close: b.close.to_string(),
                    volume: b.volume,
                })
                .collect();
            render_rows(&rows, format)
        }
        SeriesFrame::Values(series) => {
            let rows: Vec<ValueRow> = series
                .points()
                .iter()
                .map(|p| ValueRow {
                    date: p.date.to_string(),
                    value: p.value.map(|v| v.to_string()),
                })
                .collect();
            render_rows(&rows, format)
        }
    }
}

/// 파일 또는 stdout에 출력합니다.
pub fn write_output(content: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(path) = output_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{}", content);
    }
    Ok(())
}
