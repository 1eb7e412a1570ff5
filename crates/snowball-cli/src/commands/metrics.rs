//! 파생 지표 명령.

use anyhow::{Context, Result};
use snowball_analytics::MetricsReport;
use snowball_core::AppConfig;
use snowball_data::SymbolDirectory;

use super::output::OutputFormat;
use super::{open_series, SeriesArgs};

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// 요약 리포트를 사람이 읽는 형식으로 변환합니다.
pub fn format_report(name: &str, unit: &str, report: &MetricsReport) -> String {
    let mut output = format!("{} ({})\n", name, unit);
    output.push_str(&format!("  Typical : {}\n", optional(report.typical)));
    output.push_str(&format!("  52W High: {}\n", optional(report.high_52w)));
    output.push_str(&format!("  52W Low : {}\n", optional(report.low_52w)));

    output.push_str("\nReturns (%)\n");
    for ret in &report.returns {
        output.push_str(&format!(
            "  {:<4} {}\n",
            ret.label,
            optional(ret.value.map(|v| format!("{:.2}", v)))
        ));
    }

    output.push_str("\nTrend strength (%/day)\n");
    for strength in &report.trend_strength {
        output.push_str(&format!("  {:<4} {}\n", strength.label, optional(strength.value)));
    }

    if let Some(bounds) = &report.bounds {
        output.push_str("\nBounds (last)\n");
        let last = |line: &[snowball_analytics::LinePoint]| {
            optional(line.last().map(|p| format!("{:.2}", p.value)))
        };
        output.push_str(&format!("  resist  {}\n", last(&bounds.resist)));
        output.push_str(&format!("  support {}\n", last(&bounds.support)));
    }
    output.trim_end().to_string()
}

/// 시계열을 조회해 파생 지표를 계산합니다.
pub async fn metrics(config: &AppConfig, args: &SeriesArgs, format: OutputFormat) -> Result<String> {
    let mut directory = SymbolDirectory::new(config)?;
    let mut series = open_series(config, &mut directory, args).await?;
    let frame = series.fetch().await?;

    let name = directory
        .display_name(series.ticker(), series.category(), series.label())
        .await?;
    let report = MetricsReport::compute(&frame, &name)
        .with_context(|| format!("Failed to compute metrics for {}", series.ticker()))?;

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize to JSON")
        }
        OutputFormat::Table | OutputFormat::Csv => Ok(format_report(&name, series.unit(), &report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use snowball_analytics::{PeriodReturn, TrendStrength};

    #[test]
    fn test_format_report() {
        let report = MetricsReport {
            typical: Some(dec!(77000)),
            high_52w: Some(dec!(79800)),
            low_52w: None,
            returns: vec![PeriodReturn {
                label: "3M".to_string(),
                value: Some(12.3456),
            }],
            trend_strength: vec![TrendStrength {
                label: "1M".to_string(),
                value: Some(0.2132),
            }],
            trend_lines: Vec::new(),
            bounds: None,
        };

        let text = format_report("삼성전자", "KRW", &report);
        assert!(text.starts_with("삼성전자 (KRW)"));
        assert!(text.contains("52W Low : -"));
        assert!(text.contains("3M   12.35"));
        assert!(text.contains("1M   0.2132"));
        assert!(!text.contains("Bounds"));
    }
}
