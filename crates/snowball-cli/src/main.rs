//! 시세/매크로 데이터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 삼성전자 일봉 (최근 3년)
//! snowball fetch 005930 -y 3
//!
//! # 국고채 3년 금리
//! snowball fetch 817Y002 -l "국고채(3년)" -e 20240131
//!
//! # 티커 분류 확인
//! snowball locate AAPL
//!
//! # 통계표 세부항목
//! snowball macro-items 817Y002
//!
//! # 파생 지표
//! snowball metrics 1001 --format json
//!
//! # 프리셋 목록과 조회
//! snowball preset
//! snowball preset usty10y -y 5
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use snowball_core::{init_logging, AppConfig, LogConfig};
use tracing::{error, info};

use snowball_cli::commands::output::{write_output, OutputFormat};
use snowball_cli::commands::symbols::SymbolMarket;
use snowball_cli::commands::{fetch, locate, macro_items, metrics, preset, symbols, SeriesArgs};

#[derive(Parser)]
#[command(name = "snowball")]
#[command(about = "Snowball - 국내/미국 시세 및 매크로 통계 조회 도구", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 티커의 시장 분류 확인
    Locate {
        /// 티커
        ticker: String,

        /// 매크로 통계 세부항목 라벨
        #[arg(short, long)]
        label: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 시계열 조회 (OHLCV 또는 단일 값)
    Fetch {
        #[command(flatten)]
        series: SeriesArgs,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 종목/통계표 목록 조회
    Symbols {
        /// 목록 종류 (kr, us, ecos)
        #[arg(short, long, value_enum, default_value = "kr")]
        market: SymbolMarket,

        /// 검색 키워드 (이름 또는 티커)
        #[arg(short, long)]
        search: Option<String>,

        /// 최대 결과 수 (0 = 무제한)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// ECOS 통계표의 세부항목 목록
    MacroItems {
        /// 통계표 코드 (예: 817Y002)
        table: String,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 파생 지표 계산 (수익률, 추세, 지지/저항)
    Metrics {
        #[command(flatten)]
        series: SeriesArgs,

        /// 출력 형식 (table, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// 매크로 프리셋 조회 (이름이 없으면 목록)
    Preset {
        /// 프리셋 이름 (예: krty3y, usty10y, usdkrw)
        name: Option<String>,

        /// 기준일 (YYYYMMDD, 기본: 오늘)
        #[arg(short, long)]
        end: Option<String>,

        /// 조회 연수 (기본: 설정값)
        #[arg(short, long)]
        years: Option<u32>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Commands::Locate {
            ticker,
            label,
            format,
        } => {
            let content = locate::locate(&config, &ticker, label.as_deref(), format).await?;
            write_output(&content, None)?;
        }

        Commands::Fetch {
            series,
            format,
            output,
        } => {
            let content = fetch::fetch(&config, &series, format).await?;
            write_output(&content, output.as_deref())?;
        }

        Commands::Symbols {
            market,
            search,
            limit,
            format,
            output,
        } => {
            let content =
                symbols::symbols(&config, market, search.as_deref(), limit, format).await?;
            write_output(&content, output.as_deref())?;
        }

        Commands::MacroItems { table, format } => {
            let content = macro_items::macro_items(&config, &table, format).await?;
            write_output(&content, None)?;
        }

        Commands::Metrics { series, format } => {
            let content = metrics::metrics(&config, &series, format).await?;
            write_output(&content, None)?;
        }

        Commands::Preset {
            name,
            end,
            years,
            format,
            output,
        } => {
            let content =
                preset::preset(&config, name.as_deref(), end.as_deref(), years, format).await?;
            write_output(&content, output.as_deref())?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    init_logging(LogConfig::from_settings(&config.logging)).map_err(|e| anyhow!("{}", e))?;
    info!(config = %cli.config, "설정 로드 완료");

    if let Err(e) = run(cli, config).await {
        error!("명령 실행 실패: {:#}", e);
        return Err(e);
    }
    Ok(())
}
