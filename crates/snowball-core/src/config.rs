//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `SNOWBALL__*` 환경 변수 순으로 덮어씁니다.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SnowballError, SnowballResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 외부 데이터 소스 설정
    #[serde(default)]
    pub sources: SourcesConfig,
    /// 시계열 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
    /// 종목 디렉터리 설정
    #[serde(default)]
    pub symbols: SymbolsConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 외부 데이터 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// KRX 정보데이터시스템 JSON 엔드포인트
    pub krx_base_url: String,
    /// ECOS Open API 기본 URL
    pub ecos_base_url: String,
    /// ECOS 인증키 (비어 있으면 `ECOS_API_KEY` 환경 변수, 그 다음 "sample")
    pub ecos_api_key: String,
    /// FRED 그래프 CSV 기본 URL
    pub fred_base_url: String,
    /// 미국 상장 종목 목록 (파이프 구분 텍스트)
    pub us_listing_url: String,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            krx_base_url: "https://data.krx.co.kr/comm/bldAttendant/getJsonData.cmd".to_string(),
            ecos_base_url: "https://ecos.bok.or.kr/api".to_string(),
            ecos_api_key: String::new(),
            fred_base_url: "https://fred.stlouisfed.org/graph/fredgraph.csv".to_string(),
            us_listing_url: "https://www.nasdaqtrader.com/dynamic/symdir/nasdaqtraded.txt"
                .to_string(),
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

impl SourcesConfig {
    /// 실제로 사용할 ECOS 인증키를 반환합니다.
    pub fn resolved_ecos_key(&self) -> String {
        if !self.ecos_api_key.is_empty() {
            return self.ecos_api_key.clone();
        }
        std::env::var("ECOS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "sample".to_string())
    }
}

/// 시계열 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 기준일 계산에 쓰는 시간대 (IANA 이름)
    pub timezone: String,
    /// 기본 조회 기간 (년)
    pub lookback_years: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Seoul".to_string(),
            lookback_years: 20,
        }
    }
}

impl CacheConfig {
    /// 설정된 시간대를 파싱합니다.
    pub fn tz(&self) -> SnowballResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SnowballError::Config(format!("알 수 없는 시간대: {}", self.timezone)))
    }

    /// 설정된 시간대 기준 오늘 날짜.
    pub fn today(&self) -> SnowballResult<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.tz()?).date_naive())
    }
}

/// 종목 디렉터리 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SymbolsConfig {
    /// 업종 보정 테이블 CSV 경로 (없으면 내장 테이블 사용)
    pub sector_table_path: Option<PathBuf>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> SnowballResult<Self> {
        let builder = config::Config::builder()
            .set_default("cache.timezone", "Asia/Seoul")?
            .set_default("cache.lookback_years", 20)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("SNOWBALL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let loaded: Self = config.try_deserialize()?;
        loaded.cache.tz()?;
        Ok(loaded)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> SnowballResult<Self> {
        Self::load("config/default.toml")
    }
}
