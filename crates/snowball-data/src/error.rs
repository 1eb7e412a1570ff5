//! 데이터 모듈 오류 타입.

use snowball_core::{MarketCategory, SnowballError};
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 소스 호출 실패 (재시도하지 않음)
    #[error("Source unavailable ({provider}): {message}")]
    SourceUnavailable { provider: String, message: String },

    /// 요청 타임아웃
    #[error("Request timed out ({provider}): {message}")]
    Timeout { provider: String, message: String },

    /// 통계표에 요청한 라벨이 없음
    #[error("Label '{label}' not found in table {table}")]
    LabelNotFound {
        table: String,
        label: String,
        available: Vec<String>,
    },

    /// 매크로 통계 티커에 라벨이 지정되지 않음
    #[error("Label is required for macro statistics ticker {ticker}")]
    MissingLabel { ticker: String },

    /// 분류에 대응하는 어댑터가 없음
    #[error("No source adapter registered for category {0}")]
    UnsupportedCategory(MarketCategory),

    /// 응답 형식이 예상과 다름
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// 잘못된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// 외부 소스 실패 오류를 생성합니다.
    pub fn unavailable(provider: impl Into<String>, message: impl ToString) -> Self {
        DataError::SourceUnavailable {
            provider: provider.into(),
            message: message.to_string(),
        }
    }
}

impl From<SnowballError> for DataError {
    fn from(err: SnowballError) -> Self {
        match err {
            SnowballError::Config(msg) => DataError::Config(msg),
            SnowballError::InvalidInput(msg) => DataError::InvalidInput(msg),
            SnowballError::Serialization(msg) => DataError::SchemaMismatch(msg),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SchemaMismatch(err.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::SchemaMismatch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
