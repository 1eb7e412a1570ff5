//! 핵심 에러 타입.
//!
//! 설정 로드와 입력 파싱 단계에서 발생하는 에러를 정의합니다.
//! 데이터 소스 관련 에러는 `snowball-data`의 `DataError`가 담당합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum SnowballError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type SnowballResult<T> = Result<T, SnowballError>;

impl From<serde_json::Error> for SnowballError {
    fn from(err: serde_json::Error) -> Self {
        SnowballError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for SnowballError {
    fn from(err: config::ConfigError) -> Self {
        SnowballError::Config(err.to_string())
    }
}
