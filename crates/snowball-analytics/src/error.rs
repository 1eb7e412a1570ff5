//! 지표 계산 오류.

use thiserror::Error;

/// 파생 지표 계산 오류.
#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type MetricsResult<T> = Result<T, MetricsError>;
