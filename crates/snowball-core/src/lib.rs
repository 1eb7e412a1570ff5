//! # Snowball Core
//!
//! 시세/매크로 데이터 툴킷의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 워크스페이스 전반에서 사용되는 기본 타입을 제공합니다:
//! - 시장 분류 (`MarketCategory`)와 티커 분류 규칙
//! - OHLCV 테이블 및 단일 값 시계열
//! - 조회 기간 (`LookbackWindow`)과 통계 주기 (`Cycle`)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
