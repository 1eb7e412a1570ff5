//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 티커 분류와 시계열 조회
//! - 종목/통계표 목록
//! - 파생 지표 요약
//! - 매크로 프리셋

pub mod commands;
