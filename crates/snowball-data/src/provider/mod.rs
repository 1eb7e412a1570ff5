//! 데이터 Provider 모듈.
//!
//! 외부 소스와 직접 통신하는 저수준 클라이언트를 정의합니다.
//! 각 클라이언트는 원시 응답을 파싱해 레코드로 돌려주며, 보정이나
//! 기간 절단 같은 정책은 `adapter` 모듈이 담당합니다.
//!
//! ## KRX 정보데이터시스템
//! - `KrxClient`: 지수/개별종목 OHLCV, 전종목 목록
//!
//! ## 한국은행 ECOS
//! - `EcosClient`: 통계표 목록, 통계 세부항목 목록, 통계 조회
//!
//! ## FRED
//! - `FredClient`: 그래프 CSV 시계열
//!
//! ## 미국 상장 종목
//! - `UsListingClient`: 파이프 구분 심볼 디렉터리

pub mod ecos;
pub mod fred;
pub mod krx;
pub mod us_listing;

pub use ecos::{EcosClient, EcosItem, EcosTable};
pub use fred::FredClient;
pub use krx::{is_common_share, stock_isin, KrxClient, KrxListing, KrxMarket, LISTING_LOOKBACK_DAYS};
pub use us_listing::{UsListing, UsListingClient};

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use snowball_core::SourcesConfig;

use crate::error::{DataError, Result};

/// 설정에 맞는 HTTP 클라이언트를 생성합니다.
///
/// 모든 요청에는 명시적인 타임아웃이 적용됩니다.
pub fn http_client(config: &SourcesConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// reqwest 오류를 데이터 오류로 변환합니다. 타임아웃은 별도 종류로 구분합니다.
pub(crate) fn request_error(provider: &str, err: reqwest::Error) -> DataError {
    if err.is_timeout() {
        DataError::Timeout {
            provider: provider.to_string(),
            message: err.to_string(),
        }
    } else {
        DataError::unavailable(provider, err)
    }
}

/// 요청을 보내고 성공 응답의 본문을 읽습니다.
pub(crate) async fn send_for_text(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| request_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataError::unavailable(
            provider,
            format!("HTTP {}", status),
        ));
    }

    response.text().await.map_err(|e| request_error(provider, e))
}

/// 쉼표로 구분된 숫자 문자열을 파싱합니다.
///
/// 빈 문자열, `-`, `.`은 결측(`None`)으로 처리하며, 그 외 파싱 실패는 스키마 오류입니다.
pub(crate) fn parse_grouped_number(raw: &str) -> Result<Option<Decimal>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "." {
        return Ok(None);
    }

    let cleaned = trimmed.replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
        .map_err(|_| DataError::SchemaMismatch(format!("숫자 파싱 실패: {}", raw)))
}

/// 응답 일부를 오류 메시지용으로 잘라냅니다.
pub(crate) fn snippet(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
