//! 시장 분류와 티커 분류 규칙.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// 티커가 속한 시장 분류.
///
/// 분류마다 하나의 데이터 소스 어댑터가 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCategory {
    /// 국내 지수 (KRX, 4자리 숫자)
    LocalIndex,
    /// 국내 주식 (KRX, 6자리 숫자)
    LocalEquity,
    /// 한국은행 ECOS 통계표
    MacroStatistics,
    /// 해외 주식 (미국 상장 종목)
    ForeignEquity,
    /// 해외 경제 지표 (FRED, 기본값)
    ForeignMacro,
}

impl MarketCategory {
    /// 전체 분류 목록.
    pub const ALL: [MarketCategory; 5] = [
        Self::LocalIndex,
        Self::LocalEquity,
        Self::MacroStatistics,
        Self::ForeignEquity,
        Self::ForeignMacro,
    ];

    /// 짧은 시장 코드 (krx, krse, ecos, nyse, fred).
    pub fn market_code(&self) -> &'static str {
        match self {
            Self::LocalIndex => "krx",
            Self::LocalEquity => "krse",
            Self::MacroStatistics => "ecos",
            Self::ForeignEquity => "nyse",
            Self::ForeignMacro => "fred",
        }
    }

    /// 하위 시계열 라벨이 필요한 분류인지 여부.
    pub fn requires_label(&self) -> bool {
        matches!(self, Self::MacroStatistics)
    }

    /// OHLCV 테이블을 반환하는 분류인지 여부.
    pub fn is_tabular(&self) -> bool {
        matches!(
            self,
            Self::LocalIndex | Self::LocalEquity | Self::ForeignEquity
        )
    }

    /// 값의 표시 단위.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::LocalIndex => "-",
            Self::LocalEquity => "KRW",
            Self::ForeignEquity => "USD",
            Self::MacroStatistics | Self::ForeignMacro => "%",
        }
    }
}

impl fmt::Display for MarketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LocalIndex => "local_index",
            Self::LocalEquity => "local_equity",
            Self::MacroStatistics => "macro_statistics",
            Self::ForeignEquity => "foreign_equity",
            Self::ForeignMacro => "foreign_macro",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for MarketCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.to_string() == lowered || c.market_code() == lowered)
            .ok_or_else(|| format!("Unknown market category: {}", s))
    }
}

/// 코드 집합 조회 인터페이스.
///
/// 분류 규칙은 카탈로그의 소속 여부만 확인하므로 집합과 맵 모두 사용할 수 있습니다.
pub trait CodeSet {
    /// 코드가 집합에 포함되어 있는지 확인합니다.
    fn contains_code(&self, code: &str) -> bool;
}

impl CodeSet for HashSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

impl<V> CodeSet for HashMap<String, V> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains_key(code)
    }
}

impl<V> CodeSet for BTreeMap<String, V> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains_key(code)
    }
}

impl CodeSet for [&str] {
    fn contains_code(&self, code: &str) -> bool {
        self.iter().any(|c| *c == code)
    }
}

fn is_numeric_of_len(ticker: &str, len: usize) -> bool {
    ticker.len() == len && ticker.bytes().all(|b| b.is_ascii_digit())
}

/// 자릿수 규칙만으로 결정되는 분류.
///
/// 4자리 숫자는 국내 지수, 6자리 숫자는 국내 주식입니다.
/// 두 규칙 모두 해당하지 않으면 `None`을 반환하며, 카탈로그 조회가 필요합니다.
pub fn digit_category(ticker: &str) -> Option<MarketCategory> {
    if is_numeric_of_len(ticker, 4) {
        Some(MarketCategory::LocalIndex)
    } else if is_numeric_of_len(ticker, 6) {
        Some(MarketCategory::LocalEquity)
    } else {
        None
    }
}

/// 티커를 시장 분류로 판정합니다.
///
/// 순서가 중요한 다섯 단계 규칙을 적용하며 실패하지 않습니다.
/// 1. 4자리 숫자 → 국내 지수
/// 2. 6자리 숫자 → 국내 주식
/// 3. ECOS 통계표 코드 → 매크로 통계
/// 4. 해외 주식 심볼 → 해외 주식
/// 5. 그 외 → 해외 경제 지표
pub fn classify<M, F>(ticker: &str, macro_codes: &M, foreign_equities: &F) -> MarketCategory
where
    M: CodeSet + ?Sized,
    F: CodeSet + ?Sized,
{
    if let Some(category) = digit_category(ticker) {
        return category;
    }
    if macro_codes.contains_code(ticker) {
        MarketCategory::MacroStatistics
    } else if foreign_equities.contains_code(ticker) {
        MarketCategory::ForeignEquity
    } else {
        MarketCategory::ForeignMacro
    }
}
