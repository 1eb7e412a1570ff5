//! 국내/해외 시장 데이터 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - 티커 분류와 종목 목록을 담당하는 심볼 디렉터리
//! - KRX, ECOS, Yahoo Finance, FRED 원격 클라이언트
//! - 시장 분류별 소스 어댑터와 등록부
//! - 티커별 메모이즈 시계열 캐시
//! - 자주 쓰는 매크로 지표 프리셋

pub mod adapter;
pub mod directory;
pub mod error;
pub mod presets;
pub mod provider;
pub mod timeseries;

pub use adapter::{
    AdapterRequest, EcosAdapter, FredAdapter, KrxEquityAdapter, KrxIndexAdapter, SourceAdapter,
    SourceRegistry, YahooAdapter,
};
pub use directory::{ForeignEquity, LocalEquity, MacroTable, SymbolDirectory, SymbolHit};
pub use error::{DataError, Result};
pub use presets::{compose_ohlc, usd_krw_ohlc, MacroPreset};
pub use provider::{EcosItem, EcosTable, KrxMarket, UsListing};
pub use timeseries::{SlotKey, TimeSeries};
