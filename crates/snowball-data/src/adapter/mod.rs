//! 시장 분류별 데이터 소스 어댑터.
//!
//! 어댑터는 정규화된 요청을 받아 OHLCV 테이블 또는 단일 값 시계열을 반환하며,
//! 소스별 보정(휴장일 보정, 라벨 선택, 기간 절단)을 수행합니다.
//!
//! | 분류 | 어댑터 |
//! |---|---|
//! | 국내 지수 | [`KrxIndexAdapter`] |
//! | 국내 주식 | [`KrxEquityAdapter`] |
//! | 매크로 통계 | [`EcosAdapter`] |
//! | 해외 주식 | [`YahooAdapter`] |
//! | 해외 경제 지표 | [`FredAdapter`] |

pub mod ecos;
pub mod fred;
pub mod krx;
pub mod yahoo;

pub use ecos::{select_item, EcosAdapter};
pub use fred::FredAdapter;
pub use krx::{repair_equity_halts, repair_index_halts, KrxEquityAdapter, KrxIndexAdapter};
pub use yahoo::YahooAdapter;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use snowball_core::{LookbackWindow, MarketCategory, SeriesFrame, SourcesConfig};

use crate::error::{DataError, Result};
use crate::provider::{EcosClient, FredClient, KrxClient};

/// 어댑터 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRequest {
    /// 티커
    pub ticker: String,
    /// 하위 시계열 라벨 (매크로 통계 전용)
    pub label: Option<String>,
    /// 조회 구간
    pub window: LookbackWindow,
    /// 조회 연수
    pub lookback_years: u32,
}

impl AdapterRequest {
    /// 새 요청을 생성합니다.
    pub fn new(
        ticker: impl Into<String>,
        label: Option<String>,
        window: LookbackWindow,
        lookback_years: u32,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            label,
            window,
            lookback_years,
        }
    }
}

/// 데이터 소스 어댑터 트레잇.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// 로그에 표시할 어댑터 이름.
    fn name(&self) -> &'static str;

    /// 요청한 시계열을 조회합니다.
    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame>;
}

/// 시장 분류별 어댑터 등록부.
///
/// 분류마다 하나의 슬롯을 가지며, 조회는 분류에 대한 완전한 `match`로 수행됩니다.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    local_index: Option<Arc<dyn SourceAdapter>>,
    local_equity: Option<Arc<dyn SourceAdapter>>,
    macro_statistics: Option<Arc<dyn SourceAdapter>>,
    foreign_equity: Option<Arc<dyn SourceAdapter>>,
    foreign_macro: Option<Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    /// 빈 등록부를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 어댑터를 모두 등록한 등록부를 생성합니다.
    pub fn from_config(config: &SourcesConfig) -> Result<Self> {
        let krx = KrxClient::new(config)?;
        Ok(Self::new()
            .with_adapter(
                MarketCategory::LocalIndex,
                Arc::new(KrxIndexAdapter::new(krx.clone())),
            )
            .with_adapter(
                MarketCategory::LocalEquity,
                Arc::new(KrxEquityAdapter::new(krx)),
            )
            .with_adapter(
                MarketCategory::MacroStatistics,
                Arc::new(EcosAdapter::new(EcosClient::new(config)?)),
            )
            .with_adapter(MarketCategory::ForeignEquity, Arc::new(YahooAdapter::new(config)?))
            .with_adapter(
                MarketCategory::ForeignMacro,
                Arc::new(FredAdapter::new(FredClient::new(config)?)),
            ))
    }

    fn slot_mut(&mut self, category: MarketCategory) -> &mut Option<Arc<dyn SourceAdapter>> {
        match category {
            MarketCategory::LocalIndex => &mut self.local_index,
            MarketCategory::LocalEquity => &mut self.local_equity,
            MarketCategory::MacroStatistics => &mut self.macro_statistics,
            MarketCategory::ForeignEquity => &mut self.foreign_equity,
            MarketCategory::ForeignMacro => &mut self.foreign_macro,
        }
    }

    /// 분류에 어댑터를 등록합니다. 기존 어댑터는 교체됩니다.
    pub fn with_adapter(
        mut self,
        category: MarketCategory,
        adapter: Arc<dyn SourceAdapter>,
    ) -> Self {
        *self.slot_mut(category) = Some(adapter);
        self
    }

    /// 분류에 대응하는 어댑터를 반환합니다.
    pub fn adapter(&self, category: MarketCategory) -> Result<Arc<dyn SourceAdapter>> {
        let slot = match category {
            MarketCategory::LocalIndex => &self.local_index,
            MarketCategory::LocalEquity => &self.local_equity,
            MarketCategory::MacroStatistics => &self.macro_statistics,
            MarketCategory::ForeignEquity => &self.foreign_equity,
            MarketCategory::ForeignMacro => &self.foreign_macro,
        };
        slot.clone()
            .ok_or(DataError::UnsupportedCategory(category))
    }

    /// 등록된 분류 목록.
    pub fn registered(&self) -> Vec<MarketCategory> {
        MarketCategory::ALL
            .into_iter()
            .filter(|c| self.adapter(*c).is_ok())
            .collect()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<(MarketCategory, &'static str)> = MarketCategory::ALL
            .into_iter()
            .filter_map(|c| self.adapter(c).ok().map(|a| (c, a.name())))
            .collect();
        f.debug_struct("SourceRegistry")
            .field("adapters", &names)
            .finish()
    }
}
