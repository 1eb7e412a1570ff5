//! 시계열 캐시.
//!
//! `TimeSeries`는 하나의 티커에 대해 (티커, 라벨, 기준일, 조회 연수)마다
//! 한 번만 어댑터를 호출하고, 결과를 인스턴스 수명 동안 보관합니다.
//! 기준일이나 조회 연수를 바꾸면 새 슬롯이 만들어지며 이전 슬롯은 그대로 남습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use snowball_data::{SourceRegistry, SymbolDirectory, TimeSeries};
//!
//! let registry = SourceRegistry::from_config(&config.sources)?;
//! let mut directory = SymbolDirectory::new(&config)?;
//! let mut series = TimeSeries::locate("005930", &mut directory, registry, &config.cache).await?;
//! let table = series.ohlcv().await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use snowball_core::{
    parse_yyyymmdd, CacheConfig, LookbackWindow, MarketCategory, OhlcvTable, SeriesFrame,
    ValueSeries,
};
use tracing::{debug, info, instrument};

use crate::adapter::{AdapterRequest, SourceRegistry};
use crate::directory::SymbolDirectory;
use crate::error::{DataError, Result};

/// 캐시 슬롯 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// 티커
    pub ticker: String,
    /// 라벨
    pub label: Option<String>,
    /// 기준일
    pub as_of: NaiveDate,
    /// 조회 연수
    pub lookback_years: u32,
}

/// 티커 하나에 대한 메모이즈된 시계열 접근자.
#[derive(Debug)]
pub struct TimeSeries {
    ticker: String,
    label: Option<String>,
    category: MarketCategory,
    as_of: NaiveDate,
    lookback_years: u32,
    registry: SourceRegistry,
    slots: HashMap<SlotKey, Arc<SeriesFrame>>,
}

impl TimeSeries {
    /// 분류가 이미 정해진 티커로 생성합니다.
    ///
    /// 기준일은 설정된 시간대의 오늘, 조회 연수는 설정 기본값입니다.
    pub fn new(
        ticker: impl Into<String>,
        category: MarketCategory,
        registry: SourceRegistry,
        cache: &CacheConfig,
    ) -> Result<Self> {
        Ok(Self::with_as_of(
            ticker,
            category,
            registry,
            cache.today()?,
            cache.lookback_years,
        ))
    }

    /// 기준일과 조회 연수를 지정해 생성합니다.
    pub fn with_as_of(
        ticker: impl Into<String>,
        category: MarketCategory,
        registry: SourceRegistry,
        as_of: NaiveDate,
        lookback_years: u32,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            label: None,
            category,
            as_of,
            lookback_years,
            registry,
            slots: HashMap::new(),
        }
    }

    /// 디렉터리로 분류를 판정해 생성합니다.
    pub async fn locate(
        ticker: impl Into<String>,
        directory: &mut SymbolDirectory,
        registry: SourceRegistry,
        cache: &CacheConfig,
    ) -> Result<Self> {
        let ticker = ticker.into();
        let category = directory.locate(&ticker).await?;
        debug!(ticker = %ticker, category = %category, "티커 분류 완료");
        Self::new(ticker, category, registry, cache)
    }

    /// 라벨을 지정합니다.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 티커.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// 라벨.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// 시장 분류.
    pub fn category(&self) -> MarketCategory {
        self.category
    }

    /// 표시 단위.
    pub fn unit(&self) -> &'static str {
        self.category.unit()
    }

    /// 기준일.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// 조회 연수.
    pub fn lookback_years(&self) -> u32 {
        self.lookback_years
    }

    /// 라벨을 변경합니다. 이후 조회부터 적용됩니다.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// 기준일을 변경합니다. 이미 캐시된 슬롯은 영향을 받지 않습니다.
    pub fn set_as_of(&mut self, as_of: NaiveDate) {
        self.as_of = as_of;
    }

    /// `YYYYMMDD` 문자열로 기준일을 변경합니다.
    pub fn set_as_of_str(&mut self, raw: &str) -> Result<()> {
        self.as_of = parse_yyyymmdd(raw)?;
        Ok(())
    }

    /// 조회 연수를 변경합니다. 이미 캐시된 슬롯은 영향을 받지 않습니다.
    pub fn set_lookback_years(&mut self, years: u32) {
        self.lookback_years = years;
    }

    /// 현재 설정의 조회 구간.
    pub fn window(&self) -> LookbackWindow {
        LookbackWindow::new(self.as_of, self.lookback_years)
    }

    /// 현재 설정의 슬롯 키.
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            ticker: self.ticker.clone(),
            label: self.label.clone(),
            as_of: self.as_of,
            lookback_years: self.lookback_years,
        }
    }

    /// 보관 중인 슬롯 수.
    pub fn cached_slots(&self) -> usize {
        self.slots.len()
    }

    /// 특정 슬롯의 값 (조회하지 않음).
    pub fn cached(&self, key: &SlotKey) -> Option<Arc<SeriesFrame>> {
        self.slots.get(key).cloned()
    }

    /// 현재 설정의 시계열을 반환합니다.
    ///
    /// 1. 매크로 통계인데 라벨이 없으면 조회 전에 `MissingLabel`
    /// 2. 같은 슬롯이 있으면 네트워크 호출 없이 같은 `Arc`를 반환
    /// 3. 없으면 분류에 맞는 어댑터를 호출하고 결과를 저장
    ///
    /// 오류는 재시도 없이 그대로 전달됩니다.
    #[instrument(skip(self), fields(ticker = %self.ticker, category = %self.category))]
    pub async fn fetch(&mut self) -> Result<Arc<SeriesFrame>> {
        if self.category.requires_label() && self.label.is_none() {
            return Err(DataError::MissingLabel {
                ticker: self.ticker.clone(),
            });
        }

        let key = self.slot_key();
        if let Some(frame) = self.slots.get(&key) {
            debug!(as_of = %key.as_of, years = key.lookback_years, "캐시 적중");
            return Ok(Arc::clone(frame));
        }

        let adapter = self.registry.adapter(self.category)?;
        let request = AdapterRequest::new(
            self.ticker.clone(),
            self.label.clone(),
            self.window(),
            self.lookback_years,
        );
        let frame = Arc::new(adapter.fetch(&request).await?);

        info!(
            adapter = adapter.name(),
            window = %request.window,
            rows = frame.len(),
            "시계열 조회 완료"
        );
        self.slots.insert(key, Arc::clone(&frame));
        Ok(frame)
    }

    /// OHLCV 테이블.
    ///
    /// 단일 값 시계열 티커는 다섯 개 컬럼을 가진 빈 테이블을 반환합니다.
    pub async fn ohlcv(&mut self) -> Result<OhlcvTable> {
        let frame = self.fetch().await?;
        Ok(match frame.as_ref() {
            SeriesFrame::Ohlcv(table) => table.clone(),
            SeriesFrame::Values(_) => OhlcvTable::empty(),
        })
    }

    /// 종가 시계열 (테이블) 또는 값 시계열 그 자체.
    pub async fn close(&mut self) -> Result<ValueSeries> {
        let frame = self.fetch().await?;
        let name = self.label.clone().unwrap_or_else(|| self.ticker.clone());
        Ok(frame.close_series(&name))
    }
}
