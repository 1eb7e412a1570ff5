//! 자주 쓰는 매크로 지표 프리셋.
//!
//! ECOS 세부항목과 FRED 시계열 중 자주 조회하는 것들에 이름을 붙여 둡니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use snowball_core::{MarketCategory, OhlcvBar, OhlcvTable, ValueSeries};
use tracing::info;

use crate::adapter::SourceRegistry;
use crate::error::{DataError, Result};
use crate::timeseries::TimeSeries;

/// 시장금리(일별) 통계표.
const ECOS_MARKET_RATES: &str = "817Y002";

/// 한국은행 기준금리 통계표.
const ECOS_BASE_RATE: &str = "722Y001";

/// 주요국 통화의 대원화 환율 통계표.
const ECOS_EXCHANGE_RATES: &str = "731Y003";

/// 매크로 지표 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroPreset {
    /// 한국은행 기준금리
    KrBaseRate,
    /// 국고채 1년
    KrTreasury1Y,
    /// 국고채 2년
    KrTreasury2Y,
    /// 국고채 3년
    KrTreasury3Y,
    /// 국고채 5년
    KrTreasury5Y,
    /// 국고채 10년
    KrTreasury10Y,
    /// CD 91일
    KrCd91D,
    /// CP 91일
    KrCp91D,
    /// 회사채 3년 AA-
    KrCorporateAa3Y,
    /// 회사채 3년 BBB-
    KrCorporateBbb3Y,
    /// 미국 연방기금 실효금리
    UsFedFunds,
    /// 미국채 2년
    UsTreasury2Y,
    /// 미국채 3개월
    UsTreasury3M,
    /// 미국채 10년
    UsTreasury10Y,
    /// 미국 10년 물가연동채
    UsTips10Y,
    /// 10년-3개월 금리차
    UsSpread10Y3M,
    /// 10년-2년 금리차
    UsSpread10Y2Y,
    /// 하이일드 스프레드
    UsHighYieldSpread,
    /// 5년 기대인플레이션
    UsBreakeven5Y,
    /// 10년 기대인플레이션
    UsBreakeven10Y,
    /// 소비자물가지수
    UsCpi,
    /// 브렌트유
    OilBrent,
    /// WTI
    OilWti,
}

impl MacroPreset {
    /// 전체 프리셋.
    pub const ALL: [MacroPreset; 23] = [
        Self::KrBaseRate,
        Self::KrTreasury1Y,
        Self::KrTreasury2Y,
        Self::KrTreasury3Y,
        Self::KrTreasury5Y,
        Self::KrTreasury10Y,
        Self::KrCd91D,
        Self::KrCp91D,
        Self::KrCorporateAa3Y,
        Self::KrCorporateBbb3Y,
        Self::UsFedFunds,
        Self::UsTreasury2Y,
        Self::UsTreasury3M,
        Self::UsTreasury10Y,
        Self::UsTips10Y,
        Self::UsSpread10Y3M,
        Self::UsSpread10Y2Y,
        Self::UsHighYieldSpread,
        Self::UsBreakeven5Y,
        Self::UsBreakeven10Y,
        Self::UsCpi,
        Self::OilBrent,
        Self::OilWti,
    ];

    /// 프리셋 이름 (소문자).
    pub fn name(&self) -> &'static str {
        match self {
            Self::KrBaseRate => "krsir",
            Self::KrTreasury1Y => "krty1y",
            Self::KrTreasury2Y => "krty2y",
            Self::KrTreasury3Y => "krty3y",
            Self::KrTreasury5Y => "krty5y",
            Self::KrTreasury10Y => "krty10y",
            Self::KrCd91D => "krcd91d",
            Self::KrCp91D => "krcp91d",
            Self::KrCorporateAa3Y => "krlcapcb3y",
            Self::KrCorporateBbb3Y => "krjunkcb3y",
            Self::UsFedFunds => "ussir",
            Self::UsTreasury2Y => "usty2y",
            Self::UsTreasury3M => "usty3m",
            Self::UsTreasury10Y => "usty10y",
            Self::UsTips10Y => "usty10yinfl",
            Self::UsSpread10Y3M => "ustyd10y3m",
            Self::UsSpread10Y2Y => "ustyd10y2y",
            Self::UsHighYieldSpread => "usjunkspread",
            Self::UsBreakeven5Y => "usbei5y",
            Self::UsBreakeven10Y => "usbei10y",
            Self::UsCpi => "uscpi",
            Self::OilBrent => "brent",
            Self::OilWti => "wti",
        }
    }

    /// (티커, 라벨).
    pub fn source(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::KrBaseRate => (ECOS_BASE_RATE, Some("한국은행 기준금리")),
            Self::KrTreasury1Y => (ECOS_MARKET_RATES, Some("국고채(1년)")),
            Self::KrTreasury2Y => (ECOS_MARKET_RATES, Some("국고채(2년)")),
            Self::KrTreasury3Y => (ECOS_MARKET_RATES, Some("국고채(3년)")),
            Self::KrTreasury5Y => (ECOS_MARKET_RATES, Some("국고채(5년)")),
            Self::KrTreasury10Y => (ECOS_MARKET_RATES, Some("국고채(10년)")),
            Self::KrCd91D => (ECOS_MARKET_RATES, Some("CD(91일)")),
            Self::KrCp91D => (ECOS_MARKET_RATES, Some("CP(91일)")),
            Self::KrCorporateAa3Y => (ECOS_MARKET_RATES, Some("회사채(3년, AA-)")),
            Self::KrCorporateBbb3Y => (ECOS_MARKET_RATES, Some("회사채(3년, BBB-)")),
            Self::UsFedFunds => ("DFF", None),
            Self::UsTreasury2Y => ("DGS2", None),
            Self::UsTreasury3M => ("DGS3MO", None),
            Self::UsTreasury10Y => ("DGS10", None),
            Self::UsTips10Y => ("DFII10", None),
            Self::UsSpread10Y3M => ("T10Y3M", None),
            Self::UsSpread10Y2Y => ("T10Y2Y", None),
            Self::UsHighYieldSpread => ("BAMLH0A0HYM2", None),
            Self::UsBreakeven5Y => ("T5YIE", None),
            Self::UsBreakeven10Y => ("T10YIE", None),
            Self::UsCpi => ("CPIAUCSL", None),
            Self::OilBrent => ("DCOILBRENTEU", None),
            Self::OilWti => ("DCOILWTICO", None),
        }
    }

    /// 시장 분류. 라벨이 있으면 ECOS, 없으면 FRED입니다.
    pub fn category(&self) -> MarketCategory {
        match self.source() {
            (_, Some(_)) => MarketCategory::MacroStatistics,
            (_, None) => MarketCategory::ForeignMacro,
        }
    }

    /// 프리셋으로 시계열 접근자를 만듭니다.
    pub fn time_series(
        &self,
        registry: SourceRegistry,
        as_of: NaiveDate,
        lookback_years: u32,
    ) -> TimeSeries {
        let (ticker, label) = self.source();
        let series =
            TimeSeries::with_as_of(ticker, self.category(), registry, as_of, lookback_years);
        match label {
            Some(label) => series.with_label(label),
            None => series,
        }
    }
}

impl fmt::Display for MacroPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MacroPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lowered)
            .ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

/// 원/달러 환율 라벨 (시가, 고가, 저가, 종가).
const USD_KRW_LABELS: [&str; 4] = [
    "원/달러(시가)",
    "원/달러(고가)",
    "원/달러(저가)",
    "원/달러(종가)",
];

/// 네 개의 값 시계열을 OHLC 테이블로 합칩니다.
///
/// 네 값이 모두 있는 날짜만 포함하며 거래량은 0입니다.
pub fn compose_ohlc(
    open: &ValueSeries,
    high: &ValueSeries,
    low: &ValueSeries,
    close: &ValueSeries,
) -> OhlcvTable {
    let mut rows: BTreeMap<NaiveDate, [Option<Decimal>; 4]> = BTreeMap::new();
    for (idx, series) in [open, high, low, close].into_iter().enumerate() {
        for (date, value) in series.observed() {
            rows.entry(date).or_insert([None; 4])[idx] = Some(value);
        }
    }

    let bars = rows
        .into_iter()
        .filter_map(|(date, values)| match values {
            [Some(o), Some(h), Some(l), Some(c)] => Some(OhlcvBar::new(date, o, h, l, c, 0)),
            _ => None,
        })
        .collect();
    OhlcvTable::new(bars)
}

/// ECOS 원/달러 시가/고가/저가/종가로 OHLC 테이블을 만듭니다.
pub async fn usd_krw_ohlc(
    registry: &SourceRegistry,
    as_of: NaiveDate,
    lookback_years: u32,
) -> Result<OhlcvTable> {
    let mut legs = Vec::with_capacity(USD_KRW_LABELS.len());
    for label in USD_KRW_LABELS {
        let mut series = TimeSeries::with_as_of(
            ECOS_EXCHANGE_RATES,
            MarketCategory::MacroStatistics,
            registry.clone(),
            as_of,
            lookback_years,
        )
        .with_label(label);
        legs.push(series.close().await?);
    }

    let [open, high, low, close] = <[ValueSeries; 4]>::try_from(legs)
        .map_err(|_| DataError::SchemaMismatch("원/달러 시계열 개수 불일치".to_string()))?;
    let table = compose_ohlc(&open, &high, &low, &close);

    info!(count = table.len(), "원/달러 OHLC 구성 완료");
    Ok(table)
}
