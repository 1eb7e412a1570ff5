//! 종목 디렉터리.
//!
//! 국내 주식, 해외 주식, 매크로 통계표 카탈로그를 처음 접근할 때 한 번만
//! 불러와 인스턴스 수명 동안 유지합니다. 원격 조회 실패는 빈 목록으로
//! 대체하지 않고 그대로 호출자에게 전달합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use snowball_data::SymbolDirectory;
//!
//! let mut directory = SymbolDirectory::new(&config)?;
//! let category = directory.locate("005930").await?;
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snowball_core::{digit_category, AppConfig, MarketCategory};
use tracing::{info, instrument};

use crate::error::{DataError, Result};
use crate::provider::{EcosClient, EcosItem, KrxClient, KrxListing, KrxMarket, UsListingClient};

/// 내장 업종 보정 테이블.
const BUNDLED_SECTORS: &str = include_str!("../data/krse_sectors.csv");

/// 주요 KRX 지수 이름.
const INDEX_NAMES: &[(&str, &str)] = &[
    ("1001", "코스피"),
    ("1002", "코스피 대형주"),
    ("1003", "코스피 중형주"),
    ("1004", "코스피 소형주"),
    ("1028", "코스피 200"),
    ("1034", "코스피 100"),
    ("1035", "코스피 50"),
    ("1163", "코스피 고배당 50"),
    ("1164", "코스피 배당성장 50"),
    ("2001", "코스닥"),
    ("2002", "코스닥 대형주"),
    ("2003", "코스닥 중형주"),
    ("2004", "코스닥 소형주"),
    ("2203", "코스닥 150"),
    ("5042", "KRX 100"),
    ("5300", "KRX 300"),
];

/// KRX 지수 이름을 조회합니다.
pub fn index_name(code: &str) -> Option<&'static str> {
    INDEX_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// 국내 상장 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEquity {
    /// 단축코드
    pub code: String,
    /// 종목명
    pub name: String,
    /// 업종
    pub sector: Option<String>,
    /// 시장
    pub market: String,
    /// 표준코드
    pub isin: String,
}

/// 해외 상장 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignEquity {
    /// 심볼
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 거래소
    pub exchange: String,
    /// ETF 여부
    pub etf: bool,
}

/// 매크로 통계표.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTable {
    /// 통계표 코드
    pub code: String,
    /// 통계명
    pub name: String,
    /// 주기
    pub cycle: String,
    /// 출처
    pub publisher: Option<String>,
}

/// 검색 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolHit {
    /// 티커
    pub ticker: String,
    /// 이름
    pub name: String,
    /// 분류
    pub category: MarketCategory,
}

/// 업종 보정 테이블 행.
#[derive(Debug, Clone, Deserialize)]
struct SectorRow {
    code: String,
    name: String,
    #[serde(default)]
    sector: Option<String>,
}

/// 업종 보정 테이블을 파싱합니다.
fn parse_sector_table(text: &str) -> Result<HashMap<String, SectorRow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = HashMap::new();
    for record in reader.deserialize() {
        let row: SectorRow = record?;
        rows.insert(row.code.clone(), row);
    }
    Ok(rows)
}

/// 원격 목록과 보정 테이블을 단축코드로 결합합니다.
///
/// 보정 테이블에 있으면 이름과 업종을 덮어쓰고, 없으면 원격 값을 유지합니다.
/// 보정 테이블에만 있는 코드는 포함하지 않습니다.
fn merge_listing(
    listings: Vec<KrxListing>,
    overrides: &HashMap<String, SectorRow>,
) -> HashMap<String, LocalEquity> {
    listings
        .into_iter()
        .map(|listing| {
            let local = overrides.get(&listing.code);
            let equity = LocalEquity {
                name: local
                    .map(|row| row.name.clone())
                    .unwrap_or(listing.name),
                sector: local
                    .and_then(|row| row.sector.clone())
                    .filter(|s| !s.is_empty())
                    .or(listing.sector),
                market: listing.market,
                isin: listing.isin,
                code: listing.code,
            };
            (equity.code.clone(), equity)
        })
        .collect()
}

/// 종목 디렉터리.
#[derive(Debug)]
pub struct SymbolDirectory {
    krx: KrxClient,
    ecos: EcosClient,
    us: UsListingClient,
    sector_table: String,
    listing_date: NaiveDate,
    local_equities: Option<HashMap<String, LocalEquity>>,
    foreign_equities: Option<HashMap<String, ForeignEquity>>,
    macro_catalog: Option<HashMap<String, MacroTable>>,
    table_items: HashMap<String, Vec<EcosItem>>,
}

impl SymbolDirectory {
    /// 설정으로 디렉터리를 생성합니다. 네트워크 호출은 하지 않습니다.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let sector_table = match &config.symbols.sector_table_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                DataError::Config(format!("업종 테이블 읽기 실패 ({}): {}", path.display(), e))
            })?,
            None => BUNDLED_SECTORS.to_string(),
        };

        Ok(Self {
            krx: KrxClient::new(&config.sources)?,
            ecos: EcosClient::new(&config.sources)?,
            us: UsListingClient::new(&config.sources)?,
            sector_table,
            listing_date: config.cache.today()?,
            local_equities: None,
            foreign_equities: None,
            macro_catalog: None,
            table_items: HashMap::new(),
        })
    }

    /// 종목 목록 기준일을 지정합니다 (기본값: 오늘).
    pub fn with_listing_date(mut self, date: NaiveDate) -> Self {
        self.listing_date = date;
        self
    }

    /// 티커의 시장 분류를 판정합니다.
    ///
    /// 자릿수 규칙으로 결정되면 네트워크를 사용하지 않으며,
    /// 분류 순서상 필요한 카탈로그만 불러옵니다.
    #[instrument(skip(self))]
    pub async fn locate(&mut self, ticker: &str) -> Result<MarketCategory> {
        if let Some(category) = digit_category(ticker) {
            return Ok(category);
        }
        if self.macro_catalog().await?.contains_key(ticker) {
            return Ok(MarketCategory::MacroStatistics);
        }
        if self.foreign_equities().await?.contains_key(ticker) {
            return Ok(MarketCategory::ForeignEquity);
        }
        Ok(MarketCategory::ForeignMacro)
    }

    /// 국내 상장 종목 (원격 목록 + 업종 보정 테이블).
    pub async fn local_equities(&mut self) -> Result<&HashMap<String, LocalEquity>> {
        let equities = match self.local_equities.take() {
            Some(loaded) => loaded,
            None => {
                let overrides = parse_sector_table(&self.sector_table)?;
                let listings = self.krx.latest_listing(KrxMarket::All, self.listing_date).await?;
                let merged = merge_listing(listings, &overrides);
                info!(count = merged.len(), overrides = overrides.len(), "국내 종목 목록 로드 완료");
                merged
            }
        };
        Ok(&*self.local_equities.insert(equities))
    }

    /// 해외 상장 종목.
    pub async fn foreign_equities(&mut self) -> Result<&HashMap<String, ForeignEquity>> {
        let equities = match self.foreign_equities.take() {
            Some(loaded) => loaded,
            None => {
                let listings = self.us.fetch().await?;
                listings
                    .into_iter()
                    .map(|l| {
                        (
                            l.symbol.clone(),
                            ForeignEquity {
                                symbol: l.symbol,
                                name: l.name,
                                exchange: l.exchange,
                                etf: l.etf,
                            },
                        )
                    })
                    .collect()
            }
        };
        Ok(&*self.foreign_equities.insert(equities))
    }

    /// 검색 가능한 매크로 통계표 카탈로그.
    pub async fn macro_catalog(&mut self) -> Result<&HashMap<String, MacroTable>> {
        let catalog = match self.macro_catalog.take() {
            Some(loaded) => loaded,
            None => {
                let tables = self.ecos.table_list().await?;
                let catalog: HashMap<String, MacroTable> = tables
                    .into_iter()
                    .filter(|t| t.searchable)
                    .map(|t| {
                        (
                            t.code.clone(),
                            MacroTable {
                                code: t.code,
                                name: t.name,
                                cycle: t.cycle,
                                publisher: t.publisher,
                            },
                        )
                    })
                    .collect();
                info!(count = catalog.len(), "매크로 통계표 카탈로그 로드 완료");
                catalog
            }
        };
        Ok(&*self.macro_catalog.insert(catalog))
    }

    /// 통계표 안의 세부항목 목록 (통계표별로 캐시).
    pub async fn macro_series_within_table(&mut self, table: &str) -> Result<&[EcosItem]> {
        if !self.table_items.contains_key(table) {
            let items = self.ecos.item_list(table).await?;
            self.table_items.insert(table.to_string(), items);
        }
        Ok(self.table_items.get(table).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// 국내/해외 종목을 코드 또는 이름으로 검색합니다 (대소문자 무시).
    pub async fn search(&mut self, query: &str, limit: usize) -> Result<Vec<SymbolHit>> {
        let needle = query.to_lowercase();
        let matches = |code: &str, name: &str| {
            code.to_lowercase().contains(&needle) || name.to_lowercase().contains(&needle)
        };

        let mut local: Vec<SymbolHit> = self
            .local_equities()
            .await?
            .values()
            .filter(|e| matches(&e.code, &e.name))
            .map(|e| SymbolHit {
                ticker: e.code.clone(),
                name: e.name.clone(),
                category: MarketCategory::LocalEquity,
            })
            .collect();
        local.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        let mut foreign: Vec<SymbolHit> = self
            .foreign_equities()
            .await?
            .values()
            .filter(|e| matches(&e.symbol, &e.name))
            .map(|e| SymbolHit {
                ticker: e.symbol.clone(),
                name: e.name.clone(),
                category: MarketCategory::ForeignEquity,
            })
            .collect();
        foreign.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        Ok(local.into_iter().chain(foreign).take(limit).collect())
    }

    /// 표시용 이름.
    ///
    /// 지수는 지수명, 국내 주식은 종목명, 매크로 통계는 라벨, 그 외는 티커를 사용합니다.
    pub async fn display_name(
        &mut self,
        ticker: &str,
        category: MarketCategory,
        label: Option<&str>,
    ) -> Result<String> {
        let name = match category {
            MarketCategory::LocalIndex => index_name(ticker).unwrap_or(ticker).to_string(),
            MarketCategory::LocalEquity => self
                .local_equities()
                .await?
                .get(ticker)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| ticker.to_string()),
            MarketCategory::MacroStatistics => label.unwrap_or(ticker).to_string(),
            MarketCategory::ForeignEquity | MarketCategory::ForeignMacro => ticker.to_string(),
        };
        Ok(name)
    }
}
