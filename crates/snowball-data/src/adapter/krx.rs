//! KRX 지수/주식 어댑터와 휴장일 보정.
//!
//! KRX는 거래가 없던 세션을 시가/고가/저가 0으로 보고합니다.
//! 행 수와 날짜는 유지하고 가격만 종가로 채웁니다.

use async_trait::async_trait;
use snowball_core::{OhlcvBar, OhlcvTable, SeriesFrame};
use tracing::debug;

use super::{AdapterRequest, SourceAdapter};
use crate::error::Result;
use crate::provider::KrxClient;

/// 지수 규칙: 시가가 0인 행은 시가=고가=저가=종가, 거래량 0.
pub fn repair_index_halts(table: OhlcvTable) -> OhlcvTable {
    table.map_bars(|bar| {
        if bar.is_halted() {
            OhlcvBar {
                open: bar.close,
                high: bar.close,
                low: bar.close,
                volume: 0,
                ..bar
            }
        } else {
            bar
        }
    })
}

/// 주식 규칙: 시가가 0인 행은 시가=고가=저가=종가, 거래량은 그대로.
pub fn repair_equity_halts(table: OhlcvTable) -> OhlcvTable {
    table.map_bars(|bar| {
        if bar.is_halted() {
            OhlcvBar {
                open: bar.close,
                high: bar.close,
                low: bar.close,
                ..bar
            }
        } else {
            bar
        }
    })
}

fn halted_count(table: &OhlcvTable) -> usize {
    table.bars().iter().filter(|b| b.is_halted()).count()
}

/// 국내 지수 어댑터.
#[derive(Debug, Clone)]
pub struct KrxIndexAdapter {
    client: KrxClient,
}

impl KrxIndexAdapter {
    /// 새 어댑터를 생성합니다.
    pub fn new(client: KrxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for KrxIndexAdapter {
    fn name(&self) -> &'static str {
        "krx-index"
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame> {
        let bars = self
            .client
            .index_ohlcv(&request.ticker, request.window.start, request.window.end)
            .await?;

        let table = OhlcvTable::new(bars);
        debug!(ticker = %request.ticker, halted = halted_count(&table), "지수 휴장일 보정");
        Ok(SeriesFrame::Ohlcv(repair_index_halts(table)))
    }
}

/// 국내 주식 어댑터.
#[derive(Debug, Clone)]
pub struct KrxEquityAdapter {
    client: KrxClient,
}

impl KrxEquityAdapter {
    /// 새 어댑터를 생성합니다.
    pub fn new(client: KrxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for KrxEquityAdapter {
    fn name(&self) -> &'static str {
        "krx-equity"
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame> {
        let bars = self
            .client
            .stock_ohlcv(&request.ticker, request.window.start, request.window.end)
            .await?;

        let table = OhlcvTable::new(bars);
        debug!(ticker = %request.ticker, halted = halted_count(&table), "주식 휴장일 보정");
        Ok(SeriesFrame::Ohlcv(repair_equity_halts(table)))
    }
}
