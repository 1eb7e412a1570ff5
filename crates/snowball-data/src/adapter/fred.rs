//! FRED 해외 경제 지표 어댑터.

use async_trait::async_trait;
use snowball_core::SeriesFrame;

use super::{AdapterRequest, SourceAdapter};
use crate::error::Result;
use crate::provider::FredClient;

/// 해외 경제 지표 어댑터.
#[derive(Debug, Clone)]
pub struct FredAdapter {
    client: FredClient,
}

impl FredAdapter {
    /// 새 어댑터를 생성합니다.
    pub fn new(client: FredClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceAdapter for FredAdapter {
    fn name(&self) -> &'static str {
        "fred"
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<SeriesFrame> {
        let series = self
            .client
            .series(&request.ticker, request.window.start, request.window.end)
            .await?;
        Ok(SeriesFrame::Values(
            series.within(request.window.start, request.window.end),
        ))
    }
}
