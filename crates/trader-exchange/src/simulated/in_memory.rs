//! 메모리 기반 시장 데이터 제공자.
//!
//! 미리 등록한 종가 시계열과 펀더멘털 비율을 반환합니다.
//! 네트워크 없이 엔진을 실행하거나 테스트할 때 사용합니다.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use trader_core::{
    FundamentalDataProvider, FundamentalSnapshot, HistoricalDataProvider, HistoryRequest,
    PriceSeries, ProviderError, Symbol,
};

/// 메모리 기반 시장 데이터.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    series: HashMap<Symbol, PriceSeries>,
    ratios: HashMap<Symbol, FundamentalSnapshot>,
    history_failures: HashMap<Symbol, ProviderError>,
    ratio_failures: HashMap<Symbol, ProviderError>,
    history_calls: AtomicUsize,
    ratio_calls: AtomicUsize,
}

impl InMemoryMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목의 종가 시계열을 등록합니다.
    pub fn with_series(mut self, symbol: impl Into<Symbol>, series: PriceSeries) -> Self {
        self.series.insert(symbol.into(), series);
        self
    }

    /// 종목의 PER/PBR을 등록합니다.
    pub fn with_ratios(mut self, symbol: impl Into<Symbol>, snapshot: FundamentalSnapshot) -> Self {
        self.ratios.insert(symbol.into(), snapshot);
        self
    }

    /// 종목의 모든 조회가 실패하도록 설정합니다.
    pub fn with_failure(mut self, symbol: impl Into<Symbol>, error: ProviderError) -> Self {
        let symbol = symbol.into();
        self.history_failures.insert(symbol.clone(), error.clone());
        self.ratio_failures.insert(symbol, error);
        self
    }

    /// 종목의 펀더멘털 조회만 실패하도록 설정합니다.
    pub fn with_ratio_failure(mut self, symbol: impl Into<Symbol>, error: ProviderError) -> Self {
        self.ratio_failures.insert(symbol.into(), error);
        self
    }

    /// 지금까지의 시계열 조회 횟수.
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::Relaxed)
    }

    /// 지금까지의 펀더멘털 조회 횟수.
    pub fn ratio_calls(&self) -> usize {
        self.ratio_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HistoricalDataProvider for InMemoryMarketData {
    async fn fetch(
        &self,
        symbol: &Symbol,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, ProviderError> {
        self.history_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(err) = self.history_failures.get(symbol) {
            return Err(err.clone());
        }

        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| ProviderError::DataUnavailable(format!("{}: 등록된 시계열 없음", symbol)))?;

        let result = match request {
            HistoryRequest::Period(_) => series.clone(),
            HistoryRequest::Range(range) => {
                let points = series
                    .points()
                    .iter()
                    .filter(|p| p.date >= range.start && p.date <= range.end)
                    .cloned()
                    .collect();
                PriceSeries::try_new(points)
                    .map_err(|e| ProviderError::Other(e.to_string()))?
            }
        };

        debug!(symbol = %symbol, request = %request, points = result.len(), "메모리 시계열 반환");
        Ok(result)
    }
}

#[async_trait]
impl FundamentalDataProvider for InMemoryMarketData {
    async fn fetch_ratios(&self, symbol: &Symbol) -> Result<FundamentalSnapshot, ProviderError> {
        self.ratio_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(err) = self.ratio_failures.get(symbol) {
            return Err(err.clone());
        }

        // 등록되지 않은 종목은 비율 정보가 없는 것으로 취급
        Ok(self.ratios.get(symbol).cloned().unwrap_or_default())
    }
}
