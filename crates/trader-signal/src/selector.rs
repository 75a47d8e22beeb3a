//! 분위 기반 매수/매도 후보 선택.

use serde::Serialize;
use trader_core::{Symbol, TraderError, TraderResult};

/// 기본 분위 수 (5분위).
pub const DEFAULT_BUCKETS: usize = 5;

/// 매수/매도 후보.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioActions {
    /// 상위 분위 (순위 순)
    pub buy: Vec<Symbol>,
    /// 하위 분위 (순위 순)
    pub sell: Vec<Symbol>,
}

impl PortfolioActions {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// 순위 목록을 상위/하위 분위로 나눕니다.
///
/// `k = floor(N / buckets)`, 매수 = 앞의 k개, 매도 = 뒤의 k개.
/// 두 구간이 겹쳐도 중복을 제거하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioSelector {
    buckets: usize,
}

impl Default for PortfolioSelector {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
        }
    }
}

impl PortfolioSelector {
    /// 분위 수로 생성합니다. 0은 허용하지 않습니다.
    pub fn new(buckets: usize) -> TraderResult<Self> {
        if buckets == 0 {
            return Err(TraderError::Config("buckets는 1 이상이어야 합니다".to_string()));
        }
        Ok(Self { buckets })
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// 분위 하나의 크기.
    pub fn bucket_size(&self, universe_len: usize) -> usize {
        universe_len / self.buckets
    }

    pub fn select(&self, ranked: &[Symbol]) -> PortfolioActions {
        let k = self.bucket_size(ranked.len());
        PortfolioActions {
            buy: ranked[..k].to_vec(),
            sell: ranked[ranked.len() - k..].to_vec(),
        }
    }
}
