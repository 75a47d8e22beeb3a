//! 종목 단위 조회 실패 기록.

use serde::Serialize;
use std::fmt;
use trader_core::{ProviderError, Symbol};

/// 실패한 조회의 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// 모멘텀용 가격 이력
    MomentumHistory,
    /// PER/PBR 비율
    Fundamentals,
    /// 이동평균용 가격 이력
    CrossoverHistory,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::MomentumHistory => write!(f, "momentum history"),
            FetchKind::Fundamentals => write!(f, "fundamentals"),
            FetchKind::CrossoverHistory => write!(f, "crossover history"),
        }
    }
}

/// 배치를 중단하지 않고 0점/Hold로 흡수된 조회 실패.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolFailure {
    pub symbol: Symbol,
    pub kind: FetchKind,
    pub error: ProviderError,
}

impl SymbolFailure {
    pub fn new(symbol: Symbol, kind: FetchKind, error: ProviderError) -> Self {
        Self { symbol, kind, error }
    }
}

impl fmt::Display for SymbolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error with {} ({}): {}", self.symbol, self.kind, self.error)
    }
}
