//! 복합 점수 랭킹.
//!
//! 종목마다 모멘텀(기간 수익률)과 PER/PBR 역수를 계산하고,
//! 세 요소를 유니버스 전체에서 각각 정규화한 뒤 평균하여 순위를 매깁니다.
//!
//! 조회에 실패하거나 가격 이력이 비어 있는 종목은 0점으로 순위에 포함되며 정규화 대상에서는 제외됩니다.

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use trader_core::{
    symbol_span, CompositeConfig, FundamentalDataProvider, HistoricalDataProvider, HistoryPeriod,
    HistoryRequest, Price, ProviderError, Score, Symbol,
};

use crate::failure::{FetchKind, SymbolFailure};
use crate::scoring::{MomentumScorer, ScoreNormalizer, ValuationScorer};

/// 기본 동시 조회 수.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// 정규화 전 종목별 원점수.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawScoreSet {
    pub symbol: Symbol,
    pub momentum: Score,
    pub pe_score: Score,
    pub pb_score: Score,
}

/// 정규화된 세 요소의 평균 점수.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeScore {
    pub symbol: Symbol,
    pub value: Score,
}

/// 랭킹 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RankingReport {
    /// 복합 점수 내림차순 (동점은 유니버스 순서)
    pub scores: Vec<CompositeScore>,
    /// 점수 계산에 성공한 종목의 원점수 (유니버스 순서)
    pub raw: Vec<RawScoreSet>,
    /// 0점 처리된 조회 실패
    pub failures: Vec<SymbolFailure>,
    /// 종목별 최근 종가
    pub latest_closes: BTreeMap<Symbol, Price>,
}

impl RankingReport {
    /// 순위대로 정렬된 심볼 목록.
    pub fn ranked_symbols(&self) -> Vec<Symbol> {
        self.scores.iter().map(|s| s.symbol.clone()).collect()
    }

    pub fn latest_close(&self, symbol: &Symbol) -> Option<Price> {
        self.latest_closes.get(symbol).copied()
    }

    pub fn raw_scores(&self, symbol: &Symbol) -> Option<&RawScoreSet> {
        self.raw.iter().find(|r| &r.symbol == symbol)
    }
}

/// 종목 하나의 점수 계산 결과.
struct SymbolScoring {
    raw: Option<RawScoreSet>,
    latest_close: Option<(Symbol, Price)>,
    failures: Vec<SymbolFailure>,
}

/// 복합 점수 랭커.
pub struct CompositeRanker {
    history: Arc<dyn HistoricalDataProvider>,
    fundamentals: Arc<dyn FundamentalDataProvider>,
    momentum_period: HistoryPeriod,
    momentum: MomentumScorer,
    valuation: ValuationScorer,
    normalizer: ScoreNormalizer,
    max_concurrency: usize,
}

impl CompositeRanker {
    pub fn new(
        history: Arc<dyn HistoricalDataProvider>,
        fundamentals: Arc<dyn FundamentalDataProvider>,
    ) -> Self {
        Self {
            history,
            fundamentals,
            momentum_period: HistoryPeriod::default(),
            momentum: MomentumScorer::new(),
            valuation: ValuationScorer::new(),
            normalizer: ScoreNormalizer::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// 설정 섹션으로 생성합니다.
    pub fn from_config(
        history: Arc<dyn HistoricalDataProvider>,
        fundamentals: Arc<dyn FundamentalDataProvider>,
        config: &CompositeConfig,
    ) -> Self {
        Self::new(history, fundamentals)
            .with_momentum_period(config.momentum_period)
            .with_normalizer(ScoreNormalizer::new().with_degenerate_fill(config.degenerate_fill))
            .with_max_concurrency(config.max_concurrency)
    }

    pub fn with_momentum_period(mut self, period: HistoryPeriod) -> Self {
        self.momentum_period = period;
        self
    }

    pub fn with_normalizer(mut self, normalizer: ScoreNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// 동시 조회 수를 설정합니다 (최소 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// 유니버스 전체의 복합 점수를 계산하고 순위를 매깁니다.
    ///
    /// 조회는 동시에 실행되지만 결과는 유니버스 순서로 모은 뒤
    /// 정규화합니다. 개별 종목의 실패는 배치를 중단하지 않습니다.
    pub async fn rank(&self, universe: &[Symbol]) -> RankingReport {
        let outcomes: Vec<SymbolScoring> = stream::iter(universe.iter().cloned())
            .map(|symbol| {
                let span = symbol_span!("composite_score", symbol);
                self.score_symbol(symbol).instrument(span)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut report = RankingReport::default();
        for outcome in outcomes {
            if let Some(raw) = outcome.raw {
                report.raw.push(raw);
            }
            if let Some((symbol, close)) = outcome.latest_close {
                report.latest_closes.insert(symbol, close);
            }
            report.failures.extend(outcome.failures);
        }

        report.scores = self.combine(universe, &report.raw);

        info!(
            universe = universe.len(),
            scored = report.raw.len(),
            failed = universe.len().saturating_sub(report.raw.len()),
            "복합 점수 랭킹 완료"
        );
        report
    }

    /// 이미 조회된 원점수로 정규화와 순위 계산을 수행합니다.
    ///
    /// `raw`에 없는 유니버스 종목은 0점입니다. 정렬은 안정 정렬이므로
    /// 동점은 유니버스 순서를 유지합니다.
    pub fn combine(&self, universe: &[Symbol], raw: &[RawScoreSet]) -> Vec<CompositeScore> {
        let column = |f: fn(&RawScoreSet) -> Score| -> Vec<Score> {
            self.normalizer.normalize(&raw.iter().map(f).collect::<Vec<_>>())
        };
        let momentum = column(|r| r.momentum);
        let pe = column(|r| r.pe_score);
        let pb = column(|r| r.pb_score);

        let three = Decimal::from(3);
        let composite: HashMap<&Symbol, Score> = raw
            .iter()
            .enumerate()
            .map(|(i, r)| (&r.symbol, (momentum[i] + pe[i] + pb[i]) / three))
            .collect();

        let mut scores: Vec<CompositeScore> = universe
            .iter()
            .map(|symbol| CompositeScore {
                symbol: symbol.clone(),
                value: composite.get(symbol).copied().unwrap_or(Decimal::ZERO),
            })
            .collect();
        scores.sort_by(|a, b| b.value.cmp(&a.value));
        scores
    }

    async fn score_symbol(&self, symbol: Symbol) -> SymbolScoring {
        let request = HistoryRequest::Period(self.momentum_period);
        let (history, ratios) = futures::join!(
            self.history.fetch(&symbol, &request),
            self.fundamentals.fetch_ratios(&symbol)
        );

        let mut failures = Vec::new();
        let mut latest_close = None;

        let momentum = match history {
            Ok(series) if series.is_empty() => {
                failures.push(SymbolFailure::new(
                    symbol.clone(),
                    FetchKind::MomentumHistory,
                    ProviderError::DataUnavailable(format!(
                        "{}: 가격 이력이 비어 있음 ({})",
                        symbol, request
                    )),
                ));
                None
            }
            Ok(series) => {
                latest_close = series.latest_close().map(|close| (symbol.clone(), close));
                Some(self.momentum.score(&series))
            }
            Err(error) => {
                failures.push(SymbolFailure::new(symbol.clone(), FetchKind::MomentumHistory, error));
                None
            }
        };

        let valuation = match ratios {
            Ok(snapshot) => Some((
                self.valuation.score(snapshot.pe_ratio),
                self.valuation.score(snapshot.pb_ratio),
            )),
            Err(error) => {
                failures.push(SymbolFailure::new(symbol.clone(), FetchKind::Fundamentals, error));
                None
            }
        };

        for failure in &failures {
            warn!(kind = %failure.kind, error = %failure.error, "조회 실패, 0점 처리");
        }

        let raw = match (momentum, valuation) {
            (Some(momentum), Some((pe_score, pb_score))) => {
                debug!(
                    momentum = %momentum,
                    pe_score = %pe_score,
                    pb_score = %pb_score,
                    "원점수 계산"
                );
                Some(RawScoreSet {
                    symbol,
                    momentum,
                    pe_score,
                    pb_score,
                })
            }
            _ => None,
        };

        SymbolScoring {
            raw,
            latest_close,
            failures,
        }
    }
}
