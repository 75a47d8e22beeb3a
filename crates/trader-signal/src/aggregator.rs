//! 두 전략을 실행하여 하나의 신호 목록을 만드는 오케스트레이터.
//!
//! 신호 순서:
//! 1. 이동평균 전략: 유니버스 순서대로 종목당 하나 (Hold 포함)
//! 2. 복합 점수 매수 후보 (Buy)
//! 3. 복합 점수 매도 후보 (Sell)
//!
//! 전략 간 중복은 제거하지 않습니다.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use trader_core::{
    symbol_span, AppConfig, DateRange, FundamentalDataProvider, HistoricalDataProvider,
    HistoryRequest, Signal, SignalAction, Symbol, TraderResult,
};

use crate::crossover::MovingAverageSignalDetector;
use crate::failure::{FetchKind, SymbolFailure};
use crate::ranker::{CompositeRanker, RankingReport, DEFAULT_MAX_CONCURRENCY};
use crate::selector::{PortfolioActions, PortfolioSelector};

/// `compute_signals` 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalReport {
    /// 정해진 순서의 전체 신호
    pub signals: Vec<Signal>,
    /// 복합 점수 매수/매도 후보
    pub actions: PortfolioActions,
    /// 0점 또는 Hold로 처리된 조회 실패 (복합 점수 → 이동평균 순)
    pub failures: Vec<SymbolFailure>,
    /// 복합 점수 랭킹 상세
    pub ranking: RankingReport,
}

impl SignalReport {
    /// 이동평균 전략 신호만 반환합니다.
    pub fn moving_average_signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals
            .iter()
            .filter(|s| s.source == trader_core::SignalSource::MovingAverage)
    }

    /// 매수/매도 신호만 반환합니다.
    pub fn actionable(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.action.is_actionable())
    }
}

/// 신호 집계기.
pub struct SignalAggregator {
    history: Arc<dyn HistoricalDataProvider>,
    ranker: CompositeRanker,
    selector: PortfolioSelector,
    detector: MovingAverageSignalDetector,
    max_concurrency: usize,
}

impl SignalAggregator {
    pub fn new(
        history: Arc<dyn HistoricalDataProvider>,
        fundamentals: Arc<dyn FundamentalDataProvider>,
    ) -> Self {
        Self {
            ranker: CompositeRanker::new(history.clone(), fundamentals),
            history,
            selector: PortfolioSelector::default(),
            detector: MovingAverageSignalDetector::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// 애플리케이션 설정으로 생성합니다.
    pub fn from_config(
        history: Arc<dyn HistoricalDataProvider>,
        fundamentals: Arc<dyn FundamentalDataProvider>,
        config: &AppConfig,
    ) -> TraderResult<Self> {
        Ok(Self {
            ranker: CompositeRanker::from_config(history.clone(), fundamentals, &config.composite),
            history,
            selector: PortfolioSelector::new(config.composite.buckets)?,
            detector: MovingAverageSignalDetector::from_config(&config.crossover)?,
            max_concurrency: config.composite.max_concurrency.max(1),
        })
    }

    pub fn with_selector(mut self, selector: PortfolioSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_detector(mut self, detector: MovingAverageSignalDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn ranker(&self) -> &CompositeRanker {
        &self.ranker
    }

    pub fn selector(&self) -> &PortfolioSelector {
        &self.selector
    }

    /// 유니버스에 대해 두 전략을 실행합니다.
    ///
    /// `as_of`는 이동평균 계산에 사용할 가격 이력 구간입니다.
    pub async fn compute_signals(&self, universe: &[Symbol], as_of: DateRange) -> SignalReport {
        let (ranking, crossover) =
            futures::join!(self.ranker.rank(universe), self.crossover_pass(universe, as_of));

        let actions = self.selector.select(&ranking.ranked_symbols());

        let mut signals = Vec::with_capacity(universe.len() + actions.buy.len() + actions.sell.len());
        let mut failures = ranking.failures.clone();

        for (signal, failure) in crossover {
            signals.push(signal);
            failures.extend(failure);
        }
        signals.extend(actions.buy.iter().map(|symbol| {
            Signal::composite(symbol.clone(), SignalAction::Buy, ranking.latest_close(symbol))
        }));
        signals.extend(actions.sell.iter().map(|symbol| {
            Signal::composite(symbol.clone(), SignalAction::Sell, ranking.latest_close(symbol))
        }));

        info!(
            universe = universe.len(),
            signals = signals.len(),
            buy = actions.buy.len(),
            sell = actions.sell.len(),
            failures = failures.len(),
            range = %as_of,
            "신호 계산 완료"
        );

        SignalReport {
            signals,
            actions,
            failures,
            ranking,
        }
    }

    /// 복합 점수 전략만 실행하여 매수/매도 후보를 반환합니다.
    pub async fn compute_portfolio_actions(&self, universe: &[Symbol]) -> PortfolioActions {
        let ranking = self.ranker.rank(universe).await;
        self.selector.select(&ranking.ranked_symbols())
    }

    /// 종목별 이동평균 신호 (유니버스 순서).
    async fn crossover_pass(
        &self,
        universe: &[Symbol],
        range: DateRange,
    ) -> Vec<(Signal, Option<SymbolFailure>)> {
        let request = HistoryRequest::Range(range);
        let request = &request;

        stream::iter(universe.iter().cloned())
            .map(|symbol| {
                let span = symbol_span!("crossover_signal", symbol);
                async move {
                    match self.history.fetch(&symbol, request).await {
                        Ok(series) => {
                            let (action, price) = self.detector.detect(&series);
                            debug!(action = %action, points = series.len(), "이동평균 판단");
                            (Signal::moving_average(symbol, action, price), None)
                        }
                        Err(error) => {
                            warn!(error = %error, "이동평균 이력 조회 실패, Hold 처리");
                            let failure =
                                SymbolFailure::new(symbol.clone(), FetchKind::CrossoverHistory, error);
                            (
                                Signal::moving_average(symbol, SignalAction::Hold, None),
                                Some(failure),
                            )
                        }
                    }
                }
                .instrument(span)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }
}
