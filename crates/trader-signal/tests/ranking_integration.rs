//! 복합 점수 랭킹 통합 테스트
//!
//! 조회 완료 순서와 무관한 결과, 실패 종목 격리, 설정 기반 생성을 검증합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use trader_core::{
    AppConfig, FundamentalDataProvider, FundamentalSnapshot, HistoricalDataProvider,
    HistoryRequest, PriceSeries, ProviderError, Symbol,
};
use trader_exchange::InMemoryMarketData;
use trader_signal::{CompositeRanker, FetchKind, PortfolioSelector, ScoreNormalizer};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn universe(list: &[&str]) -> Vec<Symbol> {
    list.iter().map(|s| Symbol::new(*s)).collect()
}

/// 유니버스 앞쪽 종목일수록 늦게 응답하는 제공자.
struct SlowFirst {
    inner: InMemoryMarketData,
    delays: Vec<(Symbol, u64)>,
}

impl SlowFirst {
    fn delay(&self, symbol: &Symbol) -> Duration {
        let ms = self
            .delays
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, ms)| *ms)
            .unwrap_or(0);
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl HistoricalDataProvider for SlowFirst {
    async fn fetch(
        &self,
        symbol: &Symbol,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, ProviderError> {
        tokio::time::sleep(self.delay(symbol)).await;
        self.inner.fetch(symbol, request).await
    }
}

#[async_trait]
impl FundamentalDataProvider for SlowFirst {
    async fn fetch_ratios(&self, symbol: &Symbol) -> Result<FundamentalSnapshot, ProviderError> {
        tokio::time::sleep(self.delay(symbol)).await;
        self.inner.fetch_ratios(symbol).await
    }
}

fn market() -> InMemoryMarketData {
    InMemoryMarketData::new()
        .with_series("AAPL", PriceSeries::from_closes(start(), &[dec!(100), dec!(120)]))
        .with_ratios("AAPL", FundamentalSnapshot::new(Some(dec!(30)), Some(dec!(40))))
        .with_series("KO", PriceSeries::from_closes(start(), &[dec!(60), dec!(63)]))
        .with_ratios("KO", FundamentalSnapshot::new(Some(dec!(20)), Some(dec!(10))))
        .with_series("INTC", PriceSeries::from_closes(start(), &[dec!(50), dec!(30)]))
        .with_ratios("INTC", FundamentalSnapshot::new(Some(dec!(-5)), Some(dec!(1))))
        .with_series("NVDA", PriceSeries::from_closes(start(), &[dec!(400), dec!(800)]))
        .with_ratios("NVDA", FundamentalSnapshot::new(Some(dec!(60)), None))
}

#[tokio::test(start_paused = true)]
async fn test_ranking_is_independent_of_completion_order() {
    let symbols = universe(&["AAPL", "KO", "INTC", "NVDA"]);

    let immediate = Arc::new(market());
    let baseline = CompositeRanker::new(immediate.clone(), immediate)
        .rank(&symbols)
        .await;

    let delays = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), (symbols.len() - i) as u64 * 100))
        .collect();
    let slow = Arc::new(SlowFirst {
        inner: market(),
        delays,
    });
    let reordered = CompositeRanker::new(slow.clone(), slow)
        .with_max_concurrency(4)
        .rank(&symbols)
        .await;

    assert_eq!(baseline.scores, reordered.scores);
    assert_eq!(baseline.raw, reordered.raw);
    let raw_order: Vec<&str> = reordered.raw.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(raw_order, vec!["AAPL", "KO", "INTC", "NVDA"]);
}

#[tokio::test]
async fn test_failed_symbol_scores_zero_without_blocking_others() {
    let data = Arc::new(
        market().with_failure("BABA", ProviderError::DataUnavailable("delisted".to_string())),
    );
    let symbols = universe(&["BABA", "AAPL", "KO", "INTC", "NVDA"]);
    let report = CompositeRanker::new(data.clone(), data).rank(&symbols).await;

    assert_eq!(report.scores.len(), 5);
    assert_eq!(report.raw.len(), 4);
    assert_eq!(report.scores.last().unwrap().symbol.as_str(), "BABA");
    assert_eq!(report.scores.last().unwrap().value, Decimal::ZERO);
    assert!(report.failures.iter().all(|f| f.symbol.as_str() == "BABA"));
    assert!(report.latest_close(&Symbol::new("BABA")).is_none());
    assert_eq!(report.latest_close(&Symbol::new("KO")), Some(dec!(63)));

    // 음수 PER은 0점 처리
    let intc = report.raw_scores(&Symbol::new("INTC")).unwrap();
    assert_eq!(intc.pe_score, Decimal::ZERO);
    assert_eq!(intc.momentum, dec!(-0.4));

    let actions = PortfolioSelector::default().select(&report.ranked_symbols());
    assert_eq!(actions.sell, vec![Symbol::new("BABA")]);
}

#[tokio::test]
async fn test_ranker_from_config() {
    let mut config = AppConfig::default();
    config.composite.degenerate_fill = Decimal::ZERO;
    config.composite.max_concurrency = 2;

    let data = Arc::new(
        InMemoryMarketData::new()
            .with_series("X", PriceSeries::from_closes(start(), &[dec!(10), dec!(11)]))
            .with_series("Y", PriceSeries::from_closes(start(), &[dec!(10), dec!(11)])),
    );
    let report = CompositeRanker::from_config(data.clone(), data.clone(), &config.composite)
        .rank(&universe(&["X", "Y"]))
        .await;

    // 모든 요소가 같으므로 설정한 채움 값(0)이 그대로 평균됨
    assert!(report.scores.iter().all(|s| s.value == Decimal::ZERO));
    assert_eq!(data.history_calls(), 2);
    assert_eq!(data.ratio_calls(), 2);

    let fill_half = CompositeRanker::new(data.clone(), data)
        .with_normalizer(ScoreNormalizer::new())
        .rank(&universe(&["X", "Y"]))
        .await;
    assert!(fill_half.scores.iter().all(|s| s.value == dec!(0.5)));
}

#[tokio::test]
async fn test_empty_history_scores_zero_like_a_failure() {
    let data = Arc::new(
        InMemoryMarketData::new()
            .with_series("EMPTY", PriceSeries::empty())
            .with_ratios("EMPTY", FundamentalSnapshot::new(Some(dec!(5)), Some(dec!(0.5))))
            .with_series("A", PriceSeries::from_closes(start(), &[dec!(100), dec!(110)]))
            .with_ratios("A", FundamentalSnapshot::new(Some(dec!(20)), Some(dec!(3))))
            .with_series("B", PriceSeries::from_closes(start(), &[dec!(100), dec!(90)]))
            .with_ratios("B", FundamentalSnapshot::new(Some(dec!(30)), Some(dec!(4)))),
    );
    let ranker = CompositeRanker::new(data.clone(), data);

    let report = ranker.rank(&universe(&["EMPTY", "A", "B"])).await;

    // 가장 좋은 PER/PBR을 가졌더라도 가격 이력이 없으면 0점
    let empty = report.scores.iter().find(|s| s.symbol.as_str() == "EMPTY").unwrap();
    assert_eq!(empty.value, Decimal::ZERO);
    assert_eq!(report.scores[0].symbol.as_str(), "A");
    assert_eq!(report.scores[0].value, Decimal::ONE);

    assert!(report.raw_scores(&Symbol::new("EMPTY")).is_none());
    assert!(report.latest_close(&Symbol::new("EMPTY")).is_none());
    assert_eq!(report.raw.len(), 2);

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.symbol.as_str(), "EMPTY");
    assert_eq!(failure.kind, FetchKind::MomentumHistory);
    assert!(matches!(failure.error, ProviderError::DataUnavailable(_)));

    let actions = PortfolioSelector::new(3).unwrap().select(&report.ranked_symbols());
    assert_eq!(actions.buy, universe(&["A"]));
}
