//! CLI 명령 파이프라인 통합 테스트.
//!
//! 네트워크 없이 메모리 데이터와 모의 브로커로 신호 계산부터 주문까지 검증합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use trader_cli::commands::output::{format_json, format_signal_table};
use trader_cli::commands::rank::rank_universe;
use trader_cli::commands::signals::generate_signals;
use trader_core::{
    AppConfig, DateRange, FundamentalSnapshot, OrderDecision, PriceSeries, ProviderError,
    SignalAction, Symbol,
};
use trader_exchange::{InMemoryMarketData, PaperBroker};
use trader_execution::OrderPlacer;
use trader_signal::{CompositeRanker, PortfolioSelector, SignalAggregator};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn range() -> DateRange {
    DateRange::new(start(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()).unwrap()
}

/// 5종목 + 실패 1종목. 모두 평탄한 가격이므로 이동평균 신호는 Hold.
fn market() -> Arc<InMemoryMarketData> {
    let mut data = InMemoryMarketData::new();
    for (i, symbol) in ["AAPL", "MSFT", "NVDA", "KO", "PG"].iter().enumerate() {
        let close = Decimal::from(100 + i as i64 * 10);
        data = data
            .with_series(*symbol, PriceSeries::from_closes(start(), &[close; 60]))
            .with_ratios(
                *symbol,
                FundamentalSnapshot::new(Some(Decimal::from(10 + i as i64 * 5)), Some(dec!(3))),
            );
    }
    Arc::new(data.with_failure("BABA", ProviderError::DataUnavailable("delisted".to_string())))
}

fn universe() -> Vec<Symbol> {
    Symbol::parse_list("AAPL,MSFT,NVDA,KO,PG,BABA")
}

#[tokio::test]
async fn test_signals_without_execution() {
    let data = market();
    let aggregator = SignalAggregator::from_config(data.clone(), data, &AppConfig::default()).unwrap();

    let run = generate_signals(&aggregator, &universe(), range(), None).await;

    assert!(run.decisions.is_empty());
    assert_eq!(run.report.moving_average_signals().count(), 6);
    assert_eq!(run.report.actions.buy, vec![Symbol::new("AAPL")]);
    assert_eq!(run.report.actions.sell, vec![Symbol::new("BABA")]);

    let table = format_signal_table(&run.report, &run.decisions);
    assert!(table.contains("AAPL: Moving average - Action: Hold at price 100"));
    assert!(table.contains("Buy:  AAPL"));
    assert!(table.contains("Sell: BABA"));
    assert!(table.contains("Error with BABA"));
    assert!(!table.contains("Orders"));
}

#[tokio::test]
async fn test_signals_with_paper_execution() {
    let data = market();
    let aggregator = SignalAggregator::from_config(data.clone(), data, &AppConfig::default()).unwrap();
    let broker = Arc::new(PaperBroker::new());
    let placer = OrderPlacer::new(broker.clone());

    let run = generate_signals(&aggregator, &universe(), range(), Some(&placer)).await;

    // Hold는 주문하지 않음: 복합 점수 매수 1건 + 매도 1건
    assert_eq!(run.decisions.len(), 2);
    assert!(matches!(run.decisions[0], OrderDecision::Submitted { .. }));
    assert!(run.decisions[1].is_rejected());
    assert_eq!(run.decisions[1].symbol().as_str(), "BABA");

    assert_eq!(broker.position(&Symbol::new("AAPL")).await, dec!(8));

    let json = format_json(&run).unwrap();
    assert!(json.contains("\"outcome\": \"submitted\""));
    assert!(json.contains("\"insufficient_shares\""));
}

#[tokio::test]
async fn test_rank_partitions_universe() {
    let data = market();
    let ranker = CompositeRanker::new(data.clone(), data);
    let selector = PortfolioSelector::default();

    let run = rank_universe(&ranker, &selector, &universe()).await;

    assert_eq!(run.ranking.scores.len(), 6);
    assert_eq!(run.ranking.scores[0].symbol.as_str(), "AAPL");
    assert_eq!(run.ranking.scores[5].symbol.as_str(), "BABA");
    assert_eq!(run.ranking.scores[5].value, Decimal::ZERO);
    assert_eq!(run.actions.buy.len(), 1);
    assert_eq!(run.actions.sell.len(), 1);
}

#[tokio::test]
async fn test_moving_average_signals_are_hold_for_flat_prices() {
    let data = market();
    let aggregator = SignalAggregator::new(data.clone(), data);

    let run = generate_signals(&aggregator, &universe(), range(), None).await;
    assert!(run
        .report
        .moving_average_signals()
        .all(|s| s.action == SignalAction::Hold));
}
