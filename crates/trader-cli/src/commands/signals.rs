//! `signals` 명령: 두 전략의 신호 계산 및 선택적 주문 실행.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use trader_core::{
    AppConfig, DateRange, ExecutionService, FundamentalDataProvider, HistoricalDataProvider,
    OrderDecision, Symbol,
};
use trader_exchange::{AlpacaClient, PaperBroker, YahooFinanceProvider};
use trader_execution::OrderPlacer;
use trader_signal::{SignalAggregator, SignalReport};

use super::output::{emit, format_json, format_signal_table, OutputFormat};
use super::{resolve_universe, spinner};

/// `signals` 명령 옵션.
#[derive(Debug, Clone)]
pub struct SignalsCommandConfig {
    /// 쉼표로 구분된 종목 오버라이드
    pub symbols: Option<String>,
    /// 이동평균 조회 기간 (일)
    pub lookback_days: Option<u32>,
    /// 주문 실행 여부
    pub execute: bool,
    /// 모의 브로커 사용 여부
    pub paper: bool,
    /// 주문을 만들기만 하고 제출하지 않음
    pub dry_run: bool,
    pub format: OutputFormat,
    pub output: Option<String>,
}

/// 신호 계산과 주문 결과.
#[derive(Debug, Clone, Serialize)]
pub struct SignalsRun {
    pub as_of: DateRange,
    pub report: SignalReport,
    pub decisions: Vec<OrderDecision>,
}

/// 이동평균 계산 구간.
pub fn crossover_range(config: &AppConfig, lookback_days: Option<u32>, today: NaiveDate) -> DateRange {
    DateRange::trailing_days(today, lookback_days.unwrap_or(config.crossover.lookback_days))
}

/// 신호를 계산하고, `placer`가 있으면 신호 순서대로 주문합니다.
pub async fn generate_signals(
    aggregator: &SignalAggregator,
    universe: &[Symbol],
    as_of: DateRange,
    placer: Option<&OrderPlacer>,
) -> SignalsRun {
    let report = aggregator.compute_signals(universe, as_of).await;
    let decisions = match placer {
        Some(placer) => placer.place_all(&report.signals).await,
        None => Vec::new(),
    };
    SignalsRun {
        as_of,
        report,
        decisions,
    }
}

/// 주문 실행에 사용할 브로커.
pub fn build_broker(paper: bool) -> Result<Arc<dyn ExecutionService>> {
    if paper {
        return Ok(Arc::new(PaperBroker::new()));
    }
    let client = AlpacaClient::from_env()
        .context("Alpaca 설정 실패 (ALPACA_API_KEY / ALPACA_API_SECRET 확인)")?;
    Ok(Arc::new(client))
}

/// `signals` 명령 실행.
pub async fn run_signals(config: &AppConfig, cmd: SignalsCommandConfig) -> Result<usize> {
    let universe = resolve_universe(config, cmd.symbols.as_deref())?;
    let as_of = crossover_range(config, cmd.lookback_days, Utc::now().date_naive());

    let yahoo = Arc::new(YahooFinanceProvider::new().context("Yahoo Finance 연결 생성 실패")?);
    let history: Arc<dyn HistoricalDataProvider> = yahoo.clone();
    let fundamentals: Arc<dyn FundamentalDataProvider> = yahoo;
    let aggregator = SignalAggregator::from_config(history, fundamentals, config)
        .context("신호 집계기 설정 오류")?;

    let placer = if cmd.execute {
        let mut execution = config.execution.clone();
        execution.dry_run |= cmd.dry_run;
        let broker = build_broker(cmd.paper)?;
        info!(broker = broker.name(), dry_run = execution.dry_run, "주문 실행 활성화");
        Some(OrderPlacer::from_config(broker, &execution))
    } else {
        None
    };

    let pb = spinner(format!(
        "Computing signals for {} symbols ({})...",
        universe.len(),
        as_of
    ))?;
    let run = generate_signals(&aggregator, &universe, as_of, placer.as_ref()).await;
    pb.finish_and_clear();

    let content = match cmd.format {
        OutputFormat::Table => format_signal_table(&run.report, &run.decisions),
        OutputFormat::Json => format_json(&run)?,
    };
    emit(&content, cmd.output.as_deref())?;

    Ok(run.report.signals.len())
}
