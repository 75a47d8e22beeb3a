//! `rank` 명령: 복합 점수 랭킹과 매수/매도 분위 출력.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use trader_core::{AppConfig, FundamentalDataProvider, HistoricalDataProvider, Symbol};
use trader_exchange::YahooFinanceProvider;
use trader_signal::{CompositeRanker, PortfolioActions, PortfolioSelector, RankingReport};

use super::output::{emit, format_json, format_ranking_table, OutputFormat};
use super::{resolve_universe, spinner};

/// `rank` 명령 옵션.
#[derive(Debug, Clone)]
pub struct RankCommandConfig {
    pub symbols: Option<String>,
    pub format: OutputFormat,
    pub output: Option<String>,
}

/// 랭킹과 분위 선택 결과.
#[derive(Debug, Clone, Serialize)]
pub struct RankRun {
    pub ranking: RankingReport,
    pub actions: PortfolioActions,
}

/// 랭킹을 계산하고 분위를 나눕니다.
pub async fn rank_universe(
    ranker: &CompositeRanker,
    selector: &PortfolioSelector,
    universe: &[Symbol],
) -> RankRun {
    let ranking = ranker.rank(universe).await;
    let actions = selector.select(&ranking.ranked_symbols());
    RankRun { ranking, actions }
}

/// `rank` 명령 실행.
pub async fn run_rank(config: &AppConfig, cmd: RankCommandConfig) -> Result<usize> {
    let universe = resolve_universe(config, cmd.symbols.as_deref())?;

    let yahoo = Arc::new(YahooFinanceProvider::new().context("Yahoo Finance 연결 생성 실패")?);
    let history: Arc<dyn HistoricalDataProvider> = yahoo.clone();
    let fundamentals: Arc<dyn FundamentalDataProvider> = yahoo;
    let ranker = CompositeRanker::from_config(history, fundamentals, &config.composite);
    let selector = PortfolioSelector::new(config.composite.buckets).context("분위 설정 오류")?;

    let pb = spinner(format!("Ranking {} symbols...", universe.len()))?;
    let run = rank_universe(&ranker, &selector, &universe).await;
    pb.finish_and_clear();

    let content = match cmd.format {
        OutputFormat::Table => format_ranking_table(&run.ranking, &run.actions),
        OutputFormat::Json => format_json(&run)?,
    };
    emit(&content, cmd.output.as_deref())?;

    Ok(run.ranking.scores.len())
}
