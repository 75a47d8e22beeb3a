//! 결과 출력 형식.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use tracing::info;
use trader_core::{DecimalExt, OrderDecision, Symbol};
use trader_signal::{PortfolioActions, RankingReport, SignalReport};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// 파일 또는 stdout에 출력합니다.
pub fn emit(content: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(path) = output_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// JSON 형식 출력.
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

fn join_symbols(symbols: &[Symbol]) -> String {
    if symbols.is_empty() {
        return "-".to_string();
    }
    symbols
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_actions(output: &mut String, actions: &PortfolioActions) {
    output.push_str(&format!("Buy:  {}\n", join_symbols(&actions.buy)));
    output.push_str(&format!("Sell: {}\n", join_symbols(&actions.sell)));
}

/// 신호 리포트 텍스트 출력.
pub fn format_signal_table(report: &SignalReport, decisions: &[OrderDecision]) -> String {
    let mut output = String::new();

    output.push_str("Moving average signals\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    for signal in report.moving_average_signals() {
        output.push_str(&format!("{}\n", signal));
    }

    output.push_str("\nComposite portfolio actions\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    push_actions(&mut output, &report.actions);

    if !report.failures.is_empty() {
        output.push_str("\nFailures\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for failure in &report.failures {
            output.push_str(&format!("{}\n", failure));
        }
    }

    if !decisions.is_empty() {
        output.push_str("\nOrders\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for decision in decisions {
            output.push_str(&format!("{}\n", decision));
        }
    }

    output.push_str(&format!(
        "\nTotal: {} signals ({} actionable)",
        report.signals.len(),
        report.actionable().count()
    ));
    output
}

/// 랭킹 테이블 출력.
pub fn format_ranking_table(ranking: &RankingReport, actions: &PortfolioActions) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<5} {:<8} {:>10} {:>10} {:>10} {:>10} {:>12} {:<6}\n",
        "RANK", "SYMBOL", "SCORE", "MOMENTUM", "PE_SCORE", "PB_SCORE", "CLOSE", "ACTION"
    ));
    output.push_str(&"-".repeat(78));
    output.push('\n');

    for (i, score) in ranking.scores.iter().enumerate() {
        let raw = ranking.raw_scores(&score.symbol);
        let component = |value: Option<rust_decimal::Decimal>| {
            value
                .map(|v| format!("{:.4}", v))
                .unwrap_or_else(|| "-".to_string())
        };
        let action = if actions.buy.contains(&score.symbol) {
            "BUY"
        } else if actions.sell.contains(&score.symbol) {
            "SELL"
        } else {
            ""
        };

        output.push_str(&format!(
            "{:<5} {:<8} {:>10} {:>10} {:>10} {:>10} {:>12} {:<6}\n",
            i + 1,
            score.symbol,
            format!("{:.4}", score.value),
            raw.map(|r| r.momentum.to_percentage_string())
                .unwrap_or_else(|| "-".to_string()),
            component(raw.map(|r| r.pe_score)),
            component(raw.map(|r| r.pb_score)),
            ranking
                .latest_close(&score.symbol)
                .map(|c| format!("{:.2}", c))
                .unwrap_or_else(|| "-".to_string()),
            action
        ));
    }

    output.push('\n');
    push_actions(&mut output, actions);

    if !ranking.failures.is_empty() {
        output.push('\n');
        for failure in &ranking.failures {
            output.push_str(&format!("{}\n", failure));
        }
    }

    output.push_str(&format!(
        "\nTotal: {} symbols ({} scored)",
        ranking.scores.len(),
        ranking.raw.len()
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trader_signal::{CompositeScore, RawScoreSet};

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::parse("csv").is_err());
    }

    #[test]
    fn test_ranking_table_marks_actions() {
        let mut ranking = RankingReport::default();
        ranking.scores = vec![
            CompositeScore {
                symbol: Symbol::new("AAPL"),
                value: dec!(0.9),
            },
            CompositeScore {
                symbol: Symbol::new("BABA"),
                value: dec!(0),
            },
        ];
        ranking.raw = vec![RawScoreSet {
            symbol: Symbol::new("AAPL"),
            momentum: dec!(0.12),
            pe_score: dec!(0.04),
            pb_score: dec!(0.02),
        }];
        ranking.latest_closes.insert(Symbol::new("AAPL"), dec!(190.5));

        let actions = PortfolioActions {
            buy: vec![Symbol::new("AAPL")],
            sell: vec![Symbol::new("BABA")],
        };
        let table = format_ranking_table(&ranking, &actions);

        let aapl = table.lines().find(|l| l.contains("AAPL") && l.starts_with('1')).unwrap();
        assert!(aapl.contains("0.9000"));
        assert!(aapl.contains("12.00%"));
        assert!(aapl.contains("0.0400"));
        assert!(aapl.contains("190.50"));
        assert!(aapl.trim_end().ends_with("BUY"));

        let baba = table.lines().find(|l| l.starts_with('2')).unwrap();
        assert!(baba.contains('-'));
        assert!(baba.trim_end().ends_with("SELL"));
        assert!(table.ends_with("Total: 2 symbols (1 scored)"));
    }

    #[test]
    fn test_json_output() {
        let actions = PortfolioActions {
            buy: vec![Symbol::new("NVDA")],
            sell: vec![],
        };
        let json = format_json(&actions).unwrap();
        assert!(json.contains("\"buy\""));
        assert!(json.contains("\"NVDA\""));
    }
}
