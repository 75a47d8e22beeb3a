//! 매매 신호 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 유니버스(40종목)의 신호 계산
//! trader signals
//!
//! # 일부 종목만, 이동평균 구간 200일
//! trader signals --symbols AAPL,MSFT,NVDA --lookback-days 200
//!
//! # 모의 브로커로 주문 실행
//! trader signals --execute --paper
//!
//! # 복합 점수 랭킹 (JSON)
//! trader rank --format json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use trader_cli::commands::output::OutputFormat;
use trader_cli::commands::rank::{run_rank, RankCommandConfig};
use trader_cli::commands::signals::{run_signals, SignalsCommandConfig};
use trader_core::{init_logging, AppConfig, LogConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "trader")]
#[command(about = "Equity signal engine - 복합 점수 랭킹과 이동평균 교차 신호", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 이동평균 / 복합 점수 신호 계산
    Signals {
        /// 종목 목록 (쉼표로 구분, 예: AAPL,MSFT). 없으면 설정의 유니버스
        #[arg(short, long)]
        symbols: Option<String>,

        /// 이동평균 계산 구간 (일)
        #[arg(short, long)]
        lookback_days: Option<u32>,

        /// 신호에 따라 주문 실행
        #[arg(long, default_value = "false")]
        execute: bool,

        /// 모의 브로커 사용 (--execute와 함께)
        #[arg(long, default_value = "false")]
        paper: bool,

        /// 드라이런 모드 (주문을 만들기만 하고 제출하지 않음)
        #[arg(long, default_value = "false")]
        dry_run: bool,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 복합 점수 랭킹 및 매수/매도 분위
    Rank {
        /// 종목 목록 (쉼표로 구분). 없으면 설정의 유니버스
        #[arg(short, long)]
        symbols: Option<String>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env는 선택 사항
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("설정 로드 실패: {}", cli.config))?;

    init_logging(LogConfig::from(&config.logging).with_env_overrides())
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    match cli.command {
        Commands::Signals {
            symbols,
            lookback_days,
            execute,
            paper,
            dry_run,
            format,
            output,
        } => {
            let cmd = SignalsCommandConfig {
                symbols,
                lookback_days,
                execute,
                paper,
                dry_run,
                format: OutputFormat::parse(&format)?,
                output,
            };

            match run_signals(&config, cmd).await {
                Ok(count) => info!("✅ {} signals computed", count),
                Err(e) => {
                    error!("Signals failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Rank {
            symbols,
            format,
            output,
        } => {
            let cmd = RankCommandConfig {
                symbols,
                format: OutputFormat::parse(&format)?,
                output,
            };

            match run_rank(&config, cmd).await {
                Ok(count) => info!("✅ Ranked {} symbols", count),
                Err(e) => {
                    error!("Rank failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
