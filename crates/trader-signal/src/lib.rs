//! # Trader Signal
//!
//! 종목 유니버스에 대한 매매 신호 엔진.
//!
//! 두 가지 전략을 제공합니다:
//! - **복합 점수**: 모멘텀 + PER/PBR 역수를 정규화/평균하여 순위를 매기고
//!   상위 분위는 매수, 하위 분위는 매도 후보로 선택
//! - **이동평균 교차**: 20일/50일 단순 이동평균의 골든/데드 크로스
//!
//! `SignalAggregator`가 두 전략을 실행하여 하나의 신호 목록으로 합칩니다.
//!
//! # 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trader_exchange::YahooFinanceProvider;
//! use trader_signal::SignalAggregator;
//!
//! let yahoo = Arc::new(YahooFinanceProvider::new()?);
//! let aggregator = SignalAggregator::new(yahoo.clone(), yahoo);
//! let report = aggregator.compute_signals(&universe, range).await;
//! for signal in &report.signals {
//!     println!("{}", signal);
//! }
//! ```

pub mod aggregator;
pub mod crossover;
pub mod failure;
pub mod ranker;
pub mod scoring;
pub mod selector;

pub use aggregator::{SignalAggregator, SignalReport};
pub use crossover::{MovingAverageSignalDetector, MovingAverageState};
pub use failure::{FetchKind, SymbolFailure};
pub use ranker::{CompositeRanker, CompositeScore, RankingReport, RawScoreSet};
pub use scoring::{MomentumScorer, ScoreNormalizer, ValuationScorer, DEFAULT_DEGENERATE_FILL};
pub use selector::{PortfolioActions, PortfolioSelector};
