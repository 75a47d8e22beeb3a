//! 주문 실행.
//!
//! 이 crate는 매매 신호를 브로커 주문으로 바꾸는 `OrderPlacer`를 제공합니다.
//!
//! # 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trader_execution::OrderPlacer;
//! use trader_exchange::AlpacaClient;
//!
//! let broker = Arc::new(AlpacaClient::from_env()?);
//! let placer = OrderPlacer::from_config(broker, &config.execution);
//! for decision in placer.place_all(&report.signals).await {
//!     println!("{}", decision);
//! }
//! ```

pub mod placer;

pub use placer::{OrderPlacer, PlacementSummary, DEFAULT_ORDER_QUANTITY};
