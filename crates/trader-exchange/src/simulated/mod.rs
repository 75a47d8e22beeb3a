//! 네트워크 없이 동작하는 데이터 제공자와 브로커.
//!
//! # 예제
//!
//! ```ignore
//! use trader_exchange::simulated::{InMemoryMarketData, PaperBroker};
//!
//! let data = InMemoryMarketData::new()
//!     .with_series("AAPL", series)
//!     .with_ratios("AAPL", FundamentalSnapshot::new(Some(dec!(28)), Some(dec!(45))));
//! let broker = PaperBroker::new().with_position("AAPL", dec!(10));
//! ```

mod in_memory;
mod paper;

pub use in_memory::InMemoryMarketData;
pub use paper::PaperBroker;
