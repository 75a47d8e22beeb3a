//! 브로커 커넥터.

pub mod alpaca;

pub use alpaca::{AlpacaClient, AlpacaConfig, ALPACA_LIVE_URL, ALPACA_PAPER_URL};
