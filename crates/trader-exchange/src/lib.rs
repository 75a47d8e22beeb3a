//! 외부 데이터 제공자 및 브로커 연동.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Yahoo Finance: 일봉 종가 시계열, PER/PBR 비율
//! - Alpaca 커넥터: 포지션 조회 및 시장가 주문 (REST)
//! - 시뮬레이션: 메모리 기반 시장 데이터와 모의 브로커

pub mod connector;
pub mod error;
pub mod simulated;
pub mod yahoo;

pub use connector::{AlpacaClient, AlpacaConfig};
pub use error::*;
pub use simulated::{InMemoryMarketData, PaperBroker};
pub use yahoo::YahooFinanceProvider;
