//! # Trader Core
//!
//! 종목 랭킹 / 매매 신호 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 심볼, 가격 시계열, 펀더멘털 스냅샷
//! - 매매 신호 및 주문 타입
//! - 데이터 제공자 / 브로커 trait
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
