//! 시그널 엔진과 외부 협력자가 공유하는 도메인 모델.

mod market_data;
mod order;
mod position;
mod provider;
mod signal;

pub use market_data::*;
pub use order::*;
pub use position::*;
pub use provider::*;
pub use signal::*;
