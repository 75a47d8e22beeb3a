//! 점수 계산 요소.
//!
//! - `MomentumScorer` - 기간 수익률
//! - `ValuationScorer` - PER/PBR 역수
//! - `ScoreNormalizer` - min-max 정규화

mod momentum;
mod normalize;
mod valuation;

pub use momentum::MomentumScorer;
pub use normalize::{ScoreNormalizer, DEFAULT_DEGENERATE_FILL};
pub use valuation::ValuationScorer;
