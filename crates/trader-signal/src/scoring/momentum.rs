//! 모멘텀 점수.

use rust_decimal::Decimal;
use trader_core::{PriceSeries, Score};

/// 기간 수익률 기반 모멘텀 스코어러.
///
/// `score = close[last] / close[first] - 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumScorer;

impl MomentumScorer {
    pub fn new() -> Self {
        Self
    }

    /// 가격 시계열의 모멘텀을 계산합니다.
    ///
    /// 빈 시계열이나 첫 종가가 0인 경우 0을 반환합니다.
    pub fn score(&self, series: &PriceSeries) -> Score {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => Self::score_closes(first.close, last.close),
            _ => Decimal::ZERO,
        }
    }

    /// 시작/종료 종가로 모멘텀을 계산합니다.
    pub fn score_closes(first: Decimal, last: Decimal) -> Score {
        if first.is_zero() {
            return Decimal::ZERO;
        }
        last.checked_div(first)
            .map(|ratio| ratio - Decimal::ONE)
            .unwrap_or(Decimal::ZERO)
    }
}
