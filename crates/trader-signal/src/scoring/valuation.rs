//! 밸류에이션 점수.

use rust_decimal::Decimal;
use trader_core::Score;

/// 역수 기반 밸류에이션 스코어러 (PER, PBR 공용).
///
/// 비율이 없거나 0 이하이면 0점입니다. 적자 기업의 음수 PER도
/// "데이터 없음"과 같이 취급하는 단순화된 규칙입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationScorer;

impl ValuationScorer {
    pub fn new() -> Self {
        Self
    }

    /// `1 / ratio` (ratio > 0), 그 외 0.
    pub fn score(&self, ratio: Option<Decimal>) -> Score {
        match ratio {
            Some(r) if r > Decimal::ZERO => Decimal::ONE.checked_div(r).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inverse_ratio() {
        let scorer = ValuationScorer::new();
        assert_eq!(scorer.score(Some(dec!(20))), dec!(0.05));
        assert_eq!(scorer.score(Some(dec!(0.5))), dec!(2));
    }

    #[test]
    fn test_unusable_ratios_score_zero() {
        let scorer = ValuationScorer::new();
        assert_eq!(scorer.score(None), Decimal::ZERO);
        assert_eq!(scorer.score(Some(Decimal::ZERO)), Decimal::ZERO);
        assert_eq!(scorer.score(Some(dec!(-12.5))), Decimal::ZERO);
    }
}
