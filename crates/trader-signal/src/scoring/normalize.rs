//! Min-max 정규화.

use rust_decimal::Decimal;
use tracing::debug;
use trader_core::{Score, ScoreCondition};

/// 모든 값이 같을 때 채우는 기본 정규화 값.
pub const DEFAULT_DEGENERATE_FILL: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// 점수 목록을 [0, 1] 구간으로 정규화합니다.
///
/// `(v - min) / (max - min)`. 최솟값은 0, 최댓값은 1이 되며 순서가 유지됩니다.
/// `max == min`이면 모든 원소를 `degenerate_fill`로 채웁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreNormalizer {
    degenerate_fill: Decimal,
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self {
            degenerate_fill: DEFAULT_DEGENERATE_FILL,
        }
    }
}

impl ScoreNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 퇴화 입력에 사용할 상수를 지정합니다.
    pub fn with_degenerate_fill(mut self, fill: Decimal) -> Self {
        self.degenerate_fill = fill;
        self
    }

    pub fn degenerate_fill(&self) -> Decimal {
        self.degenerate_fill
    }

    /// 입력과 같은 길이, 같은 순서의 정규화 값을 반환합니다.
    pub fn normalize(&self, values: &[Score]) -> Vec<Score> {
        let Some((min, max)) = min_max(values) else {
            return Vec::new();
        };

        let range = max - min;
        if range.is_zero() {
            debug!(
                condition = %ScoreCondition::DegenerateInput,
                len = values.len(),
                fill = %self.degenerate_fill,
                "정규화 입력이 모두 같은 값"
            );
            return vec![self.degenerate_fill; values.len()];
        }

        values
            .iter()
            .map(|v| ((*v - min) / range).min(Decimal::ONE).max(Decimal::ZERO))
            .collect()
    }
}

fn min_max(values: &[Decimal]) -> Option<(Decimal, Decimal)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_fill_is_half() {
        assert_eq!(DEFAULT_DEGENERATE_FILL, dec!(0.5));
        assert_eq!(ScoreNormalizer::new().degenerate_fill(), dec!(0.5));
    }

    #[test]
    fn test_normalize_basic() {
        let result = ScoreNormalizer::new().normalize(&[dec!(2), dec!(4), dec!(3), dec!(6)]);
        assert_eq!(result, vec![dec!(0), dec!(0.5), dec!(0.25), dec!(1)]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(ScoreNormalizer::new().normalize(&[]).is_empty());
    }

    #[test]
    fn test_degenerate_input() {
        let result = ScoreNormalizer::new().normalize(&[dec!(0.3), dec!(0.3), dec!(0.3)]);
        assert_eq!(result, vec![dec!(0.5); 3]);

        let single = ScoreNormalizer::new()
            .with_degenerate_fill(Decimal::ZERO)
            .normalize(&[dec!(7)]);
        assert_eq!(single, vec![Decimal::ZERO]);
    }

    fn decimal_strategy() -> impl Strategy<Value = Decimal> {
        (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 3))
    }

    proptest! {
        #[test]
        fn prop_min_to_zero_max_to_one(values in prop::collection::vec(decimal_strategy(), 2..40)) {
            let min = values.iter().copied().min().unwrap();
            let max = values.iter().copied().max().unwrap();
            prop_assume!(min != max);

            let normalized = ScoreNormalizer::new().normalize(&values);
            prop_assert_eq!(normalized.len(), values.len());

            for (raw, norm) in values.iter().zip(&normalized) {
                prop_assert!(*norm >= Decimal::ZERO && *norm <= Decimal::ONE);
                if *raw == min {
                    prop_assert_eq!(*norm, Decimal::ZERO);
                }
                if *raw == max {
                    prop_assert_eq!(*norm, Decimal::ONE);
                }
            }
        }

        #[test]
        fn prop_preserves_strict_order(values in prop::collection::vec(decimal_strategy(), 2..40)) {
            let normalized = ScoreNormalizer::new().normalize(&values);
            for i in 0..values.len() {
                for j in 0..values.len() {
                    if values[i] < values[j] {
                        prop_assert!(normalized[i] < normalized[j]);
                    }
                }
            }
        }

        #[test]
        fn prop_constant_input_uses_fill(value in decimal_strategy(), len in 1usize..20) {
            let normalized = ScoreNormalizer::new().normalize(&vec![value; len]);
            prop_assert_eq!(normalized, vec![DEFAULT_DEGENERATE_FILL; len]);
        }
    }
}
