//! 이동평균 교차 신호.
//!
//! 단기(SMA) / 장기(LMA) 단순 이동평균을 계산하고 가장 최근 두 시점에서
//! 교차 여부를 판단합니다.
//!
//! - 골든 크로스 (이전: SMA <= LMA, 현재: SMA > LMA) → Buy
//! - 데드 크로스 (이전: SMA >= LMA, 현재: SMA < LMA) → Sell
//! - 그 외 → Hold

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use trader_core::{
    CrossoverConfig, Price, PriceSeries, ScoreCondition, SignalAction, TraderError, TraderResult,
};

/// 기본 단기 이동평균 기간.
pub const DEFAULT_SHORT_WINDOW: usize = 20;

/// 기본 장기 이동평균 기간.
pub const DEFAULT_LONG_WINDOW: usize = 50;

/// 시점별 이동평균 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovingAverageState {
    pub date: NaiveDate,
    pub close: Price,
    /// 단기 이동평균 (기간이 채워지기 전에는 None)
    pub sma: Option<Decimal>,
    /// 장기 이동평균 (기간이 채워지기 전에는 None)
    pub lma: Option<Decimal>,
}

/// 이동평균 교차 감지기.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageSignalDetector {
    short_window: usize,
    long_window: usize,
}

impl Default for MovingAverageSignalDetector {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl MovingAverageSignalDetector {
    /// 이동평균 기간으로 생성합니다. `0 < short < long`이어야 합니다.
    pub fn new(short_window: usize, long_window: usize) -> TraderResult<Self> {
        if short_window == 0 || short_window >= long_window {
            return Err(TraderError::Config(format!(
                "0 < short_window < long_window 이어야 합니다 (short={}, long={})",
                short_window, long_window
            )));
        }
        Ok(Self {
            short_window,
            long_window,
        })
    }

    pub fn from_config(config: &CrossoverConfig) -> TraderResult<Self> {
        Self::new(config.short_window, config.long_window)
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// 단순 이동평균 (SMA).
    ///
    /// 결과는 입력과 같은 길이이며 `window`개의 값이 모이기 전 시점은 `None`입니다.
    pub fn sma(prices: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
        if window == 0 {
            return vec![None; prices.len()];
        }

        let divisor = Decimal::from(window);
        (0..prices.len())
            .map(|i| {
                if i + 1 < window {
                    None
                } else {
                    let sum: Decimal = prices[i + 1 - window..=i].iter().sum();
                    Some(sum / divisor)
                }
            })
            .collect()
    }

    /// 시계열의 시점별 이동평균 상태를 계산합니다.
    pub fn moving_averages(&self, series: &PriceSeries) -> Vec<MovingAverageState> {
        let closes = series.closes();
        let sma = Self::sma(&closes, self.short_window);
        let lma = Self::sma(&closes, self.long_window);

        series
            .points()
            .iter()
            .zip(sma.into_iter().zip(lma))
            .map(|(point, (sma, lma))| MovingAverageState {
                date: point.date,
                close: point.close,
                sma,
                lma,
            })
            .collect()
    }

    /// 마지막 두 시점으로 행동을 결정합니다.
    ///
    /// 반환 가격은 항상 마지막 시점의 종가이며, 상태가 비어 있으면 `None`입니다.
    pub fn decide(states: &[MovingAverageState]) -> (SignalAction, Option<Price>) {
        let Some(latest) = states.last() else {
            return (SignalAction::Hold, None);
        };
        let price = Some(latest.close);

        let (Some(sma), Some(lma)) = (latest.sma, latest.lma) else {
            debug!(
                condition = %ScoreCondition::InsufficientHistory,
                steps = states.len(),
                "최근 이동평균 미정의"
            );
            return (SignalAction::Hold, price);
        };

        let prev = match states.len().checked_sub(2).map(|i| &states[i]) {
            Some(prev) => prev,
            None => return (SignalAction::Hold, price),
        };
        let (Some(prev_sma), Some(prev_lma)) = (prev.sma, prev.lma) else {
            debug!(
                condition = %ScoreCondition::InsufficientHistory,
                steps = states.len(),
                "직전 이동평균 미정의"
            );
            return (SignalAction::Hold, price);
        };

        let action = if sma > lma && prev_sma <= prev_lma {
            SignalAction::Buy
        } else if sma < lma && prev_sma >= prev_lma {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        };

        (action, price)
    }

    /// 시계열에 대한 최종 행동과 가격.
    pub fn detect(&self, series: &PriceSeries) -> (SignalAction, Option<Price>) {
        Self::decide(&self.moving_averages(series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    /// 하락 후 반등하는 60일 시계열.
    ///
    /// 0..50: 200에서 1씩 하락, 50..60: 15씩 상승.
    /// 단기 이동평균이 index 57에서 장기 이동평균을 상향 돌파합니다.
    fn v_shaped() -> PriceSeries {
        let closes: Vec<Decimal> = (0..60)
            .map(|i| {
                if i < 50 {
                    Decimal::from(200 - i)
                } else {
                    Decimal::from(151 + (i - 49) * 15)
                }
            })
            .collect();
        PriceSeries::from_closes(start(), &closes)
    }

    #[test]
    fn test_sma_basic() {
        let prices = [dec!(1), dec!(2), dec!(3), dec!(4)];
        let sma = MovingAverageSignalDetector::sma(&prices, 2);
        assert_eq!(sma, vec![None, Some(dec!(1.5)), Some(dec!(2.5)), Some(dec!(3.5))]);
    }

    #[test]
    fn test_sma_window_longer_than_input() {
        let sma = MovingAverageSignalDetector::sma(&[dec!(1), dec!(2)], 5);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn test_invalid_windows() {
        assert!(MovingAverageSignalDetector::new(0, 50).is_err());
        assert!(MovingAverageSignalDetector::new(50, 20).is_err());
        assert!(MovingAverageSignalDetector::new(20, 20).is_err());
    }

    #[test]
    fn test_golden_cross_detected_exactly_once() {
        let detector = MovingAverageSignalDetector::default();
        let states = detector.moving_averages(&v_shaped());
        assert_eq!(states.len(), 60);

        // 장기 이동평균은 index 49부터 정의됨
        assert!(states[48].lma.is_none());
        assert!(states[49].lma.is_some());

        let actions: Vec<SignalAction> = (1..=states.len())
            .map(|n| MovingAverageSignalDetector::decide(&states[..n]).0)
            .collect();

        let buy_steps: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == SignalAction::Buy)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(buy_steps.len(), 1);

        let k = buy_steps[0];
        assert_eq!(k, 57);
        assert!(states[k].sma.unwrap() > states[k].lma.unwrap());
        assert!(states[k - 1].sma.unwrap() <= states[k - 1].lma.unwrap());
        assert!(actions[..k].iter().all(|a| *a == SignalAction::Hold));
    }

    #[test]
    fn test_dead_cross_is_sell() {
        let detector = MovingAverageSignalDetector::new(2, 3).unwrap();
        // SMA(2) / LMA(3): step 3 = (11.5, 11.0), step 4 = (6.5, 8.0)
        let series = PriceSeries::from_closes(
            start(),
            &[dec!(10), dec!(10), dec!(11), dec!(12), dec!(1)],
        );
        let (action, price) = detector.detect(&series);
        assert_eq!(action, SignalAction::Sell);
        assert_eq!(price, Some(dec!(1)));
    }

    #[test]
    fn test_insufficient_history_holds_with_price() {
        let detector = MovingAverageSignalDetector::default();
        let series = PriceSeries::from_closes(start(), &[dec!(10); 30]);
        assert_eq!(detector.detect(&series), (SignalAction::Hold, Some(dec!(10))));
    }

    #[test]
    fn test_empty_series_holds_without_price() {
        let detector = MovingAverageSignalDetector::default();
        assert_eq!(detector.detect(&PriceSeries::empty()), (SignalAction::Hold, None));
    }

    #[test]
    fn test_flat_series_holds() {
        let detector = MovingAverageSignalDetector::default();
        let series = PriceSeries::from_closes(start(), &[dec!(50); 60]);
        assert_eq!(detector.detect(&series).0, SignalAction::Hold);
    }
}
