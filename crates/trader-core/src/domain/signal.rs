//! 트레이딩 시그널.
//!
//! 이 모듈은 두 전략이 생성하는 매매 신호 관련 타입을 정의합니다:
//! - `SignalAction` - 매수/매도/관망
//! - `SignalSource` - 신호를 만든 전략 (복합 점수, 이동평균)
//! - `Signal` - 매매 신호 엔티티

use crate::domain::Side;
use crate::types::{Price, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 신호가 권고하는 행동.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 관망
    Hold,
}

impl SignalAction {
    /// 주문 방향으로 변환합니다. 관망은 주문이 없으므로 `None`.
    pub fn side(&self) -> Option<Side> {
        match self {
            SignalAction::Buy => Some(Side::Buy),
            SignalAction::Sell => Some(Side::Sell),
            SignalAction::Hold => None,
        }
    }

    /// 주문이 필요한 행동인지 확인합니다.
    pub fn is_actionable(&self) -> bool {
        self.side().is_some()
    }
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "Buy"),
            SignalAction::Sell => write!(f, "Sell"),
            SignalAction::Hold => write!(f, "Hold"),
        }
    }
}

/// 신호를 생성한 전략.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// 펀더멘털 + 모멘텀 복합 점수 (5분위 선택)
    Composite,
    /// 단기/장기 이동평균 교차
    MovingAverage,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Composite => write!(f, "Composite"),
            SignalSource::MovingAverage => write!(f, "Moving average"),
        }
    }
}

/// 전략이 생성한 트레이딩 신호.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// 종목
    pub symbol: Symbol,
    /// 권고 행동
    pub action: SignalAction,
    /// 참고용 최근 종가 (가격 데이터가 전혀 없으면 None)
    pub price: Option<Price>,
    /// 신호 출처 전략
    pub source: SignalSource,
}

impl Signal {
    /// 새 신호를 생성합니다.
    pub fn new(
        symbol: Symbol,
        action: SignalAction,
        price: Option<Price>,
        source: SignalSource,
    ) -> Self {
        Self {
            symbol,
            action,
            price,
            source,
        }
    }

    /// 이동평균 전략 신호를 생성합니다.
    pub fn moving_average(symbol: Symbol, action: SignalAction, price: Option<Price>) -> Self {
        Self::new(symbol, action, price, SignalSource::MovingAverage)
    }

    /// 복합 점수 전략 신호를 생성합니다.
    pub fn composite(symbol: Symbol, action: SignalAction, price: Option<Price>) -> Self {
        Self::new(symbol, action, price, SignalSource::Composite)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(
                f,
                "{}: {} - Action: {} at price {}",
                self.symbol, self.source, self.action, price
            ),
            None => write!(f, "{}: {} - Action: {}", self.symbol, self.source, self.action),
        }
    }
}
