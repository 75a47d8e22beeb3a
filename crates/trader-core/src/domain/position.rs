//! 보유 포지션.

use crate::types::{Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 브로커가 보고하는 종목별 보유 수량.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub symbol: Symbol,
    pub quantity: Quantity,
}

impl PositionInfo {
    pub fn new(symbol: Symbol, quantity: Quantity) -> Self {
        Self { symbol, quantity }
    }
}

/// 포지션 목록에서 특정 종목의 보유 수량을 찾습니다. 없으면 0.
pub fn held_quantity(positions: &[PositionInfo], symbol: &Symbol) -> Quantity {
    positions
        .iter()
        .filter(|p| &p.symbol == symbol)
        .map(|p| p.quantity)
        .sum::<Decimal>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_held_quantity() {
        let positions = vec![
            PositionInfo::new(Symbol::new("AAPL"), dec!(10)),
            PositionInfo::new(Symbol::new("MSFT"), dec!(4)),
        ];
        assert_eq!(held_quantity(&positions, &Symbol::new("AAPL")), dec!(10));
        assert_eq!(held_quantity(&positions, &Symbol::new("NVDA")), Decimal::ZERO);
    }
}
