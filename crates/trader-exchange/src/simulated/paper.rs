//! 모의 브로커.
//!
//! 메모리에서 포지션을 관리하며 시장가 주문을 즉시 전량 체결합니다.
//! 보유 수량보다 많은 매도는 브로커 단에서 거부됩니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{info, warn};
use trader_core::{
    ExecutionService, OrderError, OrderRequest, OrderResult, OrderStatus, PositionInfo,
    ProviderError, Quantity, Side, Symbol,
};

/// 메모리 기반 모의 브로커.
#[derive(Debug, Default)]
pub struct PaperBroker {
    positions: RwLock<BTreeMap<Symbol, Quantity>>,
    orders: RwLock<Vec<OrderResult>>,
    fail_position_lookup: AtomicBool,
}

impl PaperBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기 보유 포지션을 설정합니다.
    pub fn with_position(mut self, symbol: impl Into<Symbol>, quantity: Quantity) -> Self {
        self.positions.get_mut().insert(symbol.into(), quantity);
        self
    }

    /// 포지션 조회가 실패하도록 설정합니다.
    pub fn set_position_lookup_failure(&self, fail: bool) {
        self.fail_position_lookup.store(fail, Ordering::Relaxed);
    }

    /// 종목의 현재 보유 수량.
    pub async fn position(&self, symbol: &Symbol) -> Quantity {
        self.positions
            .read()
            .await
            .get(symbol)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 지금까지 체결된 주문 목록.
    pub async fn filled_orders(&self) -> Vec<OrderResult> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl ExecutionService for PaperBroker {
    async fn list_positions(&self) -> Result<Vec<PositionInfo>, ProviderError> {
        if self.fail_position_lookup.load(Ordering::Relaxed) {
            return Err(ProviderError::Transient("paper broker unavailable".to_string()));
        }

        Ok(self
            .positions
            .read()
            .await
            .iter()
            .filter(|(_, qty)| !qty.is_zero())
            .map(|(symbol, qty)| PositionInfo::new(symbol.clone(), *qty))
            .collect())
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, OrderError> {
        if request.quantity <= Decimal::ZERO {
            return Err(OrderError::Rejected(format!(
                "qty must be > 0: {}",
                request.quantity
            )));
        }

        let mut positions = self.positions.write().await;
        let held = positions.get(&request.symbol).copied().unwrap_or(Decimal::ZERO);

        let updated = match request.side {
            Side::Buy => held + request.quantity,
            Side::Sell => {
                if held < request.quantity {
                    warn!(
                        symbol = %request.symbol,
                        held = %held,
                        requested = %request.quantity,
                        "모의 브로커 매도 거부"
                    );
                    return Err(OrderError::Rejected(format!(
                        "insufficient qty available for order (requested: {}, available: {})",
                        request.quantity, held
                    )));
                }
                held - request.quantity
            }
        };
        positions.insert(request.symbol.clone(), updated);
        drop(positions);

        let mut orders = self.orders.write().await;
        let result = OrderResult {
            order_id: format!("paper-{}", orders.len() + 1),
            client_order_id: request.client_order_id.clone(),
            symbol: request.symbol.clone(),
            side: request.side,
            quantity: request.quantity,
            status: OrderStatus::Filled,
        };
        orders.push(result.clone());

        info!(
            order_id = %result.order_id,
            symbol = %result.symbol,
            side = %result.side,
            quantity = %result.quantity,
            "모의 주문 체결"
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trader_core::TimeInForce;

    fn order(symbol: &str, side: Side, qty: Decimal) -> OrderRequest {
        OrderRequest::market(Symbol::new(symbol), qty, side, TimeInForce::Gtc)
    }

    #[tokio::test]
    async fn test_buy_then_sell_updates_position() {
        let broker = PaperBroker::new();
        broker.submit_order(&order("AAPL", Side::Buy, dec!(8))).await.unwrap();
        broker.submit_order(&order("AAPL", Side::Sell, dec!(3))).await.unwrap();

        assert_eq!(broker.position(&Symbol::new("AAPL")).await, dec!(5));
        assert_eq!(broker.filled_orders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_sell_more_than_held_is_rejected() {
        let broker = PaperBroker::new();
        let err = broker
            .submit_order(&order("PG", Side::Sell, dec!(8)))
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::Rejected(_)));
        assert!(broker.filled_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_position_lookup_failure() {
        let broker = PaperBroker::new();
        broker.set_position_lookup_failure(true);
        assert!(broker.list_positions().await.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_with_position_seeds_state() {
        let broker = PaperBroker::new().with_position("KO", dec!(10));
        let positions = broker.list_positions().await.unwrap();
        assert_eq!(positions, vec![PositionInfo::new(Symbol::new("KO"), dec!(10))]);
    }
}
