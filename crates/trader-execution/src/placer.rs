//! 신호 → 주문 변환 및 제출.
//!
//! - Hold 신호는 주문을 만들지 않습니다.
//! - Buy 신호는 설정된 수량의 시장가 매수 주문을 제출합니다.
//! - Sell 신호는 먼저 보유 수량을 확인하고, 부족하면 제출하지 않고 거부합니다.
//!
//! 브로커 오류와 거부는 호출자에게 `OrderDecision::Rejected`로 반환되며
//! 나머지 신호 처리를 중단하지 않습니다.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trader_core::{
    held_quantity, ExecutionConfig, ExecutionService, OrderDecision, OrderRequest, Quantity,
    RejectReason, Side, Signal, TimeInForce,
};

/// 기본 주문 수량.
pub const DEFAULT_ORDER_QUANTITY: u32 = 8;

/// 주문 배치 결과 요약.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlacementSummary {
    pub submitted: usize,
    pub rejected: usize,
    pub dry_run: usize,
}

impl PlacementSummary {
    pub fn from_decisions(decisions: &[OrderDecision]) -> Self {
        decisions.iter().fold(Self::default(), |mut acc, d| {
            match d {
                OrderDecision::Submitted { .. } => acc.submitted += 1,
                OrderDecision::Rejected { .. } => acc.rejected += 1,
                OrderDecision::DryRun { .. } => acc.dry_run += 1,
            }
            acc
        })
    }
}

/// 신호를 주문으로 변환하여 브로커에 제출합니다.
pub struct OrderPlacer {
    broker: Arc<dyn ExecutionService>,
    quantity: Quantity,
    time_in_force: TimeInForce,
    dry_run: bool,
}

impl OrderPlacer {
    pub fn new(broker: Arc<dyn ExecutionService>) -> Self {
        Self {
            broker,
            quantity: Decimal::from(DEFAULT_ORDER_QUANTITY),
            time_in_force: TimeInForce::Gtc,
            dry_run: false,
        }
    }

    /// 실행 설정 섹션으로 생성합니다.
    pub fn from_config(broker: Arc<dyn ExecutionService>, config: &ExecutionConfig) -> Self {
        Self::new(broker)
            .with_quantity(config.order_quantity)
            .with_time_in_force(config.time_in_force)
            .with_dry_run(config.dry_run)
    }

    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// true면 주문을 만들기만 하고 브로커에 제출하지 않습니다.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn broker_name(&self) -> &str {
        self.broker.name()
    }

    /// 신호에 해당하는 주문 요청. Hold면 None.
    pub fn order_for(&self, signal: &Signal) -> Option<OrderRequest> {
        let side = signal.action.side()?;
        Some(OrderRequest::market(
            signal.symbol.clone(),
            self.quantity,
            side,
            self.time_in_force,
        ))
    }

    /// 신호 하나를 처리합니다. Hold 신호는 None.
    pub async fn place(&self, signal: &Signal) -> Option<OrderDecision> {
        let request = self.order_for(signal)?;

        if self.dry_run {
            info!(
                symbol = %request.symbol,
                side = %request.side,
                quantity = %request.quantity,
                source = %signal.source,
                "[dry-run] 주문 생략"
            );
            return Some(OrderDecision::DryRun { request });
        }

        if request.side == Side::Sell {
            if let Some(reason) = self.check_holdings(&request).await {
                warn!(symbol = %request.symbol, reason = %reason, "매도 주문 거부");
                return Some(OrderDecision::Rejected { request, reason });
            }
        }

        info!(
            symbol = %request.symbol,
            side = %request.side,
            quantity = %request.quantity,
            source = %signal.source,
            broker = self.broker.name(),
            "주문 제출"
        );

        let decision = match self.broker.submit_order(&request).await {
            Ok(result) => OrderDecision::Submitted { result },
            Err(e) => {
                warn!(symbol = %request.symbol, error = %e, "브로커 주문 실패");
                OrderDecision::Rejected {
                    request,
                    reason: RejectReason::Broker {
                        message: e.to_string(),
                    },
                }
            }
        };
        Some(decision)
    }

    /// 신호 목록을 순서대로 처리합니다.
    ///
    /// 앞선 주문이 포지션을 바꿀 수 있으므로 순차적으로 제출합니다.
    pub async fn place_all(&self, signals: &[Signal]) -> Vec<OrderDecision> {
        let mut decisions = Vec::new();
        for signal in signals {
            if let Some(decision) = self.place(signal).await {
                decisions.push(decision);
            }
        }

        let summary = PlacementSummary::from_decisions(&decisions);
        info!(
            signals = signals.len(),
            submitted = summary.submitted,
            rejected = summary.rejected,
            dry_run = summary.dry_run,
            "주문 처리 완료"
        );
        decisions
    }

    /// 매도 가능 여부 확인. 불가능하면 거부 사유를 반환합니다.
    async fn check_holdings(&self, request: &OrderRequest) -> Option<RejectReason> {
        match self.broker.list_positions().await {
            Ok(positions) => {
                let held = held_quantity(&positions, &request.symbol);
                debug!(symbol = %request.symbol, held = %held, "보유 수량 확인");
                (held < request.quantity).then(|| RejectReason::InsufficientShares {
                    held,
                    requested: request.quantity,
                })
            }
            Err(e) => Some(RejectReason::PositionLookupFailed {
                message: e.to_string(),
            }),
        }
    }
}
