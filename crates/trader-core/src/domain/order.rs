//! 주문 타입.
//!
//! 이 모듈은 브로커에 제출하는 주문 관련 타입을 정의합니다:
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderType` - 주문 유형
//! - `TimeInForce` - 주문 유효 기간
//! - `OrderRequest` - 주문 요청
//! - `OrderResult` - 브로커가 접수한 주문
//! - `OrderDecision` - 주문 배치 결과 (제출, 거부, 모의 실행)

use crate::types::{Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 브로커 API에서 사용하는 소문자 표기.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// 주문 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 시장가 주문
    Market,
    /// 지정가 주문
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
        }
    }
}

/// 주문 유효 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// 당일 유효
    Day,
    /// 취소될 때까지 유효 (Good Till Cancelled)
    Gtc,
    /// 즉시 체결 또는 취소 (Immediate Or Cancel)
    Ioc,
    /// 전량 체결 또는 취소 (Fill Or Kill)
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
            TimeInForce::Ioc => "ioc",
            TimeInForce::Fok => "fok",
        }
    }
}

impl Default for TimeInForce {
    fn default() -> Self {
        Self::Gtc
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "gtc" => Ok(Self::Gtc),
            "ioc" => Ok(Self::Ioc),
            "fok" => Ok(Self::Fok),
            _ => Err(format!("Unknown time in force: {}", s)),
        }
    }
}

/// 새 주문 생성을 위한 주문 요청.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 종목
    pub symbol: Symbol,
    /// 주문 수량
    pub quantity: Quantity,
    /// 주문 방향
    pub side: Side,
    /// 주문 유형
    pub order_type: OrderType,
    /// 주문 유효 기간
    pub time_in_force: TimeInForce,
    /// 지정가 (지정가 주문에만 사용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Price>,
    /// 클라이언트 주문 ID
    pub client_order_id: String,
}

impl OrderRequest {
    /// 시장가 주문을 생성합니다.
    pub fn market(
        symbol: Symbol,
        quantity: Quantity,
        side: Side,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            symbol,
            quantity,
            side,
            order_type: OrderType::Market,
            time_in_force,
            limit_price: None,
            client_order_id: Uuid::new_v4().to_string(),
        }
    }
}

/// 브로커 측 주문 상태.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// 접수됨
    Accepted,
    /// 전량 체결
    Filled,
    /// 부분 체결
    PartiallyFilled,
    /// 브로커 고유 상태 문자열
    Other(String),
}

impl OrderStatus {
    /// 브로커가 반환한 상태 문자열을 해석합니다.
    pub fn from_broker(status: &str) -> Self {
        match status {
            "new" | "accepted" | "pending_new" => OrderStatus::Accepted,
            "filled" => OrderStatus::Filled,
            "partially_filled" => OrderStatus::PartiallyFilled,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

/// 브로커가 접수한 주문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// 브로커 주문 ID
    pub order_id: String,
    /// 클라이언트 주문 ID
    pub client_order_id: String,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: Quantity,
    pub status: OrderStatus,
}

/// 주문 거부 사유.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RejectReason {
    /// 보유 수량 부족으로 매도 불가
    InsufficientShares { held: Quantity, requested: Quantity },
    /// 포지션 조회 실패로 매도 가능 여부를 판단할 수 없음
    PositionLookupFailed { message: String },
    /// 브로커가 주문을 거부하거나 제출에 실패함
    Broker { message: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InsufficientShares { held, requested } => write!(
                f,
                "Insufficient shares: held {}, requested {}",
                held, requested
            ),
            RejectReason::PositionLookupFailed { message } => {
                write!(f, "Position lookup failed: {}", message)
            }
            RejectReason::Broker { message } => write!(f, "Broker rejected order: {}", message),
        }
    }
}

/// 신호 하나에 대한 주문 배치 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum OrderDecision {
    /// 브로커에 제출됨
    Submitted { result: OrderResult },
    /// 제출 전 또는 제출 중 거부됨
    Rejected {
        request: OrderRequest,
        reason: RejectReason,
    },
    /// 모의 실행 모드: 주문을 만들었지만 제출하지 않음
    DryRun { request: OrderRequest },
}

impl OrderDecision {
    /// 주문 대상 종목.
    pub fn symbol(&self) -> &Symbol {
        match self {
            OrderDecision::Submitted { result } => &result.symbol,
            OrderDecision::Rejected { request, .. } | OrderDecision::DryRun { request } => {
                &request.symbol
            }
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, OrderDecision::Rejected { .. })
    }
}

impl fmt::Display for OrderDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDecision::Submitted { result } => write!(
                f,
                "Placed {} order for {} shares of {} (id={})",
                result.side, result.quantity, result.symbol, result.order_id
            ),
            OrderDecision::Rejected { request, reason } => write!(
                f,
                "Cannot {} {} shares of {}: {}",
                request.side.as_str(),
                request.quantity,
                request.symbol,
                reason
            ),
            OrderDecision::DryRun { request } => write!(
                f,
                "[dry-run] {} order for {} shares of {}",
                request.side, request.quantity, request.symbol
            ),
        }
    }
}
