//! 외부 협력자 추상화.
//!
//! 엔진이 소비하는 세 가지 외부 인터페이스를 정의합니다:
//! - `HistoricalDataProvider` - 과거 종가 시계열
//! - `FundamentalDataProvider` - PER/PBR 비율
//! - `ExecutionService` - 포지션 조회 및 주문 제출
//!
//! 재시도, 타임아웃 같은 정책은 구현체의 책임입니다.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::{
    FundamentalSnapshot, HistoryRequest, OrderRequest, OrderResult, PositionInfo, PriceSeries,
};
use crate::types::Symbol;

// =============================================================================
// 에러 타입
// =============================================================================

/// 데이터 제공자 / 브로커 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "message")]
pub enum ProviderError {
    /// 종목 데이터 없음 (알 수 없는 종목, 상장폐지 등)
    #[error("데이터 없음: {0}")]
    DataUnavailable(String),

    /// 일시적 실패 (네트워크, 타임아웃)
    #[error("일시적 오류: {0}")]
    Transient(String),

    /// 인증 실패
    #[error("인증 실패: {0}")]
    Authentication(String),

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 기타 에러
    #[error("기타 에러: {0}")]
    Other(String),
}

impl ProviderError {
    /// 재시도하면 성공할 수 있는 에러인지 확인합니다.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_))
    }
}

/// 주문 제출 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// 브로커가 주문을 거부함
    #[error("주문 거부: {0}")]
    Rejected(String),

    /// 전송/인증 등 제공자 수준 에러
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

// =============================================================================
// 협력자 Trait
// =============================================================================

/// 과거 가격 데이터 제공자.
#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    /// 종목의 일별 종가 시계열을 조회합니다.
    ///
    /// 반환되는 시계열은 날짜 오름차순이어야 합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::DataUnavailable`: 알 수 없는 종목 또는 상장폐지
    /// - `ProviderError::Transient`: 네트워크 에러
    async fn fetch(
        &self,
        symbol: &Symbol,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, ProviderError>;
}

/// 펀더멘털 데이터 제공자.
#[async_trait]
pub trait FundamentalDataProvider: Send + Sync {
    /// 종목의 PER/PBR 비율을 조회합니다.
    ///
    /// 제공되지 않는 항목은 `None`으로 반환해야 하며 0으로 채우지 않습니다.
    async fn fetch_ratios(&self, symbol: &Symbol) -> Result<FundamentalSnapshot, ProviderError>;
}

/// 주문 실행 서비스 (브로커).
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// 현재 보유 포지션 목록을 조회합니다.
    async fn list_positions(&self) -> Result<Vec<PositionInfo>, ProviderError>;

    /// 주문을 제출합니다.
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, OrderError>;

    /// 로깅용 브로커 이름.
    fn name(&self) -> &str;
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderStatus, Side, TimeInForce};
    use rust_decimal_macros::dec;

    /// 테스트용 MockBroker.
    struct MockBroker {
        should_fail: bool,
    }

    #[async_trait]
    impl ExecutionService for MockBroker {
        async fn list_positions(&self) -> Result<Vec<PositionInfo>, ProviderError> {
            if self.should_fail {
                return Err(ProviderError::Transient("Mock network error".to_string()));
            }
            Ok(vec![PositionInfo::new(Symbol::new("AAPL"), dec!(10))])
        }

        async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, OrderError> {
            if self.should_fail {
                return Err(OrderError::Rejected("market closed".to_string()));
            }
            Ok(OrderResult {
                order_id: "mock-1".to_string(),
                client_order_id: request.client_order_id.clone(),
                symbol: request.symbol.clone(),
                side: request.side,
                quantity: request.quantity,
                status: OrderStatus::Accepted,
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_mock_broker_success() {
        let broker = MockBroker { should_fail: false };
        let positions = broker.list_positions().await.unwrap();
        assert_eq!(positions.len(), 1);

        let request =
            OrderRequest::market(Symbol::new("AAPL"), dec!(8), Side::Buy, TimeInForce::Gtc);
        let result = broker.submit_order(&request).await.unwrap();
        assert_eq!(result.client_order_id, request.client_order_id);
        assert_eq!(broker.name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_broker_errors() {
        let broker = MockBroker { should_fail: true };
        let err = broker.list_positions().await.unwrap_err();
        assert!(err.is_transient());

        let request =
            OrderRequest::market(Symbol::new("AAPL"), dec!(8), Side::Sell, TimeInForce::Gtc);
        let err = broker.submit_order(&request).await.unwrap_err();
        assert!(matches!(err, OrderError::Rejected(_)));
    }

    #[test]
    fn test_order_error_from_provider_error() {
        let err: OrderError = ProviderError::Authentication("bad key".to_string()).into();
        assert_eq!(err.to_string(), "인증 실패: bad key");
    }
}
