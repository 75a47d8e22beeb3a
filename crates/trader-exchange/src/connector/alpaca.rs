//! Alpaca 브로커 커넥터.
//!
//! Alpaca Trading API v2의 포지션 조회와 시장가 주문 제출을 구현합니다.
//! 모의투자(paper)와 실거래 엔드포인트 모두 지원.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info};

use crate::{ExchangeError, ExchangeResult};
use trader_core::{
    ExecutionService, OrderError, OrderRequest, OrderResult, OrderStatus, PositionInfo,
    ProviderError, Side, Symbol,
};

/// 모의투자 API URL.
pub const ALPACA_PAPER_URL: &str = "https://paper-api.alpaca.markets";

/// 실거래 API URL.
pub const ALPACA_LIVE_URL: &str = "https://api.alpaca.markets";

// ============================================================================
// 설정
// ============================================================================

/// Alpaca 클라이언트 설정.
///
/// # 보안
/// - `api_secret`은 `SecretString`으로 보관되며 `Debug` 출력에서 마스킹됩니다.
#[derive(Clone)]
pub struct AlpacaConfig {
    /// API 키 ID
    pub api_key: String,
    /// API 시크릿
    pub api_secret: SecretString,
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 바이트가 아닌 문자 단위로 잘라야 비ASCII 키에서 패닉이 나지 않음
        let key: Vec<char> = self.api_key.chars().collect();
        let masked_key = if key.len() > 8 {
            let head: String = key[..4].iter().collect();
            let tail: String = key[key.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("AlpacaConfig")
            .field("api_key", &masked_key)
            .field("api_secret", &"***REDACTED***")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AlpacaConfig {
    /// 모의투자 엔드포인트로 새 설정 생성.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::new(api_secret.into().into_boxed_str()),
            base_url: ALPACA_PAPER_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// 기본 URL 변경 (실거래 또는 테스트 서버).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// 환경 변수에서 생성.
    ///
    /// `ALPACA_API_KEY`, `ALPACA_API_SECRET`이 필요하고
    /// `ALPACA_BASE_URL`이 없으면 모의투자 URL을 사용합니다.
    pub fn from_env() -> ExchangeResult<Self> {
        let api_key = std::env::var("ALPACA_API_KEY")
            .map_err(|_| ExchangeError::MissingConfig("ALPACA_API_KEY".to_string()))?;
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .map_err(|_| ExchangeError::MissingConfig("ALPACA_API_SECRET".to_string()))?;

        let config = Self::new(api_key, api_secret);
        Ok(match std::env::var("ALPACA_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        })
    }
}

// ============================================================================
// API 요청/응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct AlpacaPosition {
    symbol: String,
    qty: String,
}

#[derive(Debug, Serialize)]
struct AlpacaOrderBody<'a> {
    symbol: &'a str,
    qty: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_price: Option<String>,
    client_order_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrderResponse {
    id: String,
    client_order_id: String,
    symbol: String,
    qty: Option<String>,
    side: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct AlpacaError {
    message: String,
}

// ============================================================================
// Alpaca 클라이언트
// ============================================================================

/// Alpaca 브로커 클라이언트.
pub struct AlpacaClient {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaClient {
    /// 새 Alpaca 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(config: AlpacaConfig) -> ExchangeResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        info!(base_url = %config.base_url, "Alpaca 클라이언트 생성");
        Ok(Self { config, client })
    }

    /// 환경 변수에서 생성.
    pub fn from_env() -> ExchangeResult<Self> {
        Self::new(AlpacaConfig::from_env()?)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// 인증 헤더 추가.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("APCA-API-KEY-ID", &self.config.api_key)
            .header("APCA-API-SECRET-KEY", self.config.api_secret.expose_secret())
    }

    async fn get_positions(&self) -> ExchangeResult<Vec<AlpacaPosition>> {
        debug!("GET /v2/positions");
        let response = self
            .authed(self.client.get(self.url("/v2/positions")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post_order(&self, request: &OrderRequest) -> ExchangeResult<AlpacaOrderResponse> {
        let body = AlpacaOrderBody {
            symbol: request.symbol.as_str(),
            qty: request.quantity.normalize().to_string(),
            side: request.side.as_str(),
            order_type: request.order_type.as_str(),
            time_in_force: request.time_in_force.as_str(),
            limit_price: request.limit_price.map(|p| p.to_string()),
            client_order_id: &request.client_order_id,
        };

        debug!(symbol = %request.symbol, side = %request.side, "POST /v2/orders");
        let response = self
            .authed(self.client.post(self.url("/v2/orders")))
            .json(&body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// HTTP 응답 처리.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::ParseError(e.to_string())
            });
        }

        let message = serde_json::from_str::<AlpacaError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(Self::map_status(status, message))
    }

    /// HTTP 상태 코드를 ExchangeError로 매핑.
    fn map_status(status: StatusCode, message: String) -> ExchangeError {
        match status {
            StatusCode::UNAUTHORIZED => ExchangeError::Unauthorized(message),
            StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY => {
                ExchangeError::OrderRejected(message)
            }
            StatusCode::NOT_FOUND => ExchangeError::SymbolNotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ExchangeError::RateLimited,
            s if s.is_server_error() => ExchangeError::NetworkError(message),
            s => ExchangeError::ApiError {
                code: i32::from(s.as_u16()),
                message,
            },
        }
    }

    fn parse_decimal(value: &str) -> ExchangeResult<Decimal> {
        Decimal::from_str(value)
            .map_err(|e| ExchangeError::ParseError(format!("숫자 파싱 실패 ({}): {}", value, e)))
    }
}

#[async_trait]
impl ExecutionService for AlpacaClient {
    async fn list_positions(&self) -> Result<Vec<PositionInfo>, ProviderError> {
        let positions = self.get_positions().await?;
        let positions = positions
            .into_iter()
            .map(|p| -> ExchangeResult<PositionInfo> {
                let quantity = Self::parse_decimal(&p.qty)?;
                Ok(PositionInfo::new(Symbol::new(p.symbol), quantity))
            })
            .collect::<ExchangeResult<Vec<_>>>()?;

        debug!(count = positions.len(), "Alpaca 포지션 조회 완료");
        Ok(positions)
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, OrderError> {
        let response = self.post_order(request).await?;

        let side = match response.side.as_str() {
            "sell" => Side::Sell,
            _ => Side::Buy,
        };
        let quantity = match response.qty.as_deref() {
            Some(qty) => Self::parse_decimal(qty)?,
            None => request.quantity,
        };

        info!(
            order_id = %response.id,
            symbol = %response.symbol,
            side = %side,
            status = %response.status,
            "Alpaca 주문 접수"
        );

        Ok(OrderResult {
            order_id: response.id,
            client_order_id: response.client_order_id,
            symbol: Symbol::new(response.symbol),
            side,
            quantity,
            status: OrderStatus::from_broker(&response.status),
        })
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}
