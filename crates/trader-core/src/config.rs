//! 설정 관리.
//!
//! 기본값 → TOML 파일 → `TRADER__` 접두사 환경 변수 순서로 설정을 병합합니다.
//! 예: `TRADER__CROSSOVER__SHORT_WINDOW=10`.

use crate::domain::{HistoryPeriod, TimeInForce};
use crate::error::{TraderError, TraderResult};
use crate::types::{Quantity, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 기본 종목 유니버스 (미국 대형주 40종목).
pub const DEFAULT_UNIVERSE: [&str; 40] = [
    "TSLA", "NVDA", "AMZN", "AAPL", "MSFT", "GOOGL", "META", "BABA", "NFLX", "ADBE", "JNJ", "V",
    "PG", "UNH", "DIS", "MA", "HD", "VZ", "INTC", "CSCO", "PFE", "MRK", "WMT", "BA", "KO", "XOM",
    "CVX", "ABBV", "MCD", "TMO", "NKE", "DHR", "ACN", "ABT", "CRM", "LLY", "ORCL", "COST", "QCOM",
    "UPS",
];

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 종목 유니버스
    pub universe: UniverseConfig,
    /// 복합 점수 전략 설정
    pub composite: CompositeConfig,
    /// 이동평균 교차 전략 설정
    pub crossover: CrossoverConfig,
    /// 주문 실행 설정
    pub execution: ExecutionConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 파일명/줄 번호 출력 여부
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            with_file: false,
        }
    }
}

/// 종목 유니버스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// 평가할 티커 목록 (순서가 동점 처리 기준)
    pub symbols: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UniverseConfig {
    /// 설정된 유니버스를 심볼 목록으로 반환합니다.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.symbols.iter().map(|s| Symbol::new(s.as_str())).collect()
    }
}

/// 복합 점수 전략 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// 모멘텀 계산에 사용할 조회 기간
    pub momentum_period: HistoryPeriod,
    /// 모든 점수가 같을 때 정규화 값으로 채울 상수
    pub degenerate_fill: Decimal,
    /// 분위 수 (5 = 5분위, 상위/하위 floor(N/5) 선택)
    pub buckets: usize,
    /// 종목별 데이터 조회 동시 실행 수
    pub max_concurrency: usize,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            momentum_period: HistoryPeriod::Month6,
            degenerate_fill: Decimal::new(5, 1),
            buckets: 5,
            max_concurrency: 8,
        }
    }
}

/// 이동평균 교차 전략 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// 단기 이동평균 기간 (SMA)
    pub short_window: usize,
    /// 장기 이동평균 기간 (LMA)
    pub long_window: usize,
    /// 기준일로부터 조회할 일수
    pub lookback_days: u32,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            lookback_days: 365,
        }
    }
}

/// 주문 실행 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// 신호당 주문 수량
    pub order_quantity: Quantity,
    /// 주문 유효 기간
    pub time_in_force: TimeInForce,
    /// true면 주문을 만들기만 하고 제출하지 않음
    pub dry_run: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            order_quantity: Decimal::from(8),
            time_in_force: TimeInForce::Gtc,
            dry_run: false,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TraderResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("TRADER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TraderResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> TraderResult<()> {
        if self.crossover.short_window == 0 || self.crossover.short_window >= self.crossover.long_window
        {
            return Err(TraderError::Config(format!(
                "0 < short_window < long_window 이어야 합니다 (short={}, long={})",
                self.crossover.short_window, self.crossover.long_window
            )));
        }
        if self.composite.buckets == 0 {
            return Err(TraderError::Config("buckets는 1 이상이어야 합니다".to_string()));
        }
        if self.composite.max_concurrency == 0 {
            return Err(TraderError::Config(
                "max_concurrency는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.execution.order_quantity <= Decimal::ZERO {
            return Err(TraderError::Config(format!(
                "order_quantity는 양수여야 합니다: {}",
                self.execution.order_quantity
            )));
        }
        Ok(())
    }
}
