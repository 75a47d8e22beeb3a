//! 시스템 공통 에러 타입.
//!
//! 종목 단위의 데이터 실패는 에러로 전파하지 않고 0점 처리됩니다
//! (`ProviderError` 참고). 이 타입은 설정, 입력 검증처럼
//! 실행 전체를 중단해야 하는 경우에 사용합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum TraderError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 주문 실행 에러
    #[error("실행 에러: {0}")]
    Execution(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type TraderResult<T> = Result<T, TraderError>;

impl From<serde_json::Error> for TraderError {
    fn from(err: serde_json::Error) -> Self {
        TraderError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for TraderError {
    fn from(err: config::ConfigError) -> Self {
        TraderError::Config(err.to_string())
    }
}

/// 실패로 취급하지 않고 기본값으로 흡수되는 점수 계산 조건.
///
/// 로그의 `condition` 필드 값으로 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCondition {
    /// 정규화 입력이 모두 같은 값 (min == max)
    DegenerateInput,
    /// 이동평균 윈도우를 채울 만큼 이력이 없음
    InsufficientHistory,
}

impl std::fmt::Display for ScoreCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreCondition::DegenerateInput => write!(f, "degenerate_input"),
            ScoreCondition::InsufficientHistory => write!(f, "insufficient_history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TraderError::Config("short_window must be positive".to_string());
        assert_eq!(err.to_string(), "설정 에러: short_window must be positive");
    }

    #[test]
    fn test_from_serde_error() {
        let err: TraderError = serde_json::from_str::<u32>("not a number")
            .unwrap_err()
            .into();
        assert!(matches!(err, TraderError::Serialization(_)));
    }

    #[test]
    fn test_score_condition_display() {
        assert_eq!(ScoreCondition::DegenerateInput.to_string(), "degenerate_input");
        assert_eq!(
            ScoreCondition::InsufficientHistory.to_string(),
            "insufficient_history"
        );
    }
}
