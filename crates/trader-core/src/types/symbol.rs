//! 심볼 정의.
//!
//! 종목 유니버스 전반에서 고유 키로 사용되는 티커 식별자를 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 주식 종목을 나타내는 불투명한 티커 식별자.
///
/// 입력된 문자열을 그대로 보존합니다 (대소문자 변환 없음).
/// 데이터 제공자와 브로커가 서로 다른 표기법을 쓰더라도
/// 변환은 각 제공자 구현의 책임입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self(ticker.into())
    }

    /// 티커 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 쉼표로 구분된 티커 목록을 파싱합니다 (예: "AAPL, MSFT,NVDA").
    ///
    /// 빈 항목은 건너뜁니다. 순서는 입력 순서를 따릅니다.
    pub fn parse_list(s: &str) -> Vec<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_opaque() {
        let symbol = Symbol::new("brk.b");
        assert_eq!(symbol.as_str(), "brk.b");
        assert_eq!(symbol.to_string(), "brk.b");
    }

    #[test]
    fn test_symbol_parse_list() {
        let symbols = Symbol::parse_list("AAPL, MSFT,,NVDA ");
        assert_eq!(
            symbols,
            vec![Symbol::new("AAPL"), Symbol::new("MSFT"), Symbol::new("NVDA")]
        );
    }

    #[test]
    fn test_symbol_serializes_as_string() {
        let json = serde_json::to_string(&Symbol::new("TSLA")).unwrap();
        assert_eq!(json, "\"TSLA\"");
    }
}
