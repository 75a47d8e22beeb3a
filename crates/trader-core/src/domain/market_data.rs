//! 시장 데이터 타입.
//!
//! 이 모듈은 외부 데이터 제공자가 반환하는 타입을 정의합니다:
//! - `PricePoint` / `PriceSeries` - 일별 종가 시계열
//! - `FundamentalSnapshot` - PER/PBR 비율 스냅샷
//! - `HistoryPeriod` / `DateRange` / `HistoryRequest` - 과거 데이터 조회 범위

use crate::error::{TraderError, TraderResult};
use crate::types::Price;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 특정 일자의 종가.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: Price,
}

impl PricePoint {
    /// 새 가격 포인트를 생성합니다.
    pub fn new(date: NaiveDate, close: Price) -> Self {
        Self { date, close }
    }
}

/// 날짜 오름차순으로 정렬된 종가 시계열.
///
/// 비어 있을 수 있습니다. `try_new`는 날짜가 엄격하게 증가하는지 검증합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 빈 시계열을 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 날짜가 엄격하게 증가하는 포인트 목록에서 시계열을 생성합니다.
    ///
    /// # Errors
    ///
    /// 같은 날짜가 반복되거나 순서가 뒤바뀐 경우 `TraderError::InvalidInput`.
    pub fn try_new(points: Vec<PricePoint>) -> TraderResult<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(TraderError::InvalidInput(format!(
                "가격 시계열 날짜가 오름차순이 아닙니다: {} 이후 {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { points })
    }

    /// 시작일부터 하루 간격의 종가 목록으로 시계열을 생성합니다.
    ///
    /// 테스트와 고정 데이터(fixture) 구성에 사용합니다.
    pub fn from_closes(start: NaiveDate, closes: &[Decimal]) -> Self {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint::new(start + Duration::days(i as i64), *close))
            .collect();
        Self { points }
    }

    /// 전체 포인트 슬라이스를 반환합니다.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 종가만 순서대로 반환합니다.
    pub fn closes(&self) -> Vec<Price> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// 첫 번째 포인트.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// 마지막 포인트.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// 가장 최근 종가.
    pub fn latest_close(&self) -> Option<Price> {
        self.last().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 종목의 밸류에이션 비율 스냅샷.
///
/// 데이터가 없는 항목은 `None`으로 표현하며 0으로 채우지 않습니다.
/// 0 점수 처리는 스코어러의 정책입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    /// 주가수익비율 (forward PER)
    pub pe_ratio: Option<Decimal>,
    /// 주가순자산비율
    pub pb_ratio: Option<Decimal>,
}

impl FundamentalSnapshot {
    pub fn new(pe_ratio: Option<Decimal>, pb_ratio: Option<Decimal>) -> Self {
        Self { pe_ratio, pb_ratio }
    }
}

/// 과거 데이터 조회 기간 (오늘 기준 상대 기간).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HistoryPeriod {
    /// 5일
    Days5,
    /// 1개월
    Month1,
    /// 3개월
    Month3,
    /// 6개월
    Month6,
    /// 1년
    Year1,
    /// 2년
    Year2,
    /// 5년
    Year5,
}

impl HistoryPeriod {
    /// 데이터 제공자가 사용하는 범위 문자열 ("5d", "6mo", "1y" ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::Days5 => "5d",
            HistoryPeriod::Month1 => "1mo",
            HistoryPeriod::Month3 => "3mo",
            HistoryPeriod::Month6 => "6mo",
            HistoryPeriod::Year1 => "1y",
            HistoryPeriod::Year2 => "2y",
            HistoryPeriod::Year5 => "5y",
        }
    }
}

impl Default for HistoryPeriod {
    fn default() -> Self {
        Self::Month6
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = TraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5d" => Ok(Self::Days5),
            "1mo" => Ok(Self::Month1),
            "3mo" => Ok(Self::Month3),
            "6mo" => Ok(Self::Month6),
            "1y" => Ok(Self::Year1),
            "2y" => Ok(Self::Year2),
            "5y" => Ok(Self::Year5),
            other => Err(TraderError::InvalidInput(format!(
                "알 수 없는 조회 기간: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for HistoryPeriod {
    type Error = TraderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HistoryPeriod> for String {
    fn from(period: HistoryPeriod) -> Self {
        period.as_str().to_string()
    }
}

/// 시작일과 종료일로 지정한 조회 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 새 구간을 생성합니다.
    ///
    /// # Errors
    ///
    /// `start > end`이면 `TraderError::InvalidInput`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> TraderResult<Self> {
        if start > end {
            return Err(TraderError::InvalidInput(format!(
                "시작일({})이 종료일({})보다 늦습니다",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// 종료일 기준 최근 `days`일 구간.
    pub fn trailing_days(end: NaiveDate, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// 과거 가격 조회 요청.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRequest {
    /// 최근 기간 (모멘텀 계산용)
    Period(HistoryPeriod),
    /// 날짜 구간 (이동평균 계산용)
    Range(DateRange),
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = TraderError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::try_new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

impl fmt::Display for HistoryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRequest::Period(period) => write!(f, "period={}", period),
            HistoryRequest::Range(range) => write!(f, "range={}", range),
        }
    }
}
