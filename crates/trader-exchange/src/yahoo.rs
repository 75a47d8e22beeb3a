//! Yahoo Finance 데이터 제공자.
//!
//! 일봉 종가 시계열과 PER/PBR 비율을 조회합니다.
//!
//! # 심볼 형식
//!
//! 모든 심볼은 Yahoo Finance 형식으로 전달되어야 합니다:
//! - 미국 주식: "AAPL", "GOOGL"
//! - 한국 주식: "005930.KS" (코스피) 또는 "124560.KQ" (코스닥)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use trader_exchange::yahoo::YahooFinanceProvider;
//! use trader_core::{HistoryPeriod, HistoryRequest, HistoricalDataProvider, Symbol};
//!
//! let provider = YahooFinanceProvider::new()?;
//! let series = provider
//!     .fetch(&Symbol::new("AAPL"), &HistoryRequest::Period(HistoryPeriod::Month6))
//!     .await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::{ExchangeError, ExchangeResult};
use trader_core::{
    FundamentalDataProvider, FundamentalSnapshot, HistoricalDataProvider, HistoryRequest,
    PricePoint, PriceSeries, ProviderError, Symbol,
};

/// 일봉 간격.
const DAILY_INTERVAL: &str = "1d";

/// Yahoo Finance 데이터 제공자.
///
/// `get_ticker_info`가 `&mut self`를 요구하므로 펀더멘털 조회용 커넥터는 Mutex로 감쌉니다.
/// 시세 조회는 별도 커넥터를 사용해 동시에 실행될 수 있습니다.
pub struct YahooFinanceProvider {
    quotes: yahoo::YahooConnector,
    ticker_info: Mutex<yahoo::YahooConnector>,
}

impl YahooFinanceProvider {
    /// 새로운 Yahoo Finance 제공자 생성.
    pub fn new() -> ExchangeResult<Self> {
        let connect = || {
            yahoo::YahooConnector::new().map_err(|e| {
                ExchangeError::NetworkError(format!("Yahoo Finance 연결 실패: {}", e))
            })
        };

        Ok(Self {
            quotes: connect()?,
            ticker_info: Mutex::new(connect()?),
        })
    }

    async fn fetch_quotes(
        &self,
        symbol: &str,
        request: &HistoryRequest,
    ) -> ExchangeResult<Vec<yahoo::Quote>> {
        let connector = &self.quotes;
        let response = match request {
            HistoryRequest::Period(period) => {
                connector
                    .get_quote_range(symbol, DAILY_INTERVAL, period.as_str())
                    .await
            }
            HistoryRequest::Range(range) => {
                // Yahoo의 종료일은 배타적이므로 하루를 더해 종료일을 포함시킴
                let start = naive_date_to_offset_datetime(range.start)?;
                let end = naive_date_to_offset_datetime(range.end + Duration::days(1))?;
                connector
                    .get_quote_history_interval(symbol, start, end, DAILY_INTERVAL)
                    .await
            }
        }
        .map_err(|e| {
            ExchangeError::NetworkError(format!("Yahoo Finance API 오류 ({}): {}", symbol, e))
        })?;

        response
            .quotes()
            .map_err(|e| ExchangeError::SymbolNotFound(format!("{}: {}", symbol, e)))
    }

    async fn fetch_ticker_ratios(&self, symbol: &str) -> ExchangeResult<FundamentalSnapshot> {
        let summary = self
            .ticker_info
            .lock()
            .await
            .get_ticker_info(symbol)
            .await
            .map_err(|e| {
                ExchangeError::NetworkError(format!("Yahoo ticker info 조회 실패 ({}): {}", symbol, e))
            })?;

        let result = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                ExchangeError::SymbolNotFound(format!("Yahoo ticker info 결과 없음: {}", symbol))
            })?;

        let key_stats = result.default_key_statistics.as_ref();
        let summary_detail = result.summary_detail.as_ref();

        let pe_ratio = key_stats
            .and_then(|ks| ks.forward_pe)
            .or_else(|| summary_detail.and_then(|sd| sd.forward_pe))
            .and_then(Decimal::from_f64_retain);
        let pb_ratio = key_stats
            .and_then(|ks| ks.price_to_book)
            .and_then(Decimal::from_f64_retain);

        Ok(FundamentalSnapshot::new(pe_ratio, pb_ratio))
    }
}

/// Yahoo 응답을 날짜 오름차순 종가 시계열로 변환.
///
/// 같은 날짜가 여러 번 나오면 마지막 값을 사용하고,
/// 종가가 유한하지 않은 행은 건너뜁니다.
fn quotes_to_series(quotes: &[yahoo::Quote]) -> PriceSeries {
    let points = quotes
        .iter()
        .filter_map(|q| quote_point(i64::try_from(q.timestamp).ok()?, q.close))
        .collect();
    normalize_points(points)
}

/// 유닉스 타임스탬프와 종가로 일별 가격 포인트를 만듭니다.
fn quote_point(timestamp: i64, close: f64) -> Option<PricePoint> {
    let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
    let close = Decimal::from_f64_retain(close)?;
    Some(PricePoint::new(date, close))
}

fn normalize_points(mut points: Vec<PricePoint>) -> PriceSeries {
    points.sort_by_key(|p| p.date);
    points.reverse();
    points.dedup_by_key(|p| p.date);
    points.reverse();

    // 정렬/중복 제거 후이므로 순서 검증은 항상 통과
    PriceSeries::try_new(points).unwrap_or_else(|_| PriceSeries::empty())
}

/// NaiveDate를 OffsetDateTime(UTC 자정)으로 변환.
fn naive_date_to_offset_datetime(date: NaiveDate) -> ExchangeResult<OffsetDateTime> {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| time::Month::try_from(m).ok())
        .ok_or_else(|| ExchangeError::ParseError(format!("잘못된 월: {}", date)))?;
    let day = u8::try_from(date.day())
        .map_err(|_| ExchangeError::ParseError(format!("잘못된 일: {}", date)))?;

    time::Date::from_calendar_date(date.year(), month, day)
        .map(|d| d.midnight().assume_utc())
        .map_err(|e| ExchangeError::ParseError(format!("날짜 변환 실패 ({}): {}", date, e)))
}

#[async_trait]
impl HistoricalDataProvider for YahooFinanceProvider {
    async fn fetch(
        &self,
        symbol: &Symbol,
        request: &HistoryRequest,
    ) -> Result<PriceSeries, ProviderError> {
        debug!(symbol = %symbol, request = %request, "Yahoo Finance 시계열 조회");

        let quotes = self.fetch_quotes(symbol.as_str(), request).await?;
        let series = quotes_to_series(&quotes);

        if series.is_empty() {
            warn!(symbol = %symbol, "Yahoo Finance 데이터 없음");
            return Err(ProviderError::DataUnavailable(format!(
                "{}: 가격 데이터 없음",
                symbol
            )));
        }

        debug!(symbol = %symbol, points = series.len(), "Yahoo Finance 종가 수신");
        Ok(series)
    }
}

#[async_trait]
impl FundamentalDataProvider for YahooFinanceProvider {
    async fn fetch_ratios(&self, symbol: &Symbol) -> Result<FundamentalSnapshot, ProviderError> {
        let snapshot = self.fetch_ticker_ratios(symbol.as_str()).await?;
        debug!(
            symbol = %symbol,
            pe = ?snapshot.pe_ratio,
            pb = ?snapshot.pb_ratio,
            "Yahoo Finance 펀더멘털 수신"
        );
        Ok(snapshot)
    }
}
