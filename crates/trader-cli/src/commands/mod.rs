//! CLI 명령어 구현 모듈.

pub mod output;
pub mod rank;
pub mod signals;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use trader_core::{AppConfig, Symbol};

/// 명령행 오버라이드가 있으면 그것을, 없으면 설정의 유니버스를 사용합니다.
pub fn resolve_universe(config: &AppConfig, symbols: Option<&str>) -> anyhow::Result<Vec<Symbol>> {
    let universe = match symbols {
        Some(list) => Symbol::parse_list(list),
        None => config.universe.symbols(),
    };
    if universe.is_empty() {
        anyhow::bail!("평가할 종목이 없습니다");
    }
    Ok(universe)
}

/// 데이터 조회 중 표시할 스피너.
pub(crate) fn spinner(message: String) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}
