//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 매매 신호 계산 및 주문 실행 (`signals`)
//! - 복합 점수 랭킹 조회 (`rank`)
//! - 결과 출력 (table, json)

pub mod commands;
