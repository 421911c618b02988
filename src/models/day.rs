//! # 날짜/완료 기록 모델 정의
//!
//! ## 구조체 역할
//! - `Day`: 완료 기록이 처음 생길 때 만들어지는 날짜 레코드 (`days` 테이블)
//! - `Completion`: (날짜, 습관) 완료 기록 (`day_habits` 테이블)
//! - `ToggleResult`: 토글 결과 응답
//! - `DayView`: 특정 날짜의 수행 대상 습관과 완료된 습관 ID
//! - `SummaryRow`: 날짜별 완료 수 / 수행 대상 수
//! - `DayQuery`: `GET /api/v1/day?date=...` 쿼리 파라미터

use super::Habit;                     // DayView에 담기는 습관 엔티티
use chrono::NaiveDate;                // 시각 없는 달력 날짜 (JSON으로는 "2026-10-16")
use serde::{Deserialize, Serialize};  // JSON 직렬화/역직렬화

// sqlx::FromRow: SQL 쿼리 결과 행을 이 구조체로 자동 매핑합니다.
// 컬럼 이름과 필드 이름이 같아야 합니다.

/// 날짜 레코드 — 한 날짜당 최대 한 행이며, 만들어진 뒤에는 수정/삭제되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Day {
    pub id: String,
    pub date: NaiveDate,
}

/// 완료 기록 — 이 행이 있으면 해당 날짜에 그 습관을 완료한 것입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Completion {
    pub day_id: String,
    pub habit_id: String,
}

/// `PATCH /api/v1/habits/{id}/toggle` 응답
///
/// 토글 이후의 상태입니다. `true`면 방금 완료 처리됨, `false`면 완료가 해제됨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleResult {
    pub completed: bool,
}

/// 하루치 화면에 필요한 데이터
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    /// 그날 수행 대상인 습관 (생성 순서)
    pub possible_habits: Vec<Habit>,
    /// 그날 완료된 습관 ID. 날짜 레코드가 없으면 빈 배열.
    pub completed_habits: Vec<String>,
}

/// 요약 한 행 — 날짜 레코드마다 하나씩 만들어집니다.
///
/// 저장되지 않고 조회할 때마다 현재 습관 데이터로 다시 계산됩니다.
/// `completed`가 `possible`보다 클 수도 있습니다.
/// (수행 대상이 아닌 날에 토글된 습관도 완료 수에 포함되기 때문)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummaryRow {
    pub id: String,
    pub date: NaiveDate,
    pub completed: i64,
    pub possible: i64,
}

/// `GET /api/v1/day` 쿼리 파라미터
///
/// 날짜 해석은 `services::dates::parse_date`가 맡으므로 문자열 그대로 받습니다.
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}
