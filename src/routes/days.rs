//! # 하루 조회 라우트 핸들러
//!
//! - `GET /api/v1/day?date=2026-10-16` → 그날 수행 대상 습관과 완료된 습관 ID
//!
//! `date`는 날짜만 있어도, 시각이 붙어 있어도 됩니다. 시각은 버려집니다.

use crate::{
    db,                          // 데이터베이스 쿼리 모듈
    error::AppError,             // 에러 타입
    models::*,                   // DayView, DayQuery
    routes::habits::AppState,    // 애플리케이션 공유 상태 (DB 풀)
    services::dates,             // 날짜 해석, 요일 계산
};
use axum::{
    extract::{Query, State}, // Query: URL 쿼리 문자열(?date=...)을 구조체로 파싱
    Json,
};

/// `GET /day?date=...`
///
/// 수행 대상 조회와 완료 기록 조회는 서로 독립적이므로 `tokio::try_join!`으로 함께 실행합니다.
pub async fn get_day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayView>, AppError> {
    // 1단계: 날짜 해석 + 정규화 (시각은 버림). 해석할 수 없으면 400
    let date = dates::parse_date(&query.date)?;
    tracing::debug!(%date, week_day = dates::weekday_of(date), "Loading day view");

    // 2단계: 두 조회를 동시에 실행
    // try_join!: 모든 Future를 함께 기다리고, 하나라도 Err이면 그 에러를 즉시 반환합니다
    let (possible_habits, completed_habits) = tokio::try_join!(
        db::list_possible_habits(&state.pool, date),
        db::completed_habit_ids(&state.pool, date),
    )?;

    // 3단계: 두 결과를 하나의 응답으로 합침
    Ok(Json(DayView {
        date,
        possible_habits,
        completed_habits,
    }))
}
