//! # 요약 라우트 핸들러
//!
//! - `GET /api/v1/summary` → `{ "summary": [{ "id", "date", "completed", "possible" }, ...] }`

use crate::{
    db,                       // 데이터베이스 쿼리 모듈 (summary 집계)
    error::AppError,          // 에러 타입
    routes::habits::AppState, // 애플리케이션 공유 상태
};
use axum::{extract::State, Json};
use serde_json::{json, Value}; // JSON 응답 생성

/// `GET /summary` — 완료 기록이 있었던 모든 날짜의 요약 (날짜 오름차순)
///
/// 요약은 저장된 값이 아니라 매 요청마다 계산됩니다.
/// 같은 데이터라면 몇 번을 호출해도 같은 결과가 나옵니다.
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    // 날짜별 (completed, possible) 계산은 SQL 한 번으로 끝납니다 (db/summary.rs)
    let summary = db::summary(&state.pool).await?;
    Ok(Json(json!({ "summary": summary })))
}
