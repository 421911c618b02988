//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `habits`: 습관 생성/목록, 완료 토글
//! - `days`: 특정 날짜의 수행 대상 / 완료 습관 조회
//! - `summary`: 날짜별 완료율 요약
//! - `health`: 서버 상태 확인 (헬스체크)

pub mod days;    // GET /day
pub mod habits;  // GET·POST /habits, PATCH /habits/{id}/toggle
pub mod health;  // GET /health
pub mod summary; // GET /summary

// 재수출(re-export): `routes::get_day`처럼 하위 모듈 이름 없이 접근할 수 있게 합니다
pub use days::*;
pub use habits::*;
pub use health::*;
pub use summary::*;

use axum::{
    routing::{get, patch}, // HTTP 메서드별 라우팅 함수
    Router,                // 라우터 타입
};

/// API 라우터를 만듭니다. `main.rs`에서 `/api/v1` 아래에 중첩됩니다.
///
/// axum 0.8부터 경로 파라미터는 `{id}` 형식입니다.
pub fn api_router(state: AppState) -> Router {
    // get(a).post(b): 같은 경로에 메서드별로 다른 핸들러를 연결합니다
    Router::new()
        .route("/habits", get(list_habits).post(create_habit))
        .route("/habits/{id}/toggle", patch(toggle_habit))
        .route("/day", get(get_day))
        .route("/summary", get(get_summary))
        .route("/health", get(health_check))
        // with_state: 모든 핸들러가 State<AppState>로 DB 풀에 접근할 수 있게 합니다
        .with_state(state)
}
