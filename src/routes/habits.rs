//! # 습관 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/habits | `list_habits` | 전체 습관 목록 |
//! | POST | /api/v1/habits | `create_habit` | 새 습관 생성 (생성일 = 오늘) |
//! | PATCH | /api/v1/habits/{id}/toggle | `toggle_habit` | 오늘의 완료 상태 뒤집기 |

//!
//! ## Axum 핸들러 패턴
//! 각 함수는 Axum의 **추출자(Extractor)** 패턴을 따릅니다:
//! - `State(state)`: 애플리케이션 공유 상태 (DB 풀)
//! - `Path(id)`: URL 경로의 변수 (`{id}` 부분)
//! - `Json(req)`: 요청 본문을 구조체로 파싱

// ── 의존성 가져오기 ──
use crate::{
    db,              // 데이터베이스 쿼리 모듈
    error::AppError, // 에러 타입 (자동으로 HTTP 에러 응답으로 변환됨)
    models::*,       // 요청/응답 구조체들 (Habit, CreateHabitRequest, ToggleResult 등)
    services::dates, // 오늘 날짜 (생성일, 토글 대상 날짜)
};
use axum::{
    extract::{Path, State}, // Axum 추출자: URL 파라미터, 앱 상태 추출
    http::StatusCode,       // HTTP 상태 코드 (201 Created 등)
    Json,                   // JSON 요청/응답 처리
};
use serde_json::{json, Value}; // JSON 객체 생성용 매크로와 범용 JSON 타입
use sqlx::SqlitePool;          // SQLite 연결 풀 타입

// #[derive(Clone)]: Axum의 State 추출자는 내부적으로 AppState를 clone하므로 필수입니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
}

/// 전체 습관 목록을 생성 순서로 조회합니다.
///
/// `GET /habits` → `{ "habits": [...] }`
///
/// 반환 타입이 `Result<Json<Value>, AppError>`이면:
/// - 성공(Ok): JSON 응답을 200 상태로 반환
/// - 실패(Err): AppError가 자동으로 적절한 HTTP 에러 응답으로 변환됨
pub async fn list_habits(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    // &state.pool: 풀의 참조를 전달 (소유권 이동 없이 빌려줌)
    let habits = db::list_habits(&state.pool).await?;
    // { "habits": [...] } 형태의 응답을 생성
    Ok(Json(json!({ "habits": habits })))
}

/// 새 습관을 생성합니다.
///
/// `POST /habits` + `{ "title": "Read", "week_days": [1, 3, 5] }` → `201 Created`
///
/// 생성일은 요청 본문으로 받지 않고 서버의 오늘 날짜를 사용합니다.
///
/// `Json(req)`: 요청 본문을 `CreateHabitRequest`로 자동 파싱합니다.
/// JSON 형식 자체가 잘못되면 Axum이 알아서 4xx를 돌려주고,
/// 제목/요일 값 검증은 `db::create_habit`이 `InvalidInput`(400)으로 처리합니다.
pub async fn create_habit(
    State(state): State<AppState>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = db::create_habit(&state.pool, &req, dates::today()).await?;
    // (StatusCode, Json) 튜플: 201 Created와 생성된 습관을 함께 반환
    Ok((StatusCode::CREATED, Json(habit)))
}

/// 오늘 날짜 기준으로 습관의 완료 상태를 뒤집습니다.
///
/// `PATCH /habits/{id}/toggle` → `{ "completed": true | false }`
///
/// 존재하지 않는 습관이면 404, 동시 토글 경쟁이 풀리지 않으면 409를 반환합니다.
///
/// `Path(id)`: URL의 `{id}` 부분을 String으로 추출합니다.
/// 예: `/api/v1/habits/0192-abcd/toggle` → id = "0192-abcd"
pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ToggleResult>, AppError> {
    // 토글할 날짜는 요청에서 받지 않고 항상 오늘입니다
    let result = db::toggle_completion(&state.pool, dates::today(), &id).await?;
    // ToggleResult는 Serialize를 derive했으므로 그대로 { "completed": ... }가 됩니다
    Ok(Json(result))
}
