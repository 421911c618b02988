//! # 에러 처리 모듈
//!
//! 습관 추적 코어와 HTTP 계층에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 모든 에러는 요청 단위입니다. 한 요청이 실패해도 저장된 데이터는
//! 부분적으로 반영된 상태로 남지 않습니다.

use axum::{
    http::StatusCode,                     // HTTP 상태 코드 (400, 404, 409, 500 등)
    response::{IntoResponse, Response},   // Axum의 응답 변환 트레이트
    Json,                                 // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: Display와 std::error::Error 구현을 자동 생성

// #[derive(Debug, Error)]:
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): #[error("...")] 어트리뷰트로 Display 메시지까지 자동 생성합니다.
//   {0}은 variant의 첫 번째 필드를 가리킵니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 예: 존재하지 않는 습관 ID로 완료 토글을 요청한 경우
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 입력 (HTTP 400)
    /// 범위를 벗어난 요일 값, 해석할 수 없는 날짜, 빈 제목 등
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 유일성 제약 경쟁에서 재시도로도 해소되지 않은 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수에서 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // match: enum의 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive matching).
        // 각 갈래는 (상태 코드, 에러 코드 문자열, 메시지) 튜플을 만듭니다.
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            // ref: 값을 이동(move)하지 않고 참조만 빌려옵니다.
            // self를 match 중이므로 내부 String은 참조로 접근합니다.
            AppError::InvalidInput(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            AppError::Conflict(ref msg) => {
                // 동시 요청 경쟁이 재시도 후에도 풀리지 않은 경우. 운영자가 볼 수 있게 경고 로그를 남깁니다
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "conflict", msg.clone())
            }
            AppError::Internal(ref msg) => {
                // 내부 에러는 로그에만 기록하고, 클라이언트에는 일반 메시지만 보냅니다
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // (StatusCode, Json<Value>) 튜플은 Axum이 HTTP 응답으로 변환할 수 있습니다
        (status, body).into_response()
    }
}
