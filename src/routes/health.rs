//! # 헬스체크(Health Check) 핸들러
//!
//! 서버가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! DB를 건드리지 않으므로 프로세스가 요청을 받고 있는지만 확인합니다.

use axum::Json;                // JSON 응답 래퍼
use serde_json::{json, Value}; // JSON 생성 유틸리티

/// `GET /health` — 서버 상태를 확인합니다.
///
/// State, Path 등 아무 추출자도 필요 없는 가장 단순한 핸들러입니다.
/// 반환 타입이 `Json<Value>`이므로 Axum이 Content-Type 헤더와 200 OK를 설정합니다.
///
/// `Result`를 사용하지 않으므로 이 핸들러는 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    // 결과: {"status": "ok"}
    Json(json!({
        "status": "ok"
    }))
}
