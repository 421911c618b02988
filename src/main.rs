//! # Habitude 웹 서버 진입점
//!
//! 요일 단위로 반복되는 개인 습관을 추적하는 HTTP 서버입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
// Rust에서 `mod`는 다른 파일의 코드를 현재 크레이트에 포함시킵니다.
mod config;   // config.rs: 환경변수 설정
mod db;       // db/: 데이터베이스 쿼리 함수들
mod error;    // error.rs: 에러 타입 정의
mod models;   // models/: 데이터 구조체 정의
mod routes;   // routes/: API 엔드포인트 핸들러
mod services; // services/: 날짜 정규화, 반복 규칙

// ── 외부 크레이트 가져오기 ──
use anyhow::Result;                 // 범용 에러 타입 (main 함수용)
use axum::Router;                   // HTTP 라우터
use config::Config;                 // 설정 구조체
use routes::AppState;               // 공유 상태 (DB 풀)
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions}; // SQLite 연결 옵션과 풀 설정
use std::str::FromStr;              // 문자열 → SqliteConnectOptions 파싱
use tower_http::{
    cors::{Any, CorsLayer},         // CORS 미들웨어
    trace::TraceLayer,              // HTTP 요청 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 설정 트레이트

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG 환경변수가 없으면 habitude, tower_http, axum을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitude=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Habitude server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // create_if_missing: DB 파일이 없으면 새로 만듭니다.
    // 외래키(PRAGMA foreign_keys)는 sqlx가 기본으로 켭니다.
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState { pool };

    // ── 6단계: CORS 미들웨어 설정 ──
    // 어느 출처(origin)에서든 API를 호출할 수 있게 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // nest: 모든 API 경로 앞에 /api/v1을 붙입니다
    // layer: 바깥쪽에 추가한 레이어가 요청을 먼저 받습니다
    let app = Router::new()
        .nest("/api/v1", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 7단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
