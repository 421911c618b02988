//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `habits`: 습관 카탈로그 (생성, 조회, 날짜별 수행 대상 조회)
//! - `days`: 날짜 레코드와 완료 기록 (지연 생성, 토글)
//! - `summary`: 날짜별 완료 수 / 수행 대상 수 집계

// pub mod: 하위 모듈을 공개(public)로 선언합니다.
pub mod days;
pub mod habits;
pub mod summary;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::toggle_completion`처럼 바로 접근할 수 있게 합니다.
pub use days::*;
pub use habits::*;
pub use summary::*;

/// 테스트마다 새 인메모리 DB를 만들고 마이그레이션을 적용합니다.
///
/// `sqlite::memory:`는 연결마다 별개의 DB이므로 연결을 하나로 고정합니다.
/// 동시성 테스트도 이 한 연결을 번갈아 빌려 쓰므로 쿼리 사이의 경쟁은 그대로 재현됩니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// 여러 연결이 하나의 인메모리 DB를 공유하는 테스트용 풀
///
/// `file:memdb_<id>?mode=memory&cache=shared`: 이름이 같은 인메모리 DB를
/// 모든 연결이 공유합니다. 테스트마다 UUID로 이름을 달리해 서로 섞이지 않게 합니다.
/// 동시 요청 경쟁처럼 쿼리가 실제로 겹쳐야 하는 테스트에서 사용합니다.
#[cfg(test)]
pub async fn shared_test_pool(max_connections: u32) -> sqlx::SqlitePool {
    let db_url = format!(
        "file:memdb_{}?mode=memory&cache=shared",
        uuid::Uuid::now_v7().simple()
    );

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(max_connections)
        // 마지막 연결이 닫히면 인메모리 DB도 사라지므로 최소 1개는 유지합니다
        .min_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to open shared in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
