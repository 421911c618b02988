//! # 습관 카탈로그 쿼리 모듈
//!
//! ## 테이블 구조
//! - `habits`: 습관 엔티티 (id, title, created_at)
//! - `habit_week_days`: 습관별 반복 요일 (habit_id, week_day)
//!
//! 습관은 생성 후 수정/삭제되지 않습니다.

use crate::error::AppError;           // 에러 타입
use crate::models::*;                 // Habit, HabitRow, CreateHabitRequest
use crate::services::recurrence;      // 요일 값 검증 (0~6, 중복 제거)
use chrono::NaiveDate;                // 시각 없는 달력 날짜 (DB에는 'YYYY-MM-DD' TEXT로 저장)
use sqlx::SqlitePool;                 // SQLite 연결 풀

/// 습관 조회 시 공통으로 쓰는 SELECT 목록
///
/// 요일은 서브쿼리의 `GROUP_CONCAT`으로 한 문자열에 모아 가져옵니다.
/// 연결 순서는 보장되지 않지만 `Habit`으로 변환할 때 집합으로 정리됩니다.
const HABIT_COLUMNS: &str = r#"
    h.id, h.title, h.created_at,
    (SELECT GROUP_CONCAT(hwd.week_day) FROM habit_week_days hwd WHERE hwd.habit_id = h.id)
        AS week_days
"#;

/// "습관 `h`가 `date_expr` 날짜에 수행 대상이다"를 나타내는 SQL 조건식
///
/// `date_expr`는 `?` 플레이스홀더나 `d.date` 같은 컬럼 참조입니다.
/// `?`를 넘기면 조건식 안에 두 번 나타나므로 날짜를 두 번 바인딩해야 합니다.
///
/// SQLite의 `strftime('%w', ...)`도 0 = 일요일 기준이라
/// `services::dates::weekday_of`와 같은 요일 번호를 냅니다.
pub fn due_on(date_expr: &str) -> String {
    format!(
        r#"h.created_at <= {date_expr}
        AND EXISTS (
            SELECT 1 FROM habit_week_days hwd
            WHERE hwd.habit_id = h.id
              AND hwd.week_day = CAST(strftime('%w', {date_expr}) AS INTEGER)
        )"#
    )
}

/// 모든 습관을 생성 순서로 조회합니다.
///
/// UUIDv7은 시간순으로 정렬되므로 같은 날 생성된 습관도 생성 순서가 유지됩니다.
pub async fn list_habits(pool: &SqlitePool) -> Result<Vec<Habit>, AppError> {
    let sql = format!("SELECT {HABIT_COLUMNS} FROM habits h ORDER BY h.created_at, h.id");
    // query_as::<_, HabitRow>: 결과 행을 HabitRow 구조체로 매핑 (FromRow derive 필요)
    let rows = sqlx::query_as::<_, HabitRow>(&sql).fetch_all(pool).await?;

    // Iterator<Item = Result<Habit, _>>를 collect하면 Result<Vec<Habit>, _>가 됩니다.
    // 하나라도 변환에 실패하면 첫 번째 에러가 반환됩니다.
    rows.into_iter().map(Habit::try_from).collect()
}

/// ID로 습관 하나를 조회합니다.
pub async fn get_habit(pool: &SqlitePool, id: &str) -> Result<Option<Habit>, AppError> {
    let sql = format!("SELECT {HABIT_COLUMNS} FROM habits h WHERE h.id = ?");
    let row = sqlx::query_as::<_, HabitRow>(&sql)
        .bind(id)
        .fetch_optional(pool) // 결과가 0개 또는 1개: Option<HabitRow>
        .await?;

    // Option<Result<T, E>> → Result<Option<T>, E>
    row.map(Habit::try_from).transpose()
}

/// 습관 존재 여부만 확인합니다.
pub async fn habit_exists(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM habits WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

/// `date`에 수행 대상인 습관을 생성 순서로 조회합니다.
pub async fn list_possible_habits(
    pool: &SqlitePool,
    date: NaiveDate,
) -> Result<Vec<Habit>, AppError> {
    let sql = format!(
        "SELECT {HABIT_COLUMNS} FROM habits h WHERE {} ORDER BY h.created_at, h.id",
        due_on("?")
    );
    // due_on("?")에는 플레이스홀더가 두 개 있으므로 같은 날짜를 두 번 바인딩합니다
    let rows = sqlx::query_as::<_, HabitRow>(&sql)
        .bind(date)
        .bind(date)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Habit::try_from).collect()
}

/// 새 습관을 생성합니다.
///
/// ## 처리 흐름
/// 1. 제목과 요일 검증 (실패 시 `InvalidInput`)
/// 2. 트랜잭션 안에서 `habits` 한 행과 `habit_week_days` 여러 행을 삽입
/// 3. 방금 생성한 습관을 다시 조회하여 반환
///
/// `created_at`은 호출하는 쪽이 넘겨주는 "오늘" 날짜입니다.
pub async fn create_habit(
    pool: &SqlitePool,
    req: &CreateHabitRequest,
    created_at: NaiveDate,
) -> Result<Habit, AppError> {
    // ── 1단계: 입력 검증 ──
    // 앞뒤 공백을 제거한 제목이 비어 있으면 거부합니다
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()));
    }
    // [1, 3, 3, 5] → {1, 3, 5}. 0~6 밖의 값이 하나라도 있으면 InvalidInput
    let week_days = recurrence::validate_week_days(&req.week_days)?;

    // UUIDv7: 시간 기반 UUID라 ID 순서가 곧 생성 순서입니다
    let id = uuid::Uuid::now_v7().to_string();

    // ── 2단계: 트랜잭션 안에서 삽입 ──
    // 습관과 요일이 함께 저장되거나, 하나도 저장되지 않습니다.
    // tx가 commit 없이 drop되면 (예: `?`로 일찍 반환) 자동으로 롤백됩니다.
    let mut tx = pool.begin().await?;

    // &mut *tx: 트랜잭션이 잡고 있는 연결을 실행기(Executor)로 빌려줍니다
    sqlx::query("INSERT INTO habits (id, title, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(title)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

    for week_day in &week_days {
        sqlx::query("INSERT INTO habit_week_days (habit_id, week_day) VALUES (?, ?)")
            .bind(&id)
            .bind(i64::from(*week_day))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    // 구조화 로깅: %는 Display, ?는 Debug 형식으로 필드를 기록합니다
    tracing::info!(habit_id = %id, %created_at, ?week_days, "Created habit");

    // ── 3단계: 생성된 습관을 다시 조회하여 반환 ──
    // ok_or(): Option을 Result로 변환. 방금 커밋한 행이 없다면 내부 오류입니다
    get_habit(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created habit".to_string()))
}
