//! # 날짜 레코드 / 완료 기록 쿼리 모듈
//!
//! 습관 완료 여부를 저장하고 뒤집는(toggle) SQL 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `days`: 완료 기록이 처음 생긴 날짜 (`date`는 UNIQUE)
//! - `day_habits`: (day_id, habit_id) 완료 기록, 복합 PRIMARY KEY
//!
//! ```sql
//! days ←── day_habits ──→ habits
//!  (1)        (N:M)         (1)
//! ```
//!
//! ## 토글 흐름
//! ```text
//! toggle_completion(date, habit_id)
//!   ├─ 습관이 없으면 NotFound (날짜 레코드도 만들지 않음)
//!   ├─ find_or_create_day(date)      ← ON CONFLICT(date) DO NOTHING + 재조회
//!   └─ DELETE 성공 → completed: false
//!      아니면 INSERT 성공 → completed: true
//!      둘 다 실패(동시 토글) → 한 번 더 시도 후 Conflict
//! ```
//!
//! 존재 확인 후 생성하는 두 단계 대신, 각 단계가 한 문장으로 끝나는
//! 원자적 쿼리이므로 같은 키를 두고 경쟁해도 중복 행이 생기지 않습니다.

use crate::db::habits;       // 습관 존재 여부 확인 (habit_exists)
use crate::error::AppError;  // 에러 타입 (라우트에서 HTTP 에러 응답으로 변환됨)
use crate::models::*;        // Day, Completion, ToggleResult 등 모델 구조체
use chrono::NaiveDate;       // 시각 없는 달력 날짜 (DB에는 'YYYY-MM-DD' TEXT로 저장)
use sqlx::SqlitePool;        // SQLite 연결 풀

/// 동시 토글로 상태가 바뀌었을 때 다시 시도하는 총 횟수 (최초 1회 + 재시도 1회)
///
/// `const`: 컴파일 타임 상수. 타입(usize)을 반드시 명시해야 합니다.
const TOGGLE_ATTEMPTS: usize = 2;

/// 날짜로 날짜 레코드를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Day)을 반환합니다.
/// `date` 컬럼이 UNIQUE이므로 2행 이상은 나올 수 없습니다.
pub async fn find_day(pool: &SqlitePool, date: NaiveDate) -> Result<Option<Day>, AppError> {
    let day = sqlx::query_as::<_, Day>("SELECT id, date FROM days WHERE date = ?")
        // NaiveDate는 sqlx의 "chrono" feature 덕분에 바로 바인딩됩니다 → '2026-10-16'
        .bind(date)
        .fetch_optional(pool)
        .await?;

    Ok(day)
}

/// 날짜 레코드를 찾고, 없으면 만듭니다.
///
/// `INSERT ... ON CONFLICT(date) DO NOTHING`은 원자적이므로
/// 같은 날짜를 두 요청이 동시에 만들려 해도 한 행만 생깁니다.
/// 삽입이 무시되었다면 다른 요청이 먼저 만든 것이므로 한 번 다시 조회합니다.
///
/// ## 처리 흐름
/// 1. 이미 있으면 그대로 반환 (대부분의 요청은 여기서 끝남)
/// 2. 없으면 UUIDv7 ID로 삽입 시도 — 충돌 시 아무 일도 일어나지 않음
/// 3. 삽입이 무시되었으면(먼저 만든 요청이 있음) 다시 조회
pub async fn find_or_create_day(pool: &SqlitePool, date: NaiveDate) -> Result<Day, AppError> {
    // 1단계: 이미 있는 날짜 레코드 재사용
    // if let Some(day) = ...: Option이 Some일 때만 블록을 실행하는 패턴 매칭
    if let Some(day) = find_day(pool, date).await? {
        return Ok(day);
    }

    // 2단계: 삽입 시도
    // ON CONFLICT(date) DO NOTHING: UNIQUE 제약에 걸리면 에러 대신 0행 삽입으로 끝납니다.
    // "확인 후 삽입"을 두 쿼리로 나누면 그 사이에 다른 요청이 끼어들 수 있으므로
    // 삽입 자체가 충돌을 처리하도록 한 문장으로 작성합니다.
    let id = uuid::Uuid::now_v7().to_string();
    let inserted = sqlx::query("INSERT INTO days (id, date) VALUES (?, ?) ON CONFLICT(date) DO NOTHING")
        .bind(&id)
        .bind(date)
        .execute(pool)
        .await?
        // rows_affected(): 실제로 삽입된 행 수 (충돌로 무시되면 0)
        .rows_affected();

    if inserted > 0 {
        tracing::debug!(day_id = %id, %date, "Created day record");
        return Ok(Day { id, date });
    }

    // 3단계: 경쟁에서 졌음 — 먼저 만든 요청의 레코드를 다시 읽습니다 (재시도는 이 한 번뿐)
    tracing::debug!(%date, "Day record created concurrently, re-reading");
    find_day(pool, date)
        .await?
        // ok_or_else(): None이면 클로저가 만든 에러를 반환합니다.
        // 날짜 레코드는 삭제되지 않으므로 정상적으로는 항상 Some입니다.
        .ok_or_else(|| AppError::Conflict(format!("Could not create day record for {date}")))
}

/// `date`에 완료된 습관 ID 목록을 반환합니다.
///
/// 날짜 레코드가 없으면 JOIN 결과가 비므로 빈 목록입니다.
/// 읽기 전용이며 아무것도 만들지 않습니다.
pub async fn completed_habit_ids(
    pool: &SqlitePool,
    date: NaiveDate,
) -> Result<Vec<String>, AppError> {
    let completions = sqlx::query_as::<_, Completion>(
        r#"
        SELECT dh.day_id, dh.habit_id
        FROM day_habits dh
        JOIN days d ON d.id = dh.day_id
        WHERE d.date = ?
        ORDER BY dh.habit_id
        "#,
        // ↑ SQL 설명:
        //   days와 JOIN하여 날짜로 바로 찾습니다 (day_id를 먼저 조회할 필요 없음)
        //   ORDER BY habit_id → 같은 데이터면 항상 같은 순서
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    // into_iter(): Vec의 소유권을 가져가며 순회 → habit_id만 꺼내 새 Vec으로 수집
    Ok(completions.into_iter().map(|c| c.habit_id).collect())
}

/// (date, habit_id)의 완료 상태를 뒤집습니다.
///
/// 완료 상태를 직접 지정하는 방법은 없고, 현재 상태를 반전시키는 것만 가능합니다.
/// 수행 대상이 아닌 날짜인지는 확인하지 않습니다.
///
/// ## 반환값
/// - `Ok(ToggleResult { completed: true })`: 완료 기록이 새로 생김
/// - `Ok(ToggleResult { completed: false })`: 완료 기록이 삭제됨 (날짜 레코드는 남음)
/// - `Err(AppError::NotFound)`: 존재하지 않는 습관
/// - `Err(AppError::Conflict)`: 동시 토글 경쟁이 재시도 후에도 해소되지 않음
pub async fn toggle_completion(
    pool: &SqlitePool,
    date: NaiveDate,
    habit_id: &str,
) -> Result<ToggleResult, AppError> {
    // 1단계: 습관 존재 확인
    // 날짜 레코드를 만들기 전에 확인하므로, 없는 습관이면 아무것도 저장되지 않습니다.
    if !habits::habit_exists(pool, habit_id).await? {
        return Err(AppError::NotFound);
    }

    // 2단계: 날짜 레코드 확보 (없으면 지연 생성)
    let day = find_or_create_day(pool, date).await?;

    // 3단계: 뒤집기
    // 1..=TOGGLE_ATTEMPTS: 1부터 TOGGLE_ATTEMPTS까지 (끝 포함) 범위
    for attempt in 1..=TOGGLE_ATTEMPTS {
        // (a) 완료 기록이 있으면 삭제 → 미완료로 전환
        //     DELETE 한 문장이므로 두 요청이 동시에 지워도 1행만 삭제됩니다
        let removed = sqlx::query("DELETE FROM day_habits WHERE day_id = ? AND habit_id = ?")
            .bind(&day.id)
            .bind(habit_id)
            .execute(pool)
            .await?
            .rows_affected();

        if removed > 0 {
            tracing::info!(%date, habit_id, "Habit marked not completed");
            return Ok(ToggleResult { completed: false });
        }

        // (b) 없었으면 삽입 → 완료로 전환
        //     복합 PRIMARY KEY (day_id, habit_id) 충돌 시 0행 삽입으로 끝납니다
        let inserted = sqlx::query(
            r#"
            INSERT INTO day_habits (day_id, habit_id) VALUES (?, ?)
            ON CONFLICT(day_id, habit_id) DO NOTHING
            "#,
        )
        .bind(&day.id)
        .bind(habit_id)
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            tracing::info!(%date, habit_id, "Habit marked completed");
            return Ok(ToggleResult { completed: true });
        }

        // (c) DELETE와 INSERT 사이에 다른 요청이 먼저 완료 기록을 만들었습니다.
        //     상태를 다시 읽고 판단하기 위해 루프를 한 번 더 돕니다.
        tracing::warn!(%date, habit_id, attempt, "Completion changed concurrently");
    }

    // 재시도까지 모두 경쟁에서 졌음 → 호출자에게 Conflict(409)로 알립니다
    Err(AppError::Conflict(format!(
        "Completion for habit {habit_id} on {date} kept changing concurrently"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_habit, shared_test_pool, test_pool};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_habit(pool: &SqlitePool, title: &str, week_days: &[i64]) -> Habit {
        let req = CreateHabitRequest {
            title: title.to_string(),
            week_days: week_days.to_vec(),
        };
        create_habit(pool, &req, ymd(2026, 10, 1))
            .await
            .expect("Failed to create habit")
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    async fn days_on(pool: &SqlitePool, date: NaiveDate) -> i64 {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM days WHERE date = ?")
            .bind(date)
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    #[tokio::test]
    async fn test_completed_ids_empty_without_day() {
        let pool = test_pool().await;

        let ids = completed_habit_ids(&pool, ymd(2026, 10, 16)).await.unwrap();
        assert!(ids.is_empty());
        // 조회만으로는 날짜 레코드가 생기지 않습니다
        assert_eq!(count(&pool, "days").await, 0);
    }

    #[tokio::test]
    async fn test_first_toggle_creates_day_and_completion() {
        let pool = test_pool().await;
        let habit = setup_habit(&pool, "Read", &[1, 3, 5]).await;
        let today = ymd(2026, 10, 16);

        let result = toggle_completion(&pool, today, &habit.id).await.unwrap();
        assert_eq!(result, ToggleResult { completed: true });

        let day = find_day(&pool, today).await.unwrap().expect("day should exist");
        assert_eq!(day.date, today);
        assert_eq!(completed_habit_ids(&pool, today).await.unwrap(), vec![habit.id]);
    }

    #[tokio::test]
    async fn test_second_toggle_removes_completion_keeps_day() {
        let pool = test_pool().await;
        let habit = setup_habit(&pool, "Read", &[1, 3, 5]).await;
        let today = ymd(2026, 10, 16);

        toggle_completion(&pool, today, &habit.id).await.unwrap();
        let result = toggle_completion(&pool, today, &habit.id).await.unwrap();
        assert_eq!(result, ToggleResult { completed: false });

        assert!(completed_habit_ids(&pool, today).await.unwrap().is_empty());
        assert!(find_day(&pool, today).await.unwrap().is_some());
        assert_eq!(count(&pool, "days").await, 1);
        assert_eq!(count(&pool, "day_habits").await, 0);
    }

    #[tokio::test]
    async fn test_double_toggle_restores_state() {
        let pool = test_pool().await;
        let habit = setup_habit(&pool, "Run", &[0, 6]).await;
        let other = setup_habit(&pool, "Stretch", &[0, 6]).await;
        let date = ymd(2026, 10, 17);

        toggle_completion(&pool, date, &other.id).await.unwrap();
        let before = completed_habit_ids(&pool, date).await.unwrap();

        for _ in 0..3 {
            toggle_completion(&pool, date, &habit.id).await.unwrap();
            assert!(count(&pool, "day_habits").await <= 2);
            toggle_completion(&pool, date, &habit.id).await.unwrap();
            assert_eq!(completed_habit_ids(&pool, date).await.unwrap(), before);
        }
    }

    #[tokio::test]
    async fn test_toggle_unknown_habit_is_not_found_without_side_effects() {
        let pool = test_pool().await;

        let result = toggle_completion(&pool, ymd(2026, 10, 16), "no-such-habit").await;
        assert!(matches!(result, Err(AppError::NotFound)));
        assert_eq!(count(&pool, "days").await, 0);
        assert_eq!(count(&pool, "day_habits").await, 0);
    }

    #[tokio::test]
    async fn test_toggle_allows_habit_not_due_that_day() {
        let pool = test_pool().await;
        let monday_only = setup_habit(&pool, "Plan week", &[1]).await;
        let friday = ymd(2026, 10, 16);

        let result = toggle_completion(&pool, friday, &monday_only.id).await.unwrap();
        assert!(result.completed);
        assert_eq!(completed_habit_ids(&pool, friday).await.unwrap(), vec![monday_only.id]);
    }

    #[tokio::test]
    async fn test_find_or_create_day_reuses_existing() {
        let pool = test_pool().await;
        let date = ymd(2026, 10, 16);

        let first = find_or_create_day(&pool, date).await.unwrap();
        let second = find_or_create_day(&pool, date).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(count(&pool, "days").await, 1);
    }

    /// 여러 연결에서 동시에 같은 날짜 레코드를 만들어도 날짜당 한 행만 생깁니다.
    ///
    /// multi_thread 런타임 + 연결 여러 개인 공유 캐시 DB이므로 실제로 쿼리가 겹칩니다.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_day_creation_yields_single_row() {
        let pool = shared_test_pool(8).await;
        let first = ymd(2026, 11, 1);

        for offset in 0..20 {
            let date = first + chrono::Days::new(offset);

            // tokio::spawn: 각 작업을 별도 태스크로 띄워 여러 스레드에서 동시에 실행
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let pool = pool.clone();
                    tokio::spawn(async move { find_or_create_day(&pool, date).await })
                })
                .collect();

            let mut ids = Vec::new();
            for handle in handles {
                match handle.await.expect("task panicked") {
                    Ok(day) => {
                        assert_eq!(day.date, date);
                        ids.push(day.id);
                    }
                    Err(AppError::Conflict(_)) => {}
                    Err(e) => panic!("unexpected error on {date}: {e}"),
                }
            }

            // 성공한 호출은 모두 같은 레코드를 돌려받습니다
            ids.dedup();
            assert!(ids.len() <= 1, "several day ids for {date}: {ids:?}");
            assert_eq!(days_on(&pool, date).await, 1);
        }
    }

    /// 같은 (날짜, 습관)을 여러 요청이 동시에 토글해도 중복 행이 생기지 않고,
    /// 각 결과는 실제 상태 전환이거나 Conflict 중 하나입니다.
    ///
    /// 성공한 토글은 커밋 순서대로 완료/해제가 번갈아 일어나므로
    /// (완료 수 - 해제 수)는 0 또는 1이고, 그 값이 최종 상태와 일치해야 합니다.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_toggles_flip_or_conflict() {
        let pool = shared_test_pool(8).await;
        let habit = setup_habit(&pool, "Meditate", &[0, 1, 2, 3, 4, 5, 6]).await;
        let first = ymd(2026, 11, 1);

        for offset in 0..30 {
            let date = first + chrono::Days::new(offset);

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pool = pool.clone();
                    let habit_id = habit.id.clone();
                    tokio::spawn(async move { toggle_completion(&pool, date, &habit_id).await })
                })
                .collect();

            let (mut completed, mut uncompleted) = (0, 0);
            for handle in handles {
                match handle.await.expect("task panicked") {
                    Ok(ToggleResult { completed: true }) => completed += 1,
                    Ok(ToggleResult { completed: false }) => uncompleted += 1,
                    Err(AppError::Conflict(_)) => {}
                    Err(e) => panic!("unexpected error on {date}: {e}"),
                }
            }

            assert_eq!(days_on(&pool, date).await, 1);

            let done = completed_habit_ids(&pool, date).await.unwrap();
            assert!(done.len() <= 1);
            let net = completed - uncompleted;
            assert!(net == 0 || net == 1, "{completed} completed vs {uncompleted} uncompleted on {date}");
            assert_eq!(done.len(), net as usize, "final state disagrees with results on {date}");
        }
    }
}
