//! # 요약(Summary) 집계 쿼리 모듈
//!
//! 날짜 레코드마다 "완료한 습관 수"와 "수행 대상 습관 수"를 한 번의 쿼리로 계산합니다.
//!
//! - `completed`: 그 날짜의 `day_habits` 행 수
//! - `possible`: 그 날짜에 수행 대상인 습관 수 (`habits::due_on` 조건식 재사용)
//!
//! 요약은 저장하지 않고 조회할 때마다 현재 습관 데이터로 다시 계산합니다.

use crate::db::habits::due_on;   // "수행 대상" SQL 조건식 (일 보기 쿼리와 공유)
use crate::error::AppError;       // 에러 타입
use crate::models::SummaryRow;    // 결과 행: (id, date, completed, possible)
use sqlx::SqlitePool;             // SQLite 연결 풀

/// 전체 기간의 날짜별 요약을 날짜 오름차순으로 반환합니다.
///
/// 두 개의 상관 서브쿼리(correlated subquery)가 바깥 `days d`의 각 행마다 실행됩니다.
/// ```sql
/// days d ──┬── COUNT(day_habits WHERE day_id = d.id)        → completed
///          └── COUNT(habits h WHERE due_on(d.date))          → possible
/// ```
pub async fn summary(pool: &SqlitePool) -> Result<Vec<SummaryRow>, AppError> {
    // ── 1단계: 쿼리 조립 ──
    // due_on("d.date"): 플레이스홀더 대신 바깥 행의 날짜 컬럼을 조건식에 끼워 넣습니다.
    // 바인딩할 값이 없으므로 사용자 입력이 SQL에 섞일 일도 없습니다.
    let sql = format!(
        r#"
        SELECT
            d.id,
            d.date,
            (SELECT COUNT(*) FROM day_habits dh WHERE dh.day_id = d.id) AS completed,
            (SELECT COUNT(*) FROM habits h WHERE {}) AS possible
        FROM days d
        ORDER BY d.date
        "#,
        due_on("d.date")
    );
    // ↑ SQL 설명:
    // - completed: 그 날짜에 기록된 완료 행 수 (수행 대상이 아니었던 습관도 포함)
    // - possible: 그 날짜 이전에 생성되었고 그 요일에 반복되는 습관 수
    // - COUNT(*)는 항상 정수이므로 i64로 바로 매핑됩니다
    // - 완료 기록이 한 번도 없었던 날짜는 days 행이 없으므로 결과에 나오지 않습니다

    // ── 2단계: 실행 ──
    // 날짜 수에 관계없이 DB 왕복은 이 한 번뿐입니다
    let rows = sqlx::query_as::<_, SummaryRow>(&sql).fetch_all(pool).await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_habit, find_or_create_day, list_possible_habits, test_pool, toggle_completion};
    use crate::models::{CreateHabitRequest, Habit};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn habit(pool: &SqlitePool, title: &str, week_days: &[i64], created_at: NaiveDate) -> Habit {
        let req = CreateHabitRequest {
            title: title.to_string(),
            week_days: week_days.to_vec(),
        };
        create_habit(pool, &req, created_at).await.expect("Failed to create habit")
    }

    #[tokio::test]
    async fn test_summary_empty_without_days() {
        let pool = test_pool().await;
        habit(&pool, "Read", &[1, 3, 5], ymd(2026, 10, 1)).await;

        assert!(summary(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_two_due_one_completed() {
        let pool = test_pool().await;
        let friday = ymd(2026, 10, 16);
        let read = habit(&pool, "Read", &[1, 3, 5], ymd(2026, 10, 1)).await;
        habit(&pool, "Walk", &[5], ymd(2026, 10, 1)).await;

        toggle_completion(&pool, friday, &read.id).await.unwrap();

        let rows = summary(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, friday);
        assert_eq!(rows[0].possible, 2);
        assert_eq!(rows[0].completed, 1);
    }

    #[tokio::test]
    async fn test_summary_ordered_by_date_and_counts_per_day() {
        let pool = test_pool().await;
        let read = habit(&pool, "Read", &[1, 3, 5], ymd(2026, 10, 1)).await;
        let gym = habit(&pool, "Gym", &[1, 5], ymd(2026, 10, 14)).await;

        // 생성 전 월요일, 생성 후 금요일, 다음 월요일 (입력 순서는 뒤섞음)
        toggle_completion(&pool, ymd(2026, 10, 19), &read.id).await.unwrap();
        toggle_completion(&pool, ymd(2026, 10, 19), &gym.id).await.unwrap();
        toggle_completion(&pool, ymd(2026, 10, 12), &read.id).await.unwrap();
        toggle_completion(&pool, ymd(2026, 10, 16), &gym.id).await.unwrap();

        let rows = summary(&pool).await.unwrap();
        let got: Vec<_> = rows.iter().map(|r| (r.date, r.completed, r.possible)).collect();
        assert_eq!(
            got,
            vec![
                (ymd(2026, 10, 12), 1, 1), // Gym은 아직 생성 전
                (ymd(2026, 10, 16), 1, 2),
                (ymd(2026, 10, 19), 2, 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_possible_matches_single_day_query() {
        let pool = test_pool().await;
        habit(&pool, "A", &[0, 6], ymd(2026, 10, 3)).await;
        habit(&pool, "B", &[1, 2, 3], ymd(2026, 10, 6)).await;
        habit(&pool, "C", &[0, 1, 2, 3, 4, 5, 6], ymd(2026, 10, 10)).await;

        let mut date = ymd(2026, 10, 1);
        while date <= ymd(2026, 10, 20) {
            find_or_create_day(&pool, date).await.unwrap();
            date = date.succ_opt().unwrap();
        }

        for row in summary(&pool).await.unwrap() {
            let expected = list_possible_habits(&pool, row.date).await.unwrap().len() as i64;
            assert_eq!(row.possible, expected, "mismatch on {}", row.date);
            assert_eq!(row.completed, 0);
        }
    }

    #[tokio::test]
    async fn test_completed_can_exceed_possible() {
        let pool = test_pool().await;
        let sunday = ymd(2026, 10, 18);
        let weekday_only = habit(&pool, "Commute reading", &[1, 2, 3, 4, 5], ymd(2026, 10, 1)).await;

        // 수행 대상이 아닌 날에 토글해도 완료로 집계됩니다
        toggle_completion(&pool, sunday, &weekday_only.id).await.unwrap();

        let rows = summary(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].completed, 1);
        assert_eq!(rows[0].possible, 0);
    }

    #[tokio::test]
    async fn test_uncompleted_day_still_reported() {
        let pool = test_pool().await;
        let wednesday = ymd(2026, 10, 14);
        let read = habit(&pool, "Read", &[3], ymd(2026, 10, 1)).await;

        toggle_completion(&pool, wednesday, &read.id).await.unwrap();
        toggle_completion(&pool, wednesday, &read.id).await.unwrap();

        let rows = summary(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].completed, rows[0].possible), (0, 1));

        // 반복 호출해도 같은 결과
        assert_eq!(summary(&pool).await.unwrap(), rows);
    }
}
