//! # 반복 규칙(Recurrence) 서비스
//!
//! 습관이 특정 날짜에 수행 대상인지 판단하는 규칙을 다룹니다.
//!
//! 규칙: `created_at <= date` 이고 `weekday_of(date) ∈ week_days`
//!
//! 같은 규칙이 SQL로도 표현됩니다 (`db::habits::due_on`).
//! 하루 조회와 전체 요약 쿼리는 SQL 쪽을, 이미 메모리에 있는 습관 목록은
//! 이 모듈의 `possible_habits()`를 사용합니다.

use crate::error::AppError;       // 범위를 벗어난 요일 → InvalidInput
use crate::models::Habit;         // 습관 엔티티 (is_due_on 판단 포함)
use chrono::NaiveDate;            // 시각 없는 달력 날짜
use std::collections::BTreeSet;   // 정렬된 집합: 중복 제거 + 오름차순 보장

/// 요일 번호의 최댓값 (토요일)
pub const MAX_WEEK_DAY: i64 = 6;

/// 요일 목록을 검증하고 중복 없는 집합으로 만듭니다.
///
/// `[0, 6]` 범위를 벗어난 값이 하나라도 있으면 `InvalidInput`입니다.
/// 빈 목록은 허용합니다 (어느 날에도 수행 대상이 아닌 습관이 됩니다).
pub fn validate_week_days(week_days: &[i64]) -> Result<BTreeSet<u8>, AppError> {
    week_days
        .iter()
        // |&day|: 참조(&i64)를 패턴으로 풀어 i64 값으로 받습니다
        .map(|&day| {
            if (0..=MAX_WEEK_DAY).contains(&day) {
                Ok(day as u8)
            } else {
                Err(AppError::InvalidInput(format!(
                    "Week day must be between 0 and {MAX_WEEK_DAY}, got {day}"
                )))
            }
        })
        // Result들을 collect하면 첫 에러에서 멈추고, 모두 Ok이면 BTreeSet이 됩니다
        .collect()
}

/// 습관 목록 중 `date`에 수행 대상인 습관만 골라냅니다.
///
/// 결과 순서는 입력 순서를 그대로 따릅니다.
/// DB에서 가져온 목록은 생성 순서로 정렬되어 있으므로 결과도 생성 순서입니다.
pub fn possible_habits(date: NaiveDate, catalog: &[Habit]) -> Vec<Habit> {
    catalog
        .iter()
        .filter(|habit| habit.is_due_on(date))
        // .cloned(): &Habit → Habit (입력 목록은 빌린 것이므로 복사본을 만듭니다)
        .cloned()
        .collect()
}
