//! # 습관 모델 정의
//!
//! 습관은 생성일부터 정해진 요일마다 반복되는 할 일입니다.
//!
//! ## 구조체 역할
//! - `Habit`: 요일 집합까지 포함한 완전한 습관 (응답용)
//! - `HabitRow`: `habits` 테이블 조회 결과 한 행 (요일은 GROUP_CONCAT 문자열)
//! - `CreateHabitRequest`: 새 습관 생성 시 클라이언트가 보내는 JSON 본문

use crate::error::AppError;                 // 변환 실패 시 에러 타입
use crate::services::{dates, recurrence};   // 요일 계산, 요일 값 검증
use chrono::NaiveDate;                      // 시각 없는 달력 날짜
use serde::{Deserialize, Serialize};        // JSON 직렬화/역직렬화
use std::collections::BTreeSet;             // 중복 없는 정렬된 요일 집합

// #[derive(...)]: 컴파일러가 트레이트 구현을 자동 생성합니다
// - Clone: .clone()으로 복사 가능
// - PartialEq, Eq: == 비교 가능 (테스트의 assert_eq!에 필요)
// - Serialize, Deserialize: serde를 통한 JSON 변환

/// 습관 엔티티
///
/// `week_days`는 `BTreeSet`이므로 중복이 없고 항상 오름차순입니다.
/// JSON으로는 `[1, 3, 5]` 같은 배열로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// 습관 고유 식별자 (UUIDv7)
    pub id: String,
    /// 습관 이름 (예: "독서")
    pub title: String,
    /// 생성일. 시각 없이 날짜만 가지며 생성 후 바뀌지 않습니다.
    pub created_at: NaiveDate,
    /// 반복 요일 (0 = 일요일 … 6 = 토요일)
    pub week_days: BTreeSet<u8>,
}

impl Habit {
    /// 이 습관이 `date`에 수행 대상(possible)인지 판단합니다.
    ///
    /// `date >= created_at` 이고 `date`의 요일이 `week_days`에 포함될 때만 참입니다.
    /// 생성 당일도 포함됩니다.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.created_at <= date && self.week_days.contains(&dates::weekday_of(date))
    }
}

/// `habits` 테이블 조회 결과 한 행
///
/// 요일은 `GROUP_CONCAT(week_day)`로 "1,3,5" 형태의 문자열로 함께 가져옵니다.
/// 요일이 하나도 없으면 NULL이므로 Option입니다.
#[derive(Debug, sqlx::FromRow)]
pub struct HabitRow {
    pub id: String,
    pub title: String,
    pub created_at: NaiveDate,
    pub week_days: Option<String>,
}

impl TryFrom<HabitRow> for Habit {
    type Error = AppError;

    /// 저장된 요일 문자열을 파싱합니다. 범위를 벗어난 값은 `InvalidInput`입니다.
    fn try_from(row: HabitRow) -> Result<Self, Self::Error> {
        // "1,3,5" → [1, 3, 5]
        // as_deref(): Option<String> → Option<&str>. 요일이 없으면(NULL) 빈 문자열로 취급
        let raw: Vec<i64> = row
            .week_days
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.trim().parse::<i64>().map_err(|_| {
                    AppError::InvalidInput(format!("Malformed week day {s:?} for habit {}", row.id))
                })
            })
            .collect::<Result<_, _>>()?;

        // week_days를 먼저 계산합니다 (아래 필드들이 row를 이동(move)하기 전에 row.id를 쓸 수 있도록)
        Ok(Habit {
            week_days: recurrence::validate_week_days(&raw)?,
            id: row.id,
            title: row.title,
            created_at: row.created_at,
        })
    }
}

/// 습관 생성 요청 — `POST /api/v1/habits`의 요청 본문
///
/// 요일은 범위 검증을 직접 하기 위해 `i64`로 받습니다.
/// (u8로 받으면 7이나 -1 같은 값이 역직렬화 단계에서 일반적인 422 에러가 됩니다)
#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    /// 습관 이름 (공백만 있으면 안 됨)
    pub title: String,
    /// 반복 요일 목록. `weekDays`라는 이름도 받습니다.
    #[serde(alias = "weekDays")]
    pub week_days: Vec<i64>,
}
