//! # 날짜 정규화(DateNormalizer) 서비스
//!
//! 모든 습관 계산은 "하루" 단위로 이루어집니다.
//! 이 모듈은 시각 정보를 잘라내고 달력 날짜(`NaiveDate`)만 남기는 함수들을 제공합니다.
//!
//! - `normalize()`: 임의의 날짜-시각 값을 그날의 날짜로 변환
//! - `parse_date()`: 쿼리 문자열 등 외부 입력을 날짜로 해석
//! - `weekday_of()`: 요일 번호 (0 = 일요일 … 6 = 토요일)
//! - `today()`: 현재 날짜
//!
//! 시간대(timezone) 변환은 하지 않습니다. 입력에 오프셋이 붙어 있어도
//! 적힌 그대로의 달력 날짜를 사용합니다.

use crate::error::AppError;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};

/// 날짜-시각 값에서 시/분/초를 버리고 날짜만 남깁니다.
///
/// `DateTime<Tz>`(오프셋 포함), `NaiveDateTime`, `NaiveDate` 모두 받습니다.
pub fn normalize<T: Normalize>(timestamp: T) -> NaiveDate {
    timestamp.to_day()
}

/// 하루 단위로 정규화할 수 있는 타입
pub trait Normalize {
    fn to_day(self) -> NaiveDate;
}

impl Normalize for NaiveDate {
    fn to_day(self) -> NaiveDate {
        self
    }
}

impl Normalize for NaiveDateTime {
    fn to_day(self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> Normalize for DateTime<Tz> {
    // 적힌 오프셋 기준의 날짜 (UTC로 바꾸지 않음)
    fn to_day(self) -> NaiveDate {
        self.naive_local().date()
    }
}

/// 저장 가능한 연도 범위
///
/// 날짜는 SQLite에 'YYYY-MM-DD' 문자열로 저장되고, 문자열 비교와
/// `strftime('%w', ...)`로 계산됩니다. 둘 다 네 자리 연도에서만 올바르게 동작합니다.
/// (`+12345-01-01`이나 `-0001-06-01`에 대해 strftime은 NULL을 돌려줍니다)
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// 외부에서 들어온 날짜 문자열을 정규화된 날짜로 해석합니다.
///
/// 허용하는 형식:
/// - `2026-10-16`
/// - `2026-10-16T08:30:00Z`, `2026-10-16T08:30:00+09:00` (RFC 3339)
/// - `2026-10-16T08:30:00`, `2026-10-16 08:30:00.123` (시간대 없는 날짜-시각)
///
/// 그 외의 값, 그리고 연도가 `YEAR_RANGE`를 벗어난 날짜는 `AppError::InvalidInput`입니다.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    // 앞뒤 공백은 무시합니다 (쿼리 문자열에 섞여 들어오는 경우)
    let raw = raw.trim();

    // 형식을 하나씩 시도하고, 처음 성공한 결과를 사용합니다.
    // .ok(): Result를 Option으로 바꿉니다. 실패한 형식의 에러 내용은 필요 없습니다.
    // .or_else(): 앞의 Option이 None일 때만 다음 시도를 실행합니다 (지연 평가)
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(normalize))
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .into_iter()
                // find_map: 처음으로 Some을 돌려주는 형식에서 멈춥니다
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(normalize)
        });

    match parsed {
        // 매치 가드(if ...): 패턴이 맞고 조건까지 참일 때만 이 갈래로 들어갑니다
        Some(date) if YEAR_RANGE.contains(&date.year()) => Ok(date),
        Some(date) => Err(AppError::InvalidInput(format!(
            "Year {} is out of range for {raw:?}",
            date.year()
        ))),
        None => Err(AppError::InvalidInput(format!("Invalid date: {raw:?}"))),
    }
}

/// 요일 번호를 반환합니다. 0 = 일요일, 6 = 토요일.
///
/// `weekDays` 값을 읽고 쓰는 모든 곳(요청 검증, 메모리 매칭, SQL의
/// `strftime('%w', ...)`)이 이 기준을 공유합니다.
pub fn weekday_of(date: NaiveDate) -> u8 {
    // num_days_from_sunday()는 0..=6 범위이므로 u8로 안전하게 변환됩니다
    date.weekday().num_days_from_sunday() as u8
}

/// 현재 날짜 (서버 로컬 달력 기준)
pub fn today() -> NaiveDate {
    normalize(Local::now())
}
