//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `habit`: 습관(Habit)과 생성 요청
//! - `day`: 날짜(Day), 완료 기록(Completion), 일별 조회/요약 응답
//!
//! 예: `crate::models::habit::Habit` 대신 `crate::models::Habit`로 접근 가능

pub mod day;
pub mod habit;

pub use day::*;
pub use habit::*;
