//! # 비즈니스 로직 모듈
//!
//! DB에 의존하지 않는 순수 로직을 모아둔 모듈입니다.
//! - `dates`: 날짜 정규화, 요일 계산
//! - `recurrence`: 요일 집합 검증, 습관의 수행 대상 판정

pub mod dates;
pub mod recurrence;
