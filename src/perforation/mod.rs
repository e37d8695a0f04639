//! 개구부 둘레 타공판 사이징 계산 모듈 모음.
//! 형상 유도, 필요 타공 높이와 행 수 이산화, 풍속과 권장 높이 산출로 구성한다.

pub mod geometry;
pub mod limits;
pub mod report;
pub mod sizing;

pub use geometry::{AirflowSpec, OpeningSpec, PerforationPattern, SizingRequest};
pub use limits::*;
pub use sizing::*;
