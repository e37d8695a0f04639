use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 타공 밴드 상·하단에 각각 남기는 무타공 여유(mm).
pub const BORDER_MM: f64 = 20.0;
/// 흡입 기준 안전 풍속 [m/s]. 권장 높이 계산에도 사용한다.
pub const SAFE_INTAKE_VELOCITY_MS: f64 = 2.4;
/// 토출 기준 최대 풍속 [m/s].
pub const MAX_EXHAUST_VELOCITY_MS: f64 = 3.6;
/// 1 m² = 1,000,000 mm²
pub const MM2_PER_M2: f64 = 1_000_000.0;
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// 계산기가 사용하는 조정 가능한 한계값 묶음.
///
/// 기본값은 위 상수와 같고, config.toml의 `[limits]` 테이블로 덮어쓸 수 있다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingLimits {
    /// 상·하단 여유 [mm] (합계는 2배)
    pub border_mm: f64,
    pub safe_intake_velocity_ms: f64,
    pub max_exhaust_velocity_ms: f64,
}

impl Default for SizingLimits {
    fn default() -> Self {
        Self {
            border_mm: BORDER_MM,
            safe_intake_velocity_ms: SAFE_INTAKE_VELOCITY_MS,
            max_exhaust_velocity_ms: MAX_EXHAUST_VELOCITY_MS,
        }
    }
}

/// 한계값 설정 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimitsError {
    #[error("여유 치수는 0 이상이어야 합니다: {0}")]
    NegativeBorder(f64),
    #[error("안전 흡입 풍속은 0보다 커야 합니다: {0}")]
    NonPositiveSafeVelocity(f64),
    #[error("최대 토출 풍속({exhaust})이 안전 흡입 풍속({intake})보다 작습니다.")]
    ExhaustBelowIntake { intake: f64, exhaust: f64 },
}

impl SizingLimits {
    /// 전체 여유 높이 (상단 + 하단).
    pub fn total_border_mm(&self) -> f64 {
        2.0 * self.border_mm
    }

    /// 설정 파일에서 읽은 값이 계산에 쓸 수 있는지 확인한다.
    pub fn validate(&self) -> Result<(), LimitsError> {
        if !self.border_mm.is_finite() || self.border_mm < 0.0 {
            return Err(LimitsError::NegativeBorder(self.border_mm));
        }
        if !self.safe_intake_velocity_ms.is_finite() || self.safe_intake_velocity_ms <= 0.0 {
            return Err(LimitsError::NonPositiveSafeVelocity(
                self.safe_intake_velocity_ms,
            ));
        }
        if !self.max_exhaust_velocity_ms.is_finite()
            || self.max_exhaust_velocity_ms < self.safe_intake_velocity_ms
        {
            return Err(LimitsError::ExhaustBelowIntake {
                intake: self.safe_intake_velocity_ms,
                exhaust: self.max_exhaust_velocity_ms,
            });
        }
        Ok(())
    }
}
