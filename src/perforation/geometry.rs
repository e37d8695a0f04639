use serde::{Deserialize, Serialize};

use super::limits::MM2_PER_M2;
use super::sizing::SizingError;

/// 벽체의 직사각형 개구부.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    /// 개구부 길이 A [mm]
    pub length_mm: f64,
    /// 개구부 높이 B [mm]
    pub height_mm: f64,
}

impl OpeningSpec {
    pub fn new(length_mm: f64, height_mm: f64) -> Self {
        Self {
            length_mm,
            height_mm,
        }
    }

    pub fn area_mm2(&self) -> f64 {
        self.length_mm * self.height_mm
    }

    pub fn area_m2(&self) -> f64 {
        self.area_mm2() / MM2_PER_M2
    }

    /// 타공 밴드가 네 변 전체를 두르므로 밴드 길이는 개구부 둘레와 같다.
    pub fn perimeter_mm(&self) -> f64 {
        2.0 * (self.length_mm + self.height_mm)
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        positive_opening("length_mm", self.length_mm)?;
        positive_opening("height_mm", self.height_mm)?;
        positive_opening("area_m2", self.area_m2())?;
        positive_opening("perimeter_mm", self.perimeter_mm())
    }
}

/// 구멍 하나와 주변 간격으로 이루어진 반복 단위.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerforationPattern {
    pub hole_width_mm: f64,
    pub hole_height_mm: f64,
    /// 구멍 사이 간격(타공 피치 - 구멍 크기) [mm]
    pub gap_mm: f64,
}

impl PerforationPattern {
    pub fn new(hole_width_mm: f64, hole_height_mm: f64, gap_mm: f64) -> Self {
        Self {
            hole_width_mm,
            hole_height_mm,
            gap_mm,
        }
    }

    pub fn unit_cell_width_mm(&self) -> f64 {
        self.hole_width_mm + self.gap_mm
    }

    pub fn unit_cell_height_mm(&self) -> f64 {
        self.hole_height_mm + self.gap_mm
    }

    pub fn unit_cell_area_mm2(&self) -> f64 {
        self.unit_cell_width_mm() * self.unit_cell_height_mm()
    }

    pub fn hole_area_mm2(&self) -> f64 {
        self.hole_width_mm * self.hole_height_mm
    }

    /// 패턴 면적 중 실제로 뚫린 비율. 단위 셀 면적이 0이면 0을 돌려준다.
    pub fn net_open_fraction(&self) -> f64 {
        let cell = self.unit_cell_area_mm2();
        if cell > 0.0 {
            self.hole_area_mm2() / cell
        } else {
            0.0
        }
    }

    /// 구멍·간격·단위 셀 치수를 확인한 뒤 순개구율이 양수인지 검사한다.
    pub fn validate(&self) -> Result<(), SizingError> {
        positive_pattern("hole_width_mm", self.hole_width_mm)?;
        positive_pattern("hole_height_mm", self.hole_height_mm)?;
        if !self.gap_mm.is_finite() || self.gap_mm < 0.0 {
            return Err(SizingError::InvalidPattern {
                field: "gap_mm",
                value: self.gap_mm,
            });
        }
        positive_pattern("unit_cell_width_mm", self.unit_cell_width_mm())?;
        positive_pattern("unit_cell_height_mm", self.unit_cell_height_mm())?;

        // 구멍이 아주 작으면 곱이 0으로 언더플로할 수 있다.
        let fraction = self.net_open_fraction();
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(SizingError::DegeneratePattern {
                net_open_fraction: fraction,
            });
        }
        Ok(())
    }
}

/// 목표 개구율과 풍량.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirflowSpec {
    /// 개구부 면적 대비 확보해야 할 순개구 면적 비율 (1.0 = 100%)
    pub desired_open_fraction: f64,
    /// 풍량 [m³/h]
    pub flow_rate_m3_per_hour: f64,
}

impl AirflowSpec {
    pub fn new(desired_open_fraction: f64, flow_rate_m3_per_hour: f64) -> Self {
        Self {
            desired_open_fraction,
            flow_rate_m3_per_hour,
        }
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        if !self.desired_open_fraction.is_finite() || self.desired_open_fraction <= 0.0 {
            return Err(SizingError::InvalidAirflow {
                field: "desired_open_fraction",
                value: self.desired_open_fraction,
            });
        }
        if !self.flow_rate_m3_per_hour.is_finite() || self.flow_rate_m3_per_hour < 0.0 {
            return Err(SizingError::InvalidAirflow {
                field: "flow_rate_m3_per_hour",
                value: self.flow_rate_m3_per_hour,
            });
        }
        Ok(())
    }
}

/// 한 번의 계산에 필요한 입력 묶음. CLI와 보고서가 함께 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingRequest {
    pub opening: OpeningSpec,
    pub pattern: PerforationPattern,
    pub airflow: AirflowSpec,
}

fn positive_opening(field: &'static str, value: f64) -> Result<(), SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidOpening { field, value })
    }
}

fn positive_pattern(field: &'static str, value: f64) -> Result<(), SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidPattern { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_derivations() {
        let p = PerforationPattern::new(20.0, 20.0, 5.0);
        assert_eq!(p.unit_cell_width_mm(), 25.0);
        assert_eq!(p.unit_cell_height_mm(), 25.0);
        assert_eq!(p.unit_cell_area_mm2(), 625.0);
        assert_eq!(p.hole_area_mm2(), 400.0);
        assert!((p.net_open_fraction() - 0.64).abs() < 1e-12);
    }

    #[test]
    fn zero_gap_is_fully_open() {
        let p = PerforationPattern::new(10.0, 4.0, 0.0);
        assert!(p.validate().is_ok());
        assert_eq!(p.net_open_fraction(), 1.0);
    }

    #[test]
    fn opening_derivations() {
        let o = OpeningSpec::new(1500.0, 1000.0);
        assert_eq!(o.area_mm2(), 1_500_000.0);
        assert!((o.area_m2() - 1.5).abs() < 1e-12);
        assert_eq!(o.perimeter_mm(), 5000.0);
    }

    #[test]
    fn validation_names_the_offending_field() {
        let err = OpeningSpec::new(1500.0, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            SizingError::InvalidOpening {
                field: "height_mm",
                value: 0.0
            }
        );

        let err = PerforationPattern::new(20.0, 20.0, -1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            SizingError::InvalidPattern { field: "gap_mm", .. }
        ));

        let err = AirflowSpec::new(1.0, f64::NAN).validate().unwrap_err();
        assert!(matches!(
            err,
            SizingError::InvalidAirflow {
                field: "flow_rate_m3_per_hour",
                ..
            }
        ));
    }

    #[test]
    fn underflowing_hole_area_is_degenerate() {
        let p = PerforationPattern::new(1e-200, 1e-200, 1.0);
        assert!(matches!(
            p.validate(),
            Err(SizingError::DegeneratePattern { .. })
        ));
    }
}
