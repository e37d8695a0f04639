use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{AirflowSpec, OpeningSpec, PerforationPattern, SizingRequest};
use super::limits::{LimitsError, SizingLimits, MM2_PER_M2, SECONDS_PER_HOUR};

/// 타공 사이징 입력 오류. 어떤 입력이 잘못되었는지 필드명과 값을 함께 담는다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// 개구부 치수/면적/둘레가 0 이하
    #[error("개구부 입력 오류: {field} = {value} (0보다 커야 합니다)")]
    InvalidOpening { field: &'static str, value: f64 },
    /// 구멍 크기, 간격 또는 단위 셀 치수가 잘못됨
    #[error("타공 패턴 입력 오류: {field} = {value}")]
    InvalidPattern { field: &'static str, value: f64 },
    /// 순개구율이 0 이하
    #[error("타공 패턴의 순개구율이 0 이하입니다: {net_open_fraction}")]
    DegeneratePattern { net_open_fraction: f64 },
    /// 목표 개구율이 0 이하이거나 풍량이 음수
    #[error("풍량/개구율 입력 오류: {field} = {value}")]
    InvalidAirflow { field: &'static str, value: f64 },
    /// 입력은 유효하지만 밴드 높이가 유한하지 않거나 행 수가 표현 범위를 넘음
    #[error("밴드 높이를 계산할 수 없습니다: {field} = {value}")]
    HeightOutOfRange { field: &'static str, value: f64 },
}

/// 행 수로 표현할 수 있는 상한 (`u64::MAX`는 f64로 2^64가 된다).
const MAX_ROWS: f64 = u64::MAX as f64;

/// 타공 밴드를 행 단위로 이산화한 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandSizing {
    /// 이산화 전 필요 높이 [mm]
    pub raw_height_mm: f64,
    /// 상·하단 여유를 뺀 높이 [mm]
    pub usable_height_mm: f64,
    pub row_count: u64,
    /// 실제 제작 높이 [mm]. 행이 없으면 여유와 관계없이 0.
    pub adjusted_height_mm: f64,
}

impl BandSizing {
    /// 필요 높이에서 여유를 빼고, 남은 높이를 단위 셀 높이로 올림해 행 수를 정한다.
    /// 개구 면적이 부족해지지 않도록 항상 올림한다.
    ///
    /// 필요 높이가 유한하지 않거나 행 수가 `u64`를 넘으면 `None`.
    pub fn discretize(
        raw_height_mm: f64,
        unit_cell_height_mm: f64,
        limits: &SizingLimits,
    ) -> Option<Self> {
        if !raw_height_mm.is_finite() {
            return None;
        }
        let total_border = limits.total_border_mm();
        let usable_height_mm = (raw_height_mm - total_border).max(0.0);
        let row_count = if usable_height_mm > 0.0 {
            let rows = (usable_height_mm / unit_cell_height_mm).ceil();
            if !rows.is_finite() || rows >= MAX_ROWS {
                return None;
            }
            rows as u64
        } else {
            0
        };
        let adjusted_height_mm = if row_count > 0 {
            row_count as f64 * unit_cell_height_mm + total_border
        } else {
            0.0
        };
        Some(Self {
            raw_height_mm,
            usable_height_mm,
            row_count,
            adjusted_height_mm,
        })
    }
}

/// 타공 통과 풍속 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityClass {
    /// 안전 흡입 풍속 이하
    Ok,
    /// 흡입 기준 초과, 토출 기준 이하 (권고)
    IntakeWarning,
    /// 토출 기준 초과 (치명적)
    ExhaustError,
}

impl VelocityClass {
    /// 두 경계값과 비교한다. 경계값 자체는 낮은 쪽 등급에 포함된다.
    pub fn classify(velocity_ms: f64, limits: &SizingLimits) -> Self {
        if velocity_ms > limits.max_exhaust_velocity_ms {
            VelocityClass::ExhaustError
        } else if velocity_ms > limits.safe_intake_velocity_ms {
            VelocityClass::IntakeWarning
        } else {
            VelocityClass::Ok
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, VelocityClass::ExhaustError)
    }

    pub fn is_advisory(&self) -> bool {
        matches!(self, VelocityClass::IntakeWarning)
    }
}

/// 사이징 계산 결과 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// 적용된 상·하단 여유 [mm]
    pub border_mm: f64,
    /// 권장 높이 계산에 쓴 안전 풍속 [m/s]
    pub safe_intake_velocity_ms: f64,
    pub max_exhaust_velocity_ms: f64,

    pub net_open_fraction: f64,
    pub opening_area_mm2: f64,
    pub opening_area_m2: f64,
    pub perimeter_mm: f64,

    pub desired_net_area_mm2: f64,
    pub desired_net_area_m2: f64,
    pub required_perforated_area_mm2: f64,
    pub required_band_height_mm: f64,
    pub usable_height_mm: f64,
    pub row_count: u64,
    pub adjusted_band_height_mm: f64,

    pub actual_perforated_area_mm2: f64,
    pub actual_perforated_area_m2: f64,
    pub actual_net_area_mm2: f64,
    pub actual_net_area_m2: f64,

    pub flow_m3_per_s: f64,
    pub velocity_in_opening_ms: f64,
    pub velocity_through_perforation_ms: f64,

    pub required_net_area_m2_at_safe_v: f64,
    pub required_net_area_mm2_at_safe_v: f64,
    pub required_perforated_area_mm2_at_safe_v: f64,
    pub recommended_raw_height_mm: f64,
    pub recommended_usable_height_mm: f64,
    pub recommended_row_count: u64,
    pub recommended_band_height_mm: f64,
    pub recommended_open_fraction: f64,

    pub velocity_class: VelocityClass,
}

/// 한계값을 소유하는 타공 사이징 계산기. 상태가 없으므로 여러 호출자가 공유해도 된다.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerforationSizingCalculator {
    limits: SizingLimits,
}

impl PerforationSizingCalculator {
    /// 한계값을 검증한 뒤 계산기를 만든다. 잘못된 한계값으로는 계산기를 만들 수 없다.
    pub fn new(limits: SizingLimits) -> Result<Self, LimitsError> {
        limits.validate()?;
        Ok(Self { limits })
    }

    pub fn compute_request(&self, request: &SizingRequest) -> Result<SizingResult, SizingError> {
        self.compute_sizing(&request.opening, &request.pattern, &request.airflow)
    }

    /// 개구부, 타공 패턴, 풍량으로부터 타공 밴드 높이와 풍속을 계산한다.
    ///
    /// 모든 입력 검증은 파생값을 만들기 전에 끝난다. 풍량 0과 행 수 0은 오류가 아니라
    /// 0으로 채워진 결과로 돌려준다.
    pub fn compute_sizing(
        &self,
        opening: &OpeningSpec,
        pattern: &PerforationPattern,
        airflow: &AirflowSpec,
    ) -> Result<SizingResult, SizingError> {
        pattern.validate()?;
        opening.validate()?;
        airflow.validate()?;

        let limits = &self.limits;
        let net_open_fraction = pattern.net_open_fraction();
        let cell_height = pattern.unit_cell_height_mm();
        let opening_area_mm2 = opening.area_mm2();
        let opening_area_m2 = opening.area_m2();
        let perimeter_mm = opening.perimeter_mm();

        // 필요 개구 면적 → 필요 타공 면적 → 둘레 방향으로 펼친 밴드 높이
        let desired_net_area_mm2 = opening_area_mm2 * airflow.desired_open_fraction;
        let required_perforated_area_mm2 = desired_net_area_mm2 / net_open_fraction;
        let required_band_height_mm = required_perforated_area_mm2 / perimeter_mm;
        let band = discretize_checked(
            "required_band_height_mm",
            required_band_height_mm,
            cell_height,
            limits,
        )?;

        let actual_perforated_area_mm2 = perimeter_mm * band.adjusted_height_mm;
        let actual_net_area_mm2 = actual_perforated_area_mm2 * net_open_fraction;
        let actual_net_area_m2 = actual_net_area_mm2 / MM2_PER_M2;

        let flow_m3_per_s = if airflow.flow_rate_m3_per_hour > 0.0 {
            airflow.flow_rate_m3_per_hour / SECONDS_PER_HOUR
        } else {
            0.0
        };
        let velocity_in_opening_ms = ratio_or_zero(flow_m3_per_s, opening_area_m2);
        let velocity_through_perforation_ms = ratio_or_zero(flow_m3_per_s, actual_net_area_m2);

        // 안전 풍속에서 필요한 밴드 높이
        let required_net_area_m2_at_safe_v =
            ratio_or_zero(flow_m3_per_s, limits.safe_intake_velocity_ms);
        let required_net_area_mm2_at_safe_v = required_net_area_m2_at_safe_v * MM2_PER_M2;
        let required_perforated_area_mm2_at_safe_v =
            required_net_area_mm2_at_safe_v / net_open_fraction;
        let recommended = discretize_checked(
            "recommended_raw_height_mm",
            required_perforated_area_mm2_at_safe_v / perimeter_mm,
            cell_height,
            limits,
        )?;
        let recommended_open_fraction =
            ratio_or_zero(required_net_area_m2_at_safe_v, opening_area_m2);

        let velocity_class = VelocityClass::classify(velocity_through_perforation_ms, limits);

        tracing::debug!(
            net_open_fraction,
            required_band_height_mm,
            row_count = band.row_count,
            adjusted_band_height_mm = band.adjusted_height_mm,
            velocity_through_perforation_ms,
            ?velocity_class,
            "perforation sizing computed"
        );
        tracing::trace!(
            recommended_band_height_mm = recommended.adjusted_height_mm,
            recommended_row_count = recommended.row_count,
            "recommendation at safe velocity"
        );

        Ok(SizingResult {
            border_mm: limits.border_mm,
            safe_intake_velocity_ms: limits.safe_intake_velocity_ms,
            max_exhaust_velocity_ms: limits.max_exhaust_velocity_ms,
            net_open_fraction,
            opening_area_mm2,
            opening_area_m2,
            perimeter_mm,
            desired_net_area_mm2,
            desired_net_area_m2: desired_net_area_mm2 / MM2_PER_M2,
            required_perforated_area_mm2,
            required_band_height_mm,
            usable_height_mm: band.usable_height_mm,
            row_count: band.row_count,
            adjusted_band_height_mm: band.adjusted_height_mm,
            actual_perforated_area_mm2,
            actual_perforated_area_m2: actual_perforated_area_mm2 / MM2_PER_M2,
            actual_net_area_mm2,
            actual_net_area_m2,
            flow_m3_per_s,
            velocity_in_opening_ms,
            velocity_through_perforation_ms,
            required_net_area_m2_at_safe_v,
            required_net_area_mm2_at_safe_v,
            required_perforated_area_mm2_at_safe_v,
            recommended_raw_height_mm: recommended.raw_height_mm,
            recommended_usable_height_mm: recommended.usable_height_mm,
            recommended_row_count: recommended.row_count,
            recommended_band_height_mm: recommended.adjusted_height_mm,
            recommended_open_fraction,
            velocity_class,
        })
    }
}

/// 기본 한계값으로 사이징을 계산한다.
pub fn compute_sizing(
    opening: &OpeningSpec,
    pattern: &PerforationPattern,
    airflow: &AirflowSpec,
) -> Result<SizingResult, SizingError> {
    PerforationSizingCalculator::default().compute_sizing(opening, pattern, airflow)
}

fn discretize_checked(
    field: &'static str,
    raw_height_mm: f64,
    unit_cell_height_mm: f64,
    limits: &SizingLimits,
) -> Result<BandSizing, SizingError> {
    BandSizing::discretize(raw_height_mm, unit_cell_height_mm, limits).ok_or(
        SizingError::HeightOutOfRange {
            field,
            value: raw_height_mm,
        },
    )
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discretize_rounds_rows_up() {
        let band = BandSizing::discretize(586.0, 25.0, &SizingLimits::default()).unwrap();
        assert_eq!(band.usable_height_mm, 546.0);
        assert_eq!(band.row_count, 22);
        assert_eq!(band.adjusted_height_mm, 590.0);
    }

    #[test]
    fn discretize_exact_multiple_keeps_row_count() {
        let band = BandSizing::discretize(140.0, 25.0, &SizingLimits::default()).unwrap();
        assert_eq!(band.row_count, 4);
        assert_eq!(band.adjusted_height_mm, 140.0);
    }

    #[test]
    fn discretize_within_border_yields_zero_height() {
        for raw in [0.0, 10.0, 40.0] {
            let band = BandSizing::discretize(raw, 25.0, &SizingLimits::default()).unwrap();
            assert_eq!(band.usable_height_mm, 0.0);
            assert_eq!(band.row_count, 0);
            assert_eq!(band.adjusted_height_mm, 0.0);
        }
    }

    #[test]
    fn classify_thresholds_are_inclusive_on_the_lower_band() {
        let limits = SizingLimits::default();
        assert_eq!(VelocityClass::classify(0.0, &limits), VelocityClass::Ok);
        assert_eq!(VelocityClass::classify(2.4, &limits), VelocityClass::Ok);
        assert_eq!(
            VelocityClass::classify(2.41, &limits),
            VelocityClass::IntakeWarning
        );
        assert_eq!(
            VelocityClass::classify(3.6, &limits),
            VelocityClass::IntakeWarning
        );
        assert_eq!(
            VelocityClass::classify(3.61, &limits),
            VelocityClass::ExhaustError
        );
    }

    #[test]
    fn blocking_and_advisory_flags() {
        assert!(VelocityClass::ExhaustError.is_blocking());
        assert!(!VelocityClass::ExhaustError.is_advisory());
        assert!(VelocityClass::IntakeWarning.is_advisory());
        assert!(!VelocityClass::IntakeWarning.is_blocking());
        assert!(!VelocityClass::Ok.is_blocking());
        assert!(!VelocityClass::Ok.is_advisory());
    }

    #[test]
    fn custom_limits_change_border_and_recommendation() {
        let calc = PerforationSizingCalculator::new(SizingLimits {
            border_mm: 0.0,
            safe_intake_velocity_ms: 4.0,
            max_exhaust_velocity_ms: 5.0,
        })
        .unwrap();
        let res = calc
            .compute_sizing(
                &OpeningSpec::new(1500.0, 1500.0),
                &PerforationPattern::new(20.0, 20.0, 5.0),
                &AirflowSpec::new(1.0, 30000.0),
            )
            .unwrap();
        // 586 / 25 = 23.4 → 24행, 여유 없음
        assert_eq!(res.row_count, 24);
        assert_eq!(res.adjusted_band_height_mm, 600.0);
        assert_eq!(res.border_mm, 0.0);
        assert_eq!(res.velocity_class, VelocityClass::Ok);
    }

    #[test]
    fn discretize_rejects_unrepresentable_heights() {
        let limits = SizingLimits::default();
        assert_eq!(BandSizing::discretize(f64::INFINITY, 25.0, &limits), None);
        assert_eq!(BandSizing::discretize(f64::NAN, 25.0, &limits), None);
        // 1e300 / 25 행은 u64에 들어가지 않는다
        assert_eq!(BandSizing::discretize(1e300, 25.0, &limits), None);
    }

    #[test]
    fn calculator_refuses_invalid_limits() {
        let nan = SizingLimits {
            safe_intake_velocity_ms: f64::NAN,
            max_exhaust_velocity_ms: f64::NAN,
            ..SizingLimits::default()
        };
        assert!(matches!(
            PerforationSizingCalculator::new(nan),
            Err(LimitsError::NonPositiveSafeVelocity(v)) if v.is_nan()
        ));

        let inverted = SizingLimits {
            safe_intake_velocity_ms: 3.0,
            max_exhaust_velocity_ms: 2.0,
            ..SizingLimits::default()
        };
        assert_eq!(
            PerforationSizingCalculator::new(inverted),
            Err(LimitsError::ExhaustBelowIntake {
                intake: 3.0,
                exhaust: 2.0
            })
        );

        let negative = SizingLimits {
            safe_intake_velocity_ms: -1.0,
            max_exhaust_velocity_ms: -0.5,
            ..SizingLimits::default()
        };
        assert!(PerforationSizingCalculator::new(negative).is_err());

        let border = SizingLimits {
            border_mm: -20.0,
            ..SizingLimits::default()
        };
        assert_eq!(
            PerforationSizingCalculator::new(border),
            Err(LimitsError::NegativeBorder(-20.0))
        );
    }

    #[test]
    fn overflowing_band_height_is_an_error() {
        let err = compute_sizing(
            &OpeningSpec::new(1e150, 1e150),
            &PerforationPattern::new(20.0, 20.0, 5.0),
            &AirflowSpec::new(1e10, 30000.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SizingError::HeightOutOfRange {
                field: "required_band_height_mm",
                ..
            }
        ));
    }
}
