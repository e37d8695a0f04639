//! 타공 사이징 계산의 기준 시나리오와 성질 테스트.
use perforation_toolbox::perforation::{
    compute_sizing, AirflowSpec, BandSizing, OpeningSpec, PerforationPattern, SizingError,
    SizingLimits, VelocityClass, BORDER_MM,
};

fn reference_inputs() -> (OpeningSpec, PerforationPattern, AirflowSpec) {
    (
        OpeningSpec::new(1500.0, 1500.0),
        PerforationPattern::new(20.0, 20.0, 5.0),
        AirflowSpec::new(1.0, 30000.0),
    )
}

#[test]
fn reference_opening_exceeds_exhaust_limit() {
    let (opening, pattern, airflow) = reference_inputs();
    let res = compute_sizing(&opening, &pattern, &airflow).expect("valid inputs");

    assert!((res.net_open_fraction - 0.64).abs() < 1e-12);
    assert_eq!(res.perimeter_mm, 6000.0);
    assert_eq!(res.desired_net_area_mm2, 2_250_000.0);
    assert!((res.required_perforated_area_mm2 - 3_515_625.0).abs() < 1e-6);
    assert!((res.required_band_height_mm - 585.9375).abs() < 1e-9);
    assert_eq!(res.required_band_height_mm.round(), 586.0);
    assert!((res.usable_height_mm - 545.9375).abs() < 1e-9);
    assert_eq!(res.row_count, 22);
    assert_eq!(res.adjusted_band_height_mm, 590.0);
    assert_eq!(res.actual_perforated_area_mm2, 3_540_000.0);
    assert!((res.actual_net_area_m2 - 2.2656).abs() < 1e-9);
    assert!((res.flow_m3_per_s - 8.333_333).abs() < 1e-6);
    assert!((res.velocity_in_opening_ms - 3.7037).abs() < 1e-4);
    assert!((res.velocity_through_perforation_ms - 3.6782).abs() < 1e-4);
    assert_eq!(res.velocity_class, VelocityClass::ExhaustError);
    assert!(res.velocity_class.is_blocking());
}

#[test]
fn reference_recommendation_at_safe_velocity() {
    let (opening, pattern, airflow) = reference_inputs();
    let res = compute_sizing(&opening, &pattern, &airflow).unwrap();

    assert!((res.required_net_area_m2_at_safe_v - 3.472_222).abs() < 1e-6);
    assert!((res.recommended_raw_height_mm - 904.2245).abs() < 1e-3);
    assert_eq!(res.recommended_row_count, 35);
    assert_eq!(res.recommended_band_height_mm, 915.0);
    assert!((res.recommended_open_fraction - 1.543_21).abs() < 1e-5);
}

#[test]
fn zero_flow_gives_zero_velocities_without_warning() {
    let (opening, pattern, _) = reference_inputs();
    let res = compute_sizing(&opening, &pattern, &AirflowSpec::new(1.0, 0.0)).unwrap();
    assert_eq!(res.flow_m3_per_s, 0.0);
    assert_eq!(res.velocity_in_opening_ms, 0.0);
    assert_eq!(res.velocity_through_perforation_ms, 0.0);
    assert_eq!(res.velocity_class, VelocityClass::Ok);
    assert_eq!(res.recommended_row_count, 0);
    assert_eq!(res.recommended_band_height_mm, 0.0);
    assert_eq!(res.recommended_open_fraction, 0.0);
    // 필요 밴드 높이는 풍량과 무관하다.
    assert_eq!(res.row_count, 22);
}

#[test]
fn band_inside_border_yields_zero_rows_and_zero_perforation_velocity() {
    let res = compute_sizing(
        &OpeningSpec::new(100.0, 100.0),
        &PerforationPattern::new(20.0, 20.0, 5.0),
        &AirflowSpec::new(0.1, 500.0),
    )
    .unwrap();
    assert_eq!(res.row_count, 0);
    assert_eq!(res.adjusted_band_height_mm, 0.0);
    assert_eq!(res.actual_net_area_m2, 0.0);
    assert_eq!(res.velocity_through_perforation_ms, 0.0);
    assert!(res.velocity_in_opening_ms > 0.0);
    assert_eq!(res.velocity_class, VelocityClass::Ok);
}

#[test]
fn hole_width_zero_is_invalid_pattern() {
    let (opening, _, airflow) = reference_inputs();
    let err = compute_sizing(&opening, &PerforationPattern::new(0.0, 20.0, 5.0), &airflow)
        .unwrap_err();
    assert_eq!(
        err,
        SizingError::InvalidPattern {
            field: "hole_width_mm",
            value: 0.0
        }
    );
}

#[test]
fn non_positive_opening_is_rejected() {
    let (_, pattern, airflow) = reference_inputs();
    let err = compute_sizing(&OpeningSpec::new(-5.0, 1500.0), &pattern, &airflow).unwrap_err();
    assert!(matches!(
        err,
        SizingError::InvalidOpening {
            field: "length_mm",
            ..
        }
    ));
}

#[test]
fn non_positive_open_fraction_is_rejected() {
    let (opening, pattern, _) = reference_inputs();
    let err = compute_sizing(&opening, &pattern, &AirflowSpec::new(0.0, 1000.0)).unwrap_err();
    assert!(matches!(
        err,
        SizingError::InvalidAirflow {
            field: "desired_open_fraction",
            ..
        }
    ));
}

#[test]
fn net_open_fraction_stays_within_unit_interval() {
    for hole in [1.0, 3.0, 10.0, 20.0, 55.5] {
        for gap in [0.0, 0.5, 5.0, 40.0] {
            let pattern = PerforationPattern::new(hole, hole * 0.5, gap);
            assert!(pattern.validate().is_ok());
            let f = pattern.net_open_fraction();
            assert!(f > 0.0 && f <= 1.0, "hole={hole} gap={gap} fraction={f}");
        }
    }
}

#[test]
fn adjusted_height_is_zero_or_rows_plus_border() {
    let cell = 25.0;
    let limits = SizingLimits::default();
    let mut raw = 0.0;
    while raw < 1200.0 {
        let band = BandSizing::discretize(raw, cell, &limits).expect("finite height");
        if band.row_count == 0 {
            assert_eq!(band.adjusted_height_mm, 0.0);
        } else {
            assert!(band.adjusted_height_mm >= 2.0 * BORDER_MM);
            assert_eq!(
                band.adjusted_height_mm,
                band.row_count as f64 * cell + 2.0 * BORDER_MM
            );
            assert!(band.adjusted_height_mm >= raw);
        }
        raw += 7.3;
    }
}

#[test]
fn velocities_never_decrease_with_flow() {
    let (opening, pattern, _) = reference_inputs();
    let mut prev_opening = 0.0;
    let mut prev_perforation = 0.0;
    for step in 0..=20 {
        let flow = step as f64 * 2500.0;
        let res = compute_sizing(&opening, &pattern, &AirflowSpec::new(1.0, flow)).unwrap();
        assert!(res.velocity_in_opening_ms >= prev_opening);
        assert!(res.velocity_through_perforation_ms >= prev_perforation);
        prev_opening = res.velocity_in_opening_ms;
        prev_perforation = res.velocity_through_perforation_ms;
    }
}

#[test]
fn required_height_never_decreases_with_open_fraction() {
    let (opening, pattern, _) = reference_inputs();
    let mut prev = 0.0;
    for step in 1..=30 {
        let fraction = step as f64 * 0.1;
        let res =
            compute_sizing(&opening, &pattern, &AirflowSpec::new(fraction, 30000.0)).unwrap();
        assert!(res.required_band_height_mm >= prev, "fraction={fraction}");
        prev = res.required_band_height_mm;
    }
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let (opening, pattern, airflow) = reference_inputs();
    let a = compute_sizing(&opening, &pattern, &airflow).unwrap();
    let b = compute_sizing(&opening, &pattern, &airflow).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.velocity_through_perforation_ms.to_bits(),
        b.velocity_through_perforation_ms.to_bits()
    );
}
