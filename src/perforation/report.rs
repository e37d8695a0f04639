//! 고객용 요약 보고서(복사·붙여넣기용 텍스트)를 만든다.

use chrono::NaiveDate;

use super::geometry::SizingRequest;
use super::sizing::{SizingResult, VelocityClass};
use crate::i18n::{keys, Translator};

/// 계산 입력과 결과를 번역된 텍스트 보고서로 만든다.
///
/// 면적(m²)과 풍속은 소수 둘째 자리, 높이는 첫째 자리까지 표시하고
/// mm² 면적과 풍량은 천 단위 구분 기호를 넣는다.
pub fn render_report(
    request: &SizingRequest,
    result: &SizingResult,
    tr: &Translator,
    date: NaiveDate,
) -> String {
    let opening = &request.opening;
    let pattern = &request.pattern;
    let airflow = &request.airflow;
    let line = |key: &str, value: String| tr.tf(key, &[("value", value)]);

    let mut out = Vec::new();
    out.push(tr.tf(
        keys::REPORT_TITLE,
        &[("date", date.format("%d-%m-%Y").to_string())],
    ));
    out.push(String::new());

    out.push(tr.t(keys::REPORT_OPENING_HEADING).to_string());
    out.push(line(keys::REPORT_LENGTH, format!("{:.0}", opening.length_mm)));
    out.push(line(keys::REPORT_HEIGHT, format!("{:.0}", opening.height_mm)));
    out.push(line(
        keys::REPORT_OPENING_AREA,
        format!("{:.2}", result.opening_area_m2),
    ));
    out.push(String::new());

    out.push(tr.t(keys::REPORT_PATTERN_HEADING).to_string());
    out.push(line(keys::REPORT_HOLE_WIDTH, format!("{:.0}", pattern.hole_width_mm)));
    out.push(line(
        keys::REPORT_HOLE_HEIGHT,
        format!("{:.0}", pattern.hole_height_mm),
    ));
    out.push(line(keys::REPORT_GAP, format!("{:.0}", pattern.gap_mm)));
    out.push(line(
        keys::REPORT_NET_OPEN_PER_PATTERN,
        format!("{:.2}", result.net_open_fraction * 100.0),
    ));
    out.push(String::new());

    out.push(tr.t(keys::REPORT_REQUIRED_HEADING).to_string());
    out.push(tr.tf(
        keys::REPORT_DESIRED_NET_AREA,
        &[
            ("factor", format!("{:.2}", airflow.desired_open_fraction)),
            ("value", format_grouped(result.desired_net_area_mm2, 0)),
        ],
    ));
    out.push(line(
        keys::REPORT_BAND_HEIGHT,
        format!("{:.1}", result.adjusted_band_height_mm),
    ));
    out.push(line(keys::REPORT_ROW_COUNT, result.row_count.to_string()));
    if result.row_count == 0 {
        out.push(tr.t(keys::REPORT_NO_ROWS).to_string());
    }
    out.push(String::new());

    out.push(tr.t(keys::REPORT_ACTUAL_HEADING).to_string());
    out.push(line(
        keys::REPORT_ACTUAL_NET_AREA,
        format!("{:.2}", result.actual_net_area_m2),
    ));
    out.push(line(
        keys::REPORT_ACTUAL_PERFORATED_AREA,
        format!("{:.2}", result.actual_perforated_area_m2),
    ));
    out.push(line(keys::REPORT_BORDER_APPLIED, result.border_mm.to_string()));
    out.push(String::new());

    out.push(tr.tf(
        keys::REPORT_RECOMMENDED_HEADING,
        &[("velocity", result.safe_intake_velocity_ms.to_string())],
    ));
    out.push(line(
        keys::REPORT_RECOMMENDED_HEIGHT,
        format!("{:.1}", result.recommended_band_height_mm),
    ));
    out.push(line(
        keys::REPORT_RECOMMENDED_NET_AREA,
        format_grouped(result.required_net_area_mm2_at_safe_v, 0),
    ));
    out.push(line(
        keys::REPORT_RECOMMENDED_FACTOR,
        format!("{:.2}", result.recommended_open_fraction),
    ));
    out.push(String::new());

    out.push(tr.t(keys::REPORT_AIR_HEADING).to_string());
    out.push(line(
        keys::REPORT_AIR_FLOW,
        format_grouped(airflow.flow_rate_m3_per_hour, 0),
    ));
    out.push(line(
        keys::REPORT_VELOCITY_OPENING,
        format!("{:.2}", result.velocity_in_opening_ms),
    ));
    out.push(line(
        keys::REPORT_VELOCITY_PERFORATION,
        format!("{:.2}", result.velocity_through_perforation_ms),
    ));
    out.push(String::new());

    out.push(verdict_line(result, tr));
    out.join("\n")
}

/// 풍속 판정을 한 줄 문장으로 만든다. 경고/오류 문장에는 넘은 기준값을 넣는다.
pub fn verdict_line(result: &SizingResult, tr: &Translator) -> String {
    let (key, limit) = match result.velocity_class {
        VelocityClass::Ok => (keys::VERDICT_OK, result.safe_intake_velocity_ms),
        VelocityClass::IntakeWarning => {
            (keys::VERDICT_INTAKE_WARNING, result.safe_intake_velocity_ms)
        }
        VelocityClass::ExhaustError => {
            (keys::VERDICT_EXHAUST_ERROR, result.max_exhaust_velocity_ms)
        }
    };
    tr.tf(key, &[("limit", limit.to_string())])
}

/// 천 단위마다 `,`를 넣어 숫자를 문자열로 만든다.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
