use std::io::{BufRead, Write};

use crate::app::AppError;
use crate::config::InputDefaults;
use crate::i18n::{keys, Translator};
use crate::perforation::SizingRequest;

/// 여섯 가지(풍량 포함 일곱 개) 입력값을 차례로 물어본다.
/// 빈 입력이나 입력 종료(EOF)는 기본값으로 처리한다.
pub fn prompt_request<R: BufRead, W: Write>(
    tr: &Translator,
    defaults: &InputDefaults,
    input: &mut R,
    out: &mut W,
) -> Result<SizingRequest, AppError> {
    writeln!(out, "{}", tr.t(keys::INPUT_HEADING))?;
    writeln!(out, "{}", tr.t(keys::INPUT_HELP))?;

    let mut ask = |key: &str, default: f64| read_f64_or(tr, key, default, input, out);
    let values = InputDefaults {
        opening_length_mm: ask(keys::PROMPT_OPENING_LENGTH, defaults.opening_length_mm)?,
        opening_height_mm: ask(keys::PROMPT_OPENING_HEIGHT, defaults.opening_height_mm)?,
        hole_width_mm: ask(keys::PROMPT_HOLE_WIDTH, defaults.hole_width_mm)?,
        hole_height_mm: ask(keys::PROMPT_HOLE_HEIGHT, defaults.hole_height_mm)?,
        gap_mm: ask(keys::PROMPT_GAP, defaults.gap_mm)?,
        desired_open_fraction: ask(keys::PROMPT_OPEN_FRACTION, defaults.desired_open_fraction)?,
        flow_rate_m3_per_hour: ask(keys::PROMPT_FLOW, defaults.flow_rate_m3_per_hour)?,
    };
    Ok(values.to_request())
}

fn read_line<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Option<String>, AppError> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}

fn read_f64_or<R: BufRead, W: Write>(
    tr: &Translator,
    key: &str,
    default: f64,
    input: &mut R,
    out: &mut W,
) -> Result<f64, AppError> {
    let prompt = format!(
        "{}{}",
        tr.t(key),
        tr.tf(keys::PROMPT_DEFAULT_SUFFIX, &[("default", default.to_string())])
    );
    loop {
        let Some(line) = read_line(&prompt, input, out)? else {
            return Ok(default);
        };
        let s = line.trim();
        if s.is_empty() {
            return Ok(default);
        }
        // 소수점 쉼표(1,5)도 허용한다.
        match s.replace(',', ".").parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => writeln!(out, "{}", tr.t(keys::ERROR_INVALID_NUMBER))?,
        }
    }
}
