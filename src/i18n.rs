use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
/// 값에 들어가는 `{name}` 자리표시자는 [`fill_template`]로 채운다.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const REPORT_WITHHELD: &str = "general.report_withheld";

    pub const INPUT_HEADING: &str = "input.heading";
    pub const INPUT_HELP: &str = "input.help";
    pub const PROMPT_OPENING_LENGTH: &str = "prompt.opening_length";
    pub const PROMPT_OPENING_HEIGHT: &str = "prompt.opening_height";
    pub const PROMPT_HOLE_WIDTH: &str = "prompt.hole_width";
    pub const PROMPT_HOLE_HEIGHT: &str = "prompt.hole_height";
    pub const PROMPT_GAP: &str = "prompt.gap";
    pub const PROMPT_OPEN_FRACTION: &str = "prompt.open_fraction";
    pub const PROMPT_FLOW: &str = "prompt.flow";
    pub const PROMPT_DEFAULT_SUFFIX: &str = "prompt.default_suffix";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const REPORT_TITLE: &str = "report.title";
    pub const REPORT_OPENING_HEADING: &str = "report.opening_heading";
    pub const REPORT_LENGTH: &str = "report.length";
    pub const REPORT_HEIGHT: &str = "report.height";
    pub const REPORT_OPENING_AREA: &str = "report.opening_area";
    pub const REPORT_PATTERN_HEADING: &str = "report.pattern_heading";
    pub const REPORT_HOLE_WIDTH: &str = "report.hole_width";
    pub const REPORT_HOLE_HEIGHT: &str = "report.hole_height";
    pub const REPORT_GAP: &str = "report.gap";
    pub const REPORT_NET_OPEN_PER_PATTERN: &str = "report.net_open_per_pattern";
    pub const REPORT_REQUIRED_HEADING: &str = "report.required_heading";
    pub const REPORT_DESIRED_NET_AREA: &str = "report.desired_net_area";
    pub const REPORT_BAND_HEIGHT: &str = "report.band_height";
    pub const REPORT_ROW_COUNT: &str = "report.row_count";
    pub const REPORT_NO_ROWS: &str = "report.no_rows";
    pub const REPORT_ACTUAL_HEADING: &str = "report.actual_heading";
    pub const REPORT_ACTUAL_NET_AREA: &str = "report.actual_net_area";
    pub const REPORT_ACTUAL_PERFORATED_AREA: &str = "report.actual_perforated_area";
    pub const REPORT_BORDER_APPLIED: &str = "report.border_applied";
    pub const REPORT_RECOMMENDED_HEADING: &str = "report.recommended_heading";
    pub const REPORT_RECOMMENDED_HEIGHT: &str = "report.recommended_height";
    pub const REPORT_RECOMMENDED_NET_AREA: &str = "report.recommended_net_area";
    pub const REPORT_RECOMMENDED_FACTOR: &str = "report.recommended_factor";
    pub const REPORT_AIR_HEADING: &str = "report.air_heading";
    pub const REPORT_AIR_FLOW: &str = "report.air_flow";
    pub const REPORT_VELOCITY_OPENING: &str = "report.velocity_opening";
    pub const REPORT_VELOCITY_PERFORATION: &str = "report.velocity_perforation";

    pub const VERDICT_OK: &str = "verdict.ok";
    pub const VERDICT_INTAKE_WARNING: &str = "verdict.intake_warning";
    pub const VERDICT_EXHAUST_ERROR: &str = "verdict.exhaust_error";

    /// 내장 문자열 표가 모두 갖춰야 하는 키 목록.
    pub const ALL: &[&str] = &[
        ERROR_PREFIX,
        REPORT_WITHHELD,
        INPUT_HEADING,
        INPUT_HELP,
        PROMPT_OPENING_LENGTH,
        PROMPT_OPENING_HEIGHT,
        PROMPT_HOLE_WIDTH,
        PROMPT_HOLE_HEIGHT,
        PROMPT_GAP,
        PROMPT_OPEN_FRACTION,
        PROMPT_FLOW,
        PROMPT_DEFAULT_SUFFIX,
        ERROR_INVALID_NUMBER,
        REPORT_TITLE,
        REPORT_OPENING_HEADING,
        REPORT_LENGTH,
        REPORT_HEIGHT,
        REPORT_OPENING_AREA,
        REPORT_PATTERN_HEADING,
        REPORT_HOLE_WIDTH,
        REPORT_HOLE_HEIGHT,
        REPORT_GAP,
        REPORT_NET_OPEN_PER_PATTERN,
        REPORT_REQUIRED_HEADING,
        REPORT_DESIRED_NET_AREA,
        REPORT_BAND_HEIGHT,
        REPORT_ROW_COUNT,
        REPORT_NO_ROWS,
        REPORT_ACTUAL_HEADING,
        REPORT_ACTUAL_NET_AREA,
        REPORT_ACTUAL_PERFORATED_AREA,
        REPORT_BORDER_APPLIED,
        REPORT_RECOMMENDED_HEADING,
        REPORT_RECOMMENDED_HEIGHT,
        REPORT_RECOMMENDED_NET_AREA,
        REPORT_RECOMMENDED_FACTOR,
        REPORT_AIR_HEADING,
        REPORT_AIR_FLOW,
        REPORT_VELOCITY_OPENING,
        REPORT_VELOCITY_PERFORATION,
        VERDICT_OK,
        VERDICT_INTAKE_WARNING,
        VERDICT_EXHAUST_ERROR,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Nl,
    En,
    Ko,
}

impl Language {
    /// 알 수 없는 코드는 None.
    pub fn from_code(code: &str) -> Option<Self> {
        let c = code.trim().to_lowercase();
        let base = c.split(['.', '_', '-']).next().unwrap_or_default();
        match base {
            "nl" => Some(Language::Nl),
            "en" => Some(Language::En),
            "ko" => Some(Language::Ko),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Nl => "nl",
            Language::En => "en",
            Language::Ko => "ko",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    pub fn new(lang: Language) -> Self {
        Self {
            lang,
            overrides: None,
        }
    }

    /// 언어 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang: Language, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir.and_then(|dir| load_overrides(dir, lang.as_code()));
        if overrides.is_some() {
            tracing::debug!(lang = lang.as_code(), "loaded locale override pack");
        }
        Self { lang, overrides }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 언어팩 값이 우선이고, 내장 문자열이 없으면 영어로 폴백한다.
    pub fn t(&self, key: &str) -> &str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        let builtin = match self.lang {
            Language::Nl => nl(key),
            Language::Ko => ko(key),
            Language::En => None,
        };
        builtin.or_else(|| en(key)).unwrap_or("[missing translation]")
    }

    /// 번역 문자열의 `{name}` 자리표시자를 채운다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(self.t(key), vars)
    }
}

pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어를 결정한다. 모두 실패하면 영어.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> Language {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or(Language::En)
}

fn normalize_lang(code: &str) -> Option<Language> {
    match code.trim().to_lowercase().as_str() {
        "auto" | "" => None,
        other => Language::from_code(other),
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<Language> {
    if let Some(lang) = get_locale().as_deref().and_then(Language::from_code) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| Language::from_code(&value))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(&path).ok()?;
    let map = parse_toml_to_map(&content);
    if map.is_none() {
        tracing::warn!(path = %path.display(), "locale pack is empty or not valid TOML");
    }
    map
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn nl(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Fout",
        REPORT_WITHHELD => "Er is geen rapport gemaakt. Controleer de invoer.",
        INPUT_HEADING => "\n-- Invoer --",
        INPUT_HELP => "Druk op Enter om de standaardwaarde te gebruiken.",
        PROMPT_OPENING_LENGTH => "Sparing lengte A (mm)",
        PROMPT_OPENING_HEIGHT => "Sparing hoogte B (mm)",
        PROMPT_HOLE_WIDTH => "Gatbreedte perforatie (mm)",
        PROMPT_HOLE_HEIGHT => "Gathoogte perforatie (mm)",
        PROMPT_GAP => "Tussenmaat tussen gaten (mm)",
        PROMPT_OPEN_FRACTION => "Doorlaatfactor t.o.v. sparingoppervlak (1.0 = 100%)",
        PROMPT_FLOW => "Luchtdebiet (m³/h)",
        PROMPT_DEFAULT_SUFFIX => " [{default}]: ",
        ERROR_INVALID_NUMBER => "Voer een getal in.",
        REPORT_TITLE => "Perforatieberekening – overzicht ({date})",
        REPORT_OPENING_HEADING => "Gegevens sparing:",
        REPORT_LENGTH => "- Lengte: {value} mm",
        REPORT_HEIGHT => "- Hoogte: {value} mm",
        REPORT_OPENING_AREA => "- Oppervlakte sparing: {value} m²",
        REPORT_PATTERN_HEADING => "Gegevens perforatiepatroon:",
        REPORT_HOLE_WIDTH => "- Gatbreedte: {value} mm",
        REPORT_HOLE_HEIGHT => "- Gathoogte: {value} mm",
        REPORT_GAP => "- Tussenmaat tussen gaten: {value} mm",
        REPORT_NET_OPEN_PER_PATTERN => "- Netto doorlaat per patroon: {value}%",
        REPORT_REQUIRED_HEADING => "Benodigd resultaat:",
        REPORT_DESIRED_NET_AREA => "- Gewenste netto doorlaat (factor {factor}): {value} mm²",
        REPORT_BAND_HEIGHT => "- Benodigde perforatiehoogte (afgerond): {value} mm",
        REPORT_ROW_COUNT => "- Aantal rijen perforatie: {value}",
        REPORT_NO_ROWS => "- Geen perforatierijen nodig binnen de randvrijheid.",
        REPORT_ACTUAL_HEADING => "Werkelijke perforatie:",
        REPORT_ACTUAL_NET_AREA => "- Werkelijke netto doorlaat: {value} m²",
        REPORT_ACTUAL_PERFORATED_AREA => "- Werkelijke perforatie-oppervlakte: {value} m²",
        REPORT_BORDER_APPLIED => "- Randvrijheid toegepast: {value} mm rondom",
        REPORT_RECOMMENDED_HEADING => {
            "Aanbevolen perforatiehoogte (bij {velocity} m/s luchtsnelheid):"
        }
        REPORT_RECOMMENDED_HEIGHT => "- Hoogte: {value} mm",
        REPORT_RECOMMENDED_NET_AREA => "- Benodigde netto doorlaat: {value} mm²",
        REPORT_RECOMMENDED_FACTOR => "- Overeenkomende doorlaatfactor: {value}",
        REPORT_AIR_HEADING => "Luchttechnisch:",
        REPORT_AIR_FLOW => "- Luchtdebiet: {value} m³/h",
        REPORT_VELOCITY_OPENING => "- Snelheid in sparing: {value} m/s",
        REPORT_VELOCITY_PERFORATION => "- Snelheid door perforatie: {value} m/s",
        VERDICT_OK => "Luchtsnelheid door perforatie is binnen {limit} m/s.",
        VERDICT_INTAKE_WARNING => {
            "⚠️ Luchtsnelheid door perforatie is hoger dan {limit} m/s (aanzuig)."
        }
        VERDICT_EXHAUST_ERROR => {
            "⚠️ Luchtsnelheid door perforatie is hoger dan {limit} m/s (uitblaas)."
        }
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        REPORT_WITHHELD => "No report was produced. Please check the input.",
        INPUT_HEADING => "\n-- Input --",
        INPUT_HELP => "Press Enter to keep the default value.",
        PROMPT_OPENING_LENGTH => "Opening length A (mm)",
        PROMPT_OPENING_HEIGHT => "Opening height B (mm)",
        PROMPT_HOLE_WIDTH => "Hole width (mm)",
        PROMPT_HOLE_HEIGHT => "Hole height (mm)",
        PROMPT_GAP => "Gap between holes (mm)",
        PROMPT_OPEN_FRACTION => "Open-area factor relative to opening (1.0 = 100%)",
        PROMPT_FLOW => "Air flow (m³/h)",
        PROMPT_DEFAULT_SUFFIX => " [{default}]: ",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        REPORT_TITLE => "Perforation calculation – overview ({date})",
        REPORT_OPENING_HEADING => "Opening:",
        REPORT_LENGTH => "- Length: {value} mm",
        REPORT_HEIGHT => "- Height: {value} mm",
        REPORT_OPENING_AREA => "- Opening area: {value} m²",
        REPORT_PATTERN_HEADING => "Perforation pattern:",
        REPORT_HOLE_WIDTH => "- Hole width: {value} mm",
        REPORT_HOLE_HEIGHT => "- Hole height: {value} mm",
        REPORT_GAP => "- Gap between holes: {value} mm",
        REPORT_NET_OPEN_PER_PATTERN => "- Net open area per pattern: {value}%",
        REPORT_REQUIRED_HEADING => "Required result:",
        REPORT_DESIRED_NET_AREA => "- Desired net open area (factor {factor}): {value} mm²",
        REPORT_BAND_HEIGHT => "- Required perforation height (rounded): {value} mm",
        REPORT_ROW_COUNT => "- Number of perforation rows: {value}",
        REPORT_NO_ROWS => "- No perforation rows are needed within the border clearance.",
        REPORT_ACTUAL_HEADING => "Actual perforation:",
        REPORT_ACTUAL_NET_AREA => "- Actual net open area: {value} m²",
        REPORT_ACTUAL_PERFORATED_AREA => "- Actual perforated area: {value} m²",
        REPORT_BORDER_APPLIED => "- Border clearance applied: {value} mm all around",
        REPORT_RECOMMENDED_HEADING => "Recommended perforation height (at {velocity} m/s air velocity):",
        REPORT_RECOMMENDED_HEIGHT => "- Height: {value} mm",
        REPORT_RECOMMENDED_NET_AREA => "- Required net open area: {value} mm²",
        REPORT_RECOMMENDED_FACTOR => "- Corresponding open-area factor: {value}",
        REPORT_AIR_HEADING => "Air data:",
        REPORT_AIR_FLOW => "- Air flow: {value} m³/h",
        REPORT_VELOCITY_OPENING => "- Velocity in opening: {value} m/s",
        REPORT_VELOCITY_PERFORATION => "- Velocity through perforation: {value} m/s",
        VERDICT_OK => "Air velocity through the perforation is within {limit} m/s.",
        VERDICT_INTAKE_WARNING => {
            "⚠️ Air velocity through the perforation exceeds {limit} m/s (intake)."
        }
        VERDICT_EXHAUST_ERROR => {
            "⚠️ Air velocity through the perforation exceeds {limit} m/s (exhaust)."
        }
        _ => return None,
    })
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        REPORT_WITHHELD => "보고서를 만들지 않았습니다. 입력값을 확인하세요.",
        INPUT_HEADING => "\n-- 입력 --",
        INPUT_HELP => "엔터를 누르면 기본값을 사용합니다.",
        PROMPT_OPENING_LENGTH => "개구부 길이 A (mm)",
        PROMPT_OPENING_HEIGHT => "개구부 높이 B (mm)",
        PROMPT_HOLE_WIDTH => "타공 구멍 폭 (mm)",
        PROMPT_HOLE_HEIGHT => "타공 구멍 높이 (mm)",
        PROMPT_GAP => "구멍 사이 간격 (mm)",
        PROMPT_OPEN_FRACTION => "개구부 면적 대비 개구율 (1.0 = 100%)",
        PROMPT_FLOW => "풍량 (m³/h)",
        PROMPT_DEFAULT_SUFFIX => " [{default}]: ",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        REPORT_TITLE => "타공 계산 – 개요 ({date})",
        REPORT_OPENING_HEADING => "개구부:",
        REPORT_LENGTH => "- 길이: {value} mm",
        REPORT_HEIGHT => "- 높이: {value} mm",
        REPORT_OPENING_AREA => "- 개구부 면적: {value} m²",
        REPORT_PATTERN_HEADING => "타공 패턴:",
        REPORT_HOLE_WIDTH => "- 구멍 폭: {value} mm",
        REPORT_HOLE_HEIGHT => "- 구멍 높이: {value} mm",
        REPORT_GAP => "- 구멍 사이 간격: {value} mm",
        REPORT_NET_OPEN_PER_PATTERN => "- 패턴당 순개구율: {value}%",
        REPORT_REQUIRED_HEADING => "필요 결과:",
        REPORT_DESIRED_NET_AREA => "- 목표 순개구 면적 (계수 {factor}): {value} mm²",
        REPORT_BAND_HEIGHT => "- 필요 타공 높이 (올림): {value} mm",
        REPORT_ROW_COUNT => "- 타공 행 수: {value}",
        REPORT_NO_ROWS => "- 여유 치수 안에서 타공 행이 필요하지 않습니다.",
        REPORT_ACTUAL_HEADING => "실제 타공:",
        REPORT_ACTUAL_NET_AREA => "- 실제 순개구 면적: {value} m²",
        REPORT_ACTUAL_PERFORATED_AREA => "- 실제 타공 면적: {value} m²",
        REPORT_BORDER_APPLIED => "- 적용 여유: 둘레 {value} mm",
        REPORT_RECOMMENDED_HEADING => "권장 타공 높이 ({velocity} m/s 풍속 기준):",
        REPORT_RECOMMENDED_HEIGHT => "- 높이: {value} mm",
        REPORT_RECOMMENDED_NET_AREA => "- 필요 순개구 면적: {value} mm²",
        REPORT_RECOMMENDED_FACTOR => "- 해당 개구율: {value}",
        REPORT_AIR_HEADING => "공기 조건:",
        REPORT_AIR_FLOW => "- 풍량: {value} m³/h",
        REPORT_VELOCITY_OPENING => "- 개구부 풍속: {value} m/s",
        REPORT_VELOCITY_PERFORATION => "- 타공 통과 풍속: {value} m/s",
        VERDICT_OK => "타공 통과 풍속이 {limit} m/s 이내입니다.",
        VERDICT_INTAKE_WARNING => "⚠️ 타공 통과 풍속이 {limit} m/s(흡입)를 초과합니다.",
        VERDICT_EXHAUST_ERROR => "⚠️ 타공 통과 풍속이 {limit} m/s(토출)를 초과합니다.",
        _ => return None,
    })
}
