use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::config::{self, Config, ConfigError, InputDefaults};
use crate::i18n::{self, Translator};
use crate::perforation::report::render_report;
use crate::perforation::{
    LimitsError, PerforationSizingCalculator, SizingError, SizingRequest, SizingResult,
    VelocityClass,
};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("한계값 오류: {0}")]
    Limits(#[from] LimitsError),
    /// 입력 검증 실패. 보고서를 만들지 않는다.
    #[error("{0}")]
    Sizing(#[from] SizingError),
    #[error("결과 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// 번역된 고객용 텍스트 보고서
    Text,
    /// 입력과 전체 계산 결과를 TOML로 출력
    Toml,
}

/// 개구부 둘레 타공 밴드 높이와 통과 풍속을 계산한다.
#[derive(Debug, Clone, Parser)]
#[command(name = "perforation_toolbox", version)]
pub struct Cli {
    /// 개구부 길이 A [mm]
    #[arg(long, value_name = "MM")]
    pub opening_length: Option<f64>,
    /// 개구부 높이 B [mm]
    #[arg(long, value_name = "MM")]
    pub opening_height: Option<f64>,
    /// 구멍 폭 [mm]
    #[arg(long, value_name = "MM")]
    pub hole_width: Option<f64>,
    /// 구멍 높이 [mm]
    #[arg(long, value_name = "MM")]
    pub hole_height: Option<f64>,
    /// 구멍 사이 간격 [mm]
    #[arg(long, value_name = "MM")]
    pub gap: Option<f64>,
    /// 개구부 면적 대비 목표 순개구율 (1.0 = 100%)
    #[arg(long, value_name = "FACTOR")]
    pub open_fraction: Option<f64>,
    /// 풍량 [m³/h]
    #[arg(long, value_name = "M3_PER_H")]
    pub flow: Option<f64>,

    /// 입력값을 하나씩 물어본다
    #[arg(short, long)]
    pub interactive: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// 보고서 언어 (nl, en, ko, auto)
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 디버그 로그 출력
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 명령행에 주어진 값만 기본값 위에 덮어쓴다.
    pub fn merge_defaults(&self, defaults: &InputDefaults) -> InputDefaults {
        InputDefaults {
            opening_length_mm: self.opening_length.unwrap_or(defaults.opening_length_mm),
            opening_height_mm: self.opening_height.unwrap_or(defaults.opening_height_mm),
            hole_width_mm: self.hole_width.unwrap_or(defaults.hole_width_mm),
            hole_height_mm: self.hole_height.unwrap_or(defaults.hole_height_mm),
            gap_mm: self.gap.unwrap_or(defaults.gap_mm),
            desired_open_fraction: self.open_fraction.unwrap_or(defaults.desired_open_fraction),
            flow_rate_m3_per_hour: self.flow.unwrap_or(defaults.flow_rate_m3_per_hour),
        }
    }
}

#[derive(Debug, Serialize)]
struct SizingOutput<'a> {
    request: &'a SizingRequest,
    result: &'a SizingResult,
}

/// 설정·번역기·계산기를 묶은 CLI 애플리케이션.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    translator: Translator,
    calculator: PerforationSizingCalculator,
}

impl App {
    pub fn new(config: Config, translator: Translator) -> Result<Self, AppError> {
        let calculator = PerforationSizingCalculator::new(config.limits)?;
        Ok(Self {
            config,
            translator,
            calculator,
        })
    }

    /// 설정 파일을 읽고 언어를 결정한다.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let config = config::load_or_default(&cli.config)?;
        let lang = i18n::resolve_language(cli.lang.as_deref(), config.language.as_deref());
        let translator = Translator::new_with_pack(lang, config.locale_dir.as_deref());
        tracing::debug!(
            lang = translator.language().as_code(),
            "report language resolved"
        );
        Self::new(config, translator)
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// 입력을 모으고 계산한 뒤 보고서를 출력한다. 풍속 판정을 돌려준다.
    pub fn execute<R: BufRead, W: Write>(
        &self,
        cli: &Cli,
        input: &mut R,
        out: &mut W,
    ) -> Result<VelocityClass, AppError> {
        let defaults = cli.merge_defaults(&self.config.defaults);
        let request = if cli.interactive {
            ui_cli::prompt_request(&self.translator, &defaults, input, out)?
        } else {
            defaults.to_request()
        };

        let result = self.calculator.compute_request(&request)?;
        match result.velocity_class {
            VelocityClass::Ok => tracing::info!(
                velocity_ms = result.velocity_through_perforation_ms,
                "velocity within safe intake limit"
            ),
            VelocityClass::IntakeWarning => tracing::warn!(
                velocity_ms = result.velocity_through_perforation_ms,
                "velocity above safe intake limit"
            ),
            VelocityClass::ExhaustError => tracing::error!(
                velocity_ms = result.velocity_through_perforation_ms,
                "velocity above exhaust limit"
            ),
        }

        match cli.format {
            OutputFormat::Text => {
                let today = chrono::Local::now().date_naive();
                let report = render_report(&request, &result, &self.translator, today);
                writeln!(out, "{report}")?;
            }
            OutputFormat::Toml => {
                let output = SizingOutput {
                    request: &request,
                    result: &result,
                };
                write!(out, "{}", toml::to_string_pretty(&output)?)?;
            }
        }
        Ok(result.velocity_class)
    }
}

/// 풍속 판정을 프로세스 종료 코드로 바꾼다. 토출 기준 초과만 실패로 본다.
pub fn exit_code_for(class: VelocityClass) -> u8 {
    if class.is_blocking() {
        2
    } else {
        0
    }
}
