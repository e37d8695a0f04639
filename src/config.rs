use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::perforation::{
    AirflowSpec, LimitsError, OpeningSpec, PerforationPattern, SizingLimits, SizingRequest,
};

/// 설정 파일이 없을 때 사용하는 기본 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 입력을 생략했을 때 쓰는 기본 입력값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputDefaults {
    pub opening_length_mm: f64,
    pub opening_height_mm: f64,
    pub hole_width_mm: f64,
    pub hole_height_mm: f64,
    pub gap_mm: f64,
    pub desired_open_fraction: f64,
    pub flow_rate_m3_per_hour: f64,
}

impl Default for InputDefaults {
    fn default() -> Self {
        Self {
            opening_length_mm: 1500.0,
            opening_height_mm: 1500.0,
            hole_width_mm: 20.0,
            hole_height_mm: 20.0,
            gap_mm: 5.0,
            desired_open_fraction: 1.0,
            flow_rate_m3_per_hour: 30000.0,
        }
    }
}

impl InputDefaults {
    pub fn to_request(&self) -> SizingRequest {
        SizingRequest {
            opening: OpeningSpec::new(self.opening_length_mm, self.opening_height_mm),
            pattern: PerforationPattern::new(self.hole_width_mm, self.hole_height_mm, self.gap_mm),
            airflow: AirflowSpec::new(self.desired_open_fraction, self.flow_rate_m3_per_hour),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 보고서 언어 코드 (nl/en/ko/auto)
    pub language: Option<String>,
    /// 언어팩 디렉터리. `<dir>/<code>.toml` 형식의 덮어쓰기 파일을 읽는다.
    pub locale_dir: Option<String>,
    pub limits: SizingLimits,
    pub defaults: InputDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Some("auto".to_string()),
            locale_dir: None,
            limits: SizingLimits::default(),
            defaults: InputDefaults::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("한계값 설정 오류: {0}")]
    Limits(#[from] LimitsError),
}

/// 설정 파일을 로드하거나, 없으면 기본 설정을 만들어 저장한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.limits.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        tracing::info!(path = %path.display(), "default configuration written");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
