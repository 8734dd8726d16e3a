use crate::config::OUTPUT_FORMATS;
use crate::core::extractor::SegmentStrategy;
use crate::core::{ConfigProvider, SourceKind};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub parse: ParseConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub r#type: SourceKind,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseConfig {
    pub strategy: Option<SegmentStrategy>,
    /// `YYYY-MM-DD`; falls back to the local date when absent
    pub reference_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub filename: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MENU_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.path", &self.source.path)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_formats("load.output_formats", &self.load.output_formats, &OUTPUT_FORMATS)?;

        if let Some(filename) = &self.load.filename {
            validation::validate_non_empty_string("load.filename", filename)?;
        }
        if let Some(date) = &self.parse.reference_date {
            validation::validate_iso_date("parse.reference_date", date)?;
        }

        Ok(())
    }

    fn parsed_reference_date(&self) -> Option<NaiveDate> {
        let raw = self.parse.reference_date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.path
    }

    fn source_kind(&self) -> SourceKind {
        self.source.r#type
    }

    fn strategy(&self) -> SegmentStrategy {
        self.parse.strategy.unwrap_or_default()
    }

    fn reference_date(&self) -> NaiveDate {
        self.parsed_reference_date()
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn output_basename(&self) -> &str {
        self.load.filename.as_deref().unwrap_or("menu")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
