use crate::config::{toml_config, OUTPUT_FORMATS};
use crate::core::extractor::SegmentStrategy;
use crate::core::{ConfigProvider, SourceKind};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "menu-etl")]
#[command(about = "Extract a dated school lunch menu from PDF text or NEIS meal records")]
pub struct CliConfig {
    /// Extracted PDF text, or a saved mealServiceDietInfo JSON response
    #[arg(long)]
    pub input: Option<String>,

    /// Input kind: text | neis
    #[arg(long)]
    pub source: Option<SourceKind>,

    /// Segmentation for text input: line | bulk | combined
    #[arg(long)]
    pub strategy: Option<SegmentStrategy>,

    /// Reference date (YYYY-MM-DD) used to fill in missing years and months
    #[arg(long)]
    pub today: Option<NaiveDate>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub formats: Vec<String>,

    /// Print the menu for this date (YYYY-MM-DD) after parsing
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Load settings from a TOML file; --source/--strategy/--today override it
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// 命令列參數優先於 TOML 設定
    pub fn apply_overrides(&self, config: &mut toml_config::TomlConfig) {
        if let Some(input) = &self.input {
            config.source.path = input.clone();
        }
        if let Some(source) = self.source {
            config.source.r#type = source;
        }
        if let Some(strategy) = self.strategy {
            config.parse.strategy = Some(strategy);
        }
        if let Some(today) = self.today {
            config.parse.reference_date = Some(today.format("%Y-%m-%d").to_string());
        }
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn source_kind(&self) -> SourceKind {
        self.source.unwrap_or_default()
    }

    fn strategy(&self) -> SegmentStrategy {
        self.strategy.unwrap_or_default()
    }

    fn reference_date(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_formats("formats", &self.formats, &OUTPUT_FORMATS)?;
        Ok(())
    }
}
