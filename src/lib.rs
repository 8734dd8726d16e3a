pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::menu_pipeline::MenuPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::etl::{EtlOutcome, MenuEtlEngine};
pub use core::extractor::{MenuExtractor, SegmentStrategy};
pub use domain::model::{CalendarDate, MealRecord, MenuSchedule, SourceDocument};
pub use utils::error::{EtlError, Result};
