pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
mod args;

#[cfg(feature = "cli")]
pub use args::CliConfig;

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];
