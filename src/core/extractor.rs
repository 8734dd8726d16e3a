//! Single entry point for turning a source document into a [`MenuSchedule`].

use crate::core::bulk_segmenter::segment_bulk;
use crate::core::field_cleaner::records_to_schedule;
use crate::core::line_segmenter::segment_lines;
use crate::domain::model::{MealRecord, MenuSchedule, SourceDocument};
use crate::utils::error::EtlError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which segmenters run over unstructured text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStrategy {
    /// Date line followed by its dishes.
    Line,
    /// Whole-text table fallback only.
    Bulk,
    /// Both; bulk entries replace line entries on the same date.
    #[default]
    Combined,
}

impl SegmentStrategy {
    pub const NAMES: [&'static str; 3] = ["line", "bulk", "combined"];

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentStrategy::Line => "line",
            SegmentStrategy::Bulk => "bulk",
            SegmentStrategy::Combined => "combined",
        }
    }
}

impl fmt::Display for SegmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentStrategy {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(SegmentStrategy::Line),
            "bulk" | "table" => Ok(SegmentStrategy::Bulk),
            "combined" => Ok(SegmentStrategy::Combined),
            other => Err(EtlError::InvalidConfigValueError {
                field: "strategy".to_string(),
                value: other.to_string(),
                reason: format!("Supported values: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

/// Holds the frozen reference date, so the same input always yields the
/// same schedule.
#[derive(Debug, Clone, Copy)]
pub struct MenuExtractor {
    strategy: SegmentStrategy,
    today: NaiveDate,
}

impl MenuExtractor {
    pub fn new(strategy: SegmentStrategy, today: NaiveDate) -> Self {
        Self { strategy, today }
    }

    pub fn strategy(&self) -> SegmentStrategy {
        self.strategy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn extract(&self, document: &SourceDocument) -> MenuSchedule {
        match document {
            SourceDocument::Text(text) => self.extract_text(text),
            SourceDocument::Records(records) => self.extract_records(records),
        }
    }

    pub fn extract_text(&self, text: &str) -> MenuSchedule {
        match self.strategy {
            SegmentStrategy::Line => segment_lines(text, self.today),
            SegmentStrategy::Bulk => segment_bulk(text, self.today),
            SegmentStrategy::Combined => {
                let by_line = segment_lines(text, self.today);
                let by_table = segment_bulk(text, self.today);
                tracing::debug!(
                    "Line segmentation found {} dates, table segmentation found {}",
                    by_line.len(),
                    by_table.len()
                );
                by_table.merged_over(by_line)
            }
        }
    }

    /// Structured records skip segmentation entirely.
    pub fn extract_records(&self, records: &[MealRecord]) -> MenuSchedule {
        records_to_schedule(records)
    }
}
