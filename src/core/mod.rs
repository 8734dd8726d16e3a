pub mod bulk_segmenter;
pub mod classifier;
pub mod date_pattern;
pub mod etl;
pub mod extractor;
pub mod field_cleaner;
pub mod line_segmenter;

pub use crate::domain::model::{CalendarDate, MealRecord, MenuSchedule, SourceDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SourceKind, Storage};
pub use crate::utils::error::Result;
