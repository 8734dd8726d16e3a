use crate::core::extractor::SegmentStrategy;
use crate::domain::model::{MenuSchedule, SourceDocument};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 輸入來源種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// PDF 文字層解出的純文字
    #[default]
    Text,
    /// 儲存下來的 NEIS mealServiceDietInfo JSON 回應
    Neis,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Text => f.write_str("text"),
            SourceKind::Neis => f.write_str("neis"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = EtlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(SourceKind::Text),
            "neis" => Ok(SourceKind::Neis),
            other => Err(EtlError::InvalidConfigValueError {
                field: "source".to_string(),
                value: other.to_string(),
                reason: "Supported values: text, neis".to_string(),
            }),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn source_kind(&self) -> SourceKind;
    fn strategy(&self) -> SegmentStrategy;
    /// Frozen "today" used for year/month inference.
    fn reference_date(&self) -> NaiveDate;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn output_basename(&self) -> &str {
        "menu"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceDocument>;
    async fn transform(&self, document: SourceDocument) -> Result<MenuSchedule>;
    async fn load(&self, schedule: &MenuSchedule) -> Result<Vec<String>>;
}
