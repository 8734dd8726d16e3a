use crate::adapters::neis;
use crate::core::extractor::MenuExtractor;
use crate::core::{ConfigProvider, MenuSchedule, Pipeline, SourceDocument, SourceKind, Storage};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// 讀取來源 -> 解析菜單 -> 輸出 JSON / CSV
pub struct MenuPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: MenuExtractor,
}

impl<S: Storage, C: ConfigProvider> MenuPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        // 參考日期只在這裡取一次
        let extractor = MenuExtractor::new(config.strategy(), config.reference_date());
        Self {
            storage,
            config,
            extractor,
        }
    }

    pub fn extractor(&self) -> &MenuExtractor {
        &self.extractor
    }

    fn output_file(&self, extension: &str) -> String {
        let filename = format!("{}.{}", self.config.output_basename(), extension);
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MenuPipeline<S, C> {
    async fn extract(&self) -> Result<SourceDocument> {
        let path = self.config.input_path();
        tracing::info!(
            "🚀 Reading {} source from: {}",
            self.config.source_kind(),
            path
        );

        let bytes = self.storage.read_file(path).await?;
        let content = String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })?;
        let content = content.trim_start_matches('\u{feff}');

        match self.config.source_kind() {
            SourceKind::Text => {
                tracing::debug!("Read {} lines of text", content.lines().count());
                Ok(SourceDocument::Text(content.to_string()))
            }
            SourceKind::Neis => {
                let records = neis::parse_response(content)?;
                tracing::info!("📊 Decoded {} meal records", records.len());
                Ok(SourceDocument::Records(records))
            }
        }
    }

    async fn transform(&self, document: SourceDocument) -> Result<MenuSchedule> {
        tracing::info!(
            "🔧 Parsing with strategy '{}' (reference date {})",
            self.extractor.strategy(),
            self.extractor.today()
        );
        Ok(self.extractor.extract(&document))
    }

    async fn load(&self, schedule: &MenuSchedule) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "json" => serde_json::to_string_pretty(schedule)?.into_bytes(),
                "csv" => schedule_to_csv(schedule)?,
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Supported formats: json, csv".to_string(),
                    })
                }
            };

            let path = self.output_file(format);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }

        Ok(written)
    }
}

/// `date,position,item`，每個菜單項目一列
pub fn schedule_to_csv(schedule: &MenuSchedule) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "position", "item"])?;

    for (date, items) in schedule {
        let date = date.to_string();
        for (idx, item) in items.iter().enumerate() {
            let position = (idx + 1).to_string();
            writer.write_record([date.as_str(), position.as_str(), item.as_str()])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::SegmentStrategy;
    use crate::core::CalendarDate;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        source_kind: SourceKind,
        strategy: SegmentStrategy,
        output_path: String,
        output_formats: Vec<String>,
    }

    impl MockConfig {
        fn new(input_path: &str, source_kind: SourceKind) -> Self {
            Self {
                input_path: input_path.to_string(),
                source_kind,
                strategy: SegmentStrategy::Combined,
                output_path: "out".to_string(),
                output_formats: vec!["json".to_string(), "csv".to_string()],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn source_kind(&self) -> SourceKind {
            self.source_kind
        }

        fn strategy(&self) -> SegmentStrategy {
            self.strategy
        }

        fn reference_date(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }
    }

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_extract_text_source() {
        let storage = MockStorage::new();
        storage.put_file("menu.txt", "\u{feff}3월 2일\n흰밥").await;
        let pipeline = MenuPipeline::new(storage, MockConfig::new("menu.txt", SourceKind::Text));

        let document = pipeline.extract().await.unwrap();
        assert_eq!(document, SourceDocument::Text("3월 2일\n흰밥".to_string()));
    }

    #[test]
    fn test_reference_date_is_frozen_at_construction() {
        let pipeline = MenuPipeline::new(
            MockStorage::new(),
            MockConfig::new("menu.txt", SourceKind::Text),
        );
        assert_eq!(
            pipeline.extractor().today(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
        assert_eq!(pipeline.extractor().strategy(), SegmentStrategy::Combined);
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_error() {
        let pipeline = MenuPipeline::new(
            MockStorage::new(),
            MockConfig::new("missing.txt", SourceKind::Text),
        );
        assert!(matches!(
            pipeline.extract().await,
            Err(EtlError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_and_transform_neis_source() {
        let storage = MockStorage::new();
        storage
            .put_file(
                "meals.json",
                r#"{"mealServiceDietInfo":[{"head":[{"list_total_count":1}]},
                   {"row":[{"MLSV_YMD":"20260302","DDISH_NM":"보리밥<br/>소불고기(5.6.13.16)"}]}]}"#,
            )
            .await;
        let pipeline = MenuPipeline::new(storage, MockConfig::new("meals.json", SourceKind::Neis));

        let document = pipeline.extract().await.unwrap();
        let schedule = pipeline.transform(document).await.unwrap();
        assert_eq!(schedule.get(&date("2026-03-02")).unwrap(), ["보리밥", "소불고기"]);
    }

    #[tokio::test]
    async fn test_load_writes_json_and_csv() {
        let storage = MockStorage::new();
        let pipeline = MenuPipeline::new(
            storage.clone(),
            MockConfig::new("menu.txt", SourceKind::Text),
        );
        let schedule = pipeline
            .extractor()
            .extract_text("3월 2일\n흰밥\n미역국, 김\n3월 3일\n잡곡밥");

        let written = pipeline.load(&schedule).await.unwrap();
        assert_eq!(written.len(), 2);

        let json_path = Path::new("out").join("menu.json").to_string_lossy().into_owned();
        let json = storage.get_file(&json_path).await.unwrap();
        let back: MenuSchedule = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, schedule);

        let csv_path = Path::new("out").join("menu.csv").to_string_lossy().into_owned();
        let csv = String::from_utf8(storage.get_file(&csv_path).await.unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,position,item",
                "2026-03-02,1,흰밥",
                "2026-03-02,2,\"미역국, 김\"",
                "2026-03-03,1,잡곡밥",
            ]
        );
    }

    #[tokio::test]
    async fn test_load_empty_schedule_still_writes_files() {
        let storage = MockStorage::new();
        let pipeline = MenuPipeline::new(
            storage.clone(),
            MockConfig::new("menu.txt", SourceKind::Text),
        );

        let written = pipeline.load(&MenuSchedule::new()).await.unwrap();
        assert_eq!(written.len(), 2);

        let json = storage.get_file(&written[0]).await.unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "{}");
    }
}
