use crate::core::{MenuSchedule, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

/// 一次執行的結果：解析出的菜單與寫出的檔案
#[derive(Debug, Clone)]
pub struct EtlOutcome {
    pub schedule: MenuSchedule,
    pub written_files: Vec<String>,
}

pub struct MenuEtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MenuEtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EtlOutcome> {
        let started = Instant::now();
        tracing::info!("Starting menu extraction...");

        // Extract
        tracing::info!("📥 Extracting source document...");
        let document = self.pipeline.extract().await?;

        // Transform
        tracing::info!("🔄 Parsing menu schedule...");
        let schedule = self.pipeline.transform(document).await?;
        tracing::info!(
            "Parsed {} dates ({} menu items)",
            schedule.len(),
            schedule.item_count()
        );
        if schedule.is_empty() {
            tracing::warn!("⚠️ No dated menu found in the source");
        }

        // Load
        tracing::info!("💾 Writing output...");
        let written_files = self.pipeline.load(&schedule).await?;
        for path in &written_files {
            tracing::info!("📁 Output saved to: {}", path);
        }

        tracing::debug!("Finished in {:?}", started.elapsed());
        Ok(EtlOutcome {
            schedule,
            written_files,
        })
    }
}
