// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::models::institution::InstitutionProfile;
use crate::domain::services::item_source::ProfileItemSource;
use crate::engines::traits::ScraperEngine;
use crate::infrastructure::input::read_json_lines;
use crate::infrastructure::storage::JsonLinesSink;
use crate::workers::manager::{PipelineConfig, WorkerManager};
use crate::workers::stats::PipelineReport;

/// 抓取高校网站图标用例
///
/// 读取高校详情文件，经有界队列分发给抓取工作器，结果追加写入输出文件
pub struct CrawlFaviconsUseCase {
    config: PipelineConfig,
    engine: Arc<dyn ScraperEngine>,
}

impl CrawlFaviconsUseCase {
    pub fn new(config: PipelineConfig, engine: Arc<dyn ScraperEngine>) -> Self {
        Self { config, engine }
    }

    pub async fn execute(
        &self,
        input_path: &Path,
        output_path: &Path,
        shutdown: CancellationToken,
    ) -> anyhow::Result<PipelineReport> {
        let profiles: Vec<InstitutionProfile> = read_json_lines(input_path)
            .await
            .with_context(|| format!("Failed to load profiles from {}", input_path.display()))?;

        let source = ProfileItemSource::new(profiles);
        info!(items = source.len(), output = %output_path.display(), "Crawling favicons");

        let sink = JsonLinesSink::open(output_path)
            .await
            .with_context(|| format!("Failed to open result file {}", output_path.display()))?;

        let manager = WorkerManager::new(
            self.config.clone(),
            Arc::new(source),
            self.engine.clone(),
            Arc::new(sink),
            shutdown,
        );

        manager.run().await.context("Crawl pipeline failed")
    }
}
