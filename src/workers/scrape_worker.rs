// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::models::work_item::{EnrichedResult, WorkItem};
use crate::domain::repositories::result_sink::ResultSink;
use crate::domain::services::favicon_extractor::FaviconExtractor;
use crate::engines::traits::{EngineError, ScrapeRequest, ScraperEngine};
use crate::queue::in_flight::InFlightTracker;
use crate::queue::work_queue::TaskQueue;
use crate::utils::errors::WorkerError;
use crate::utils::url_utils::normalize_url;
use crate::workers::stats::{PipelineStats, SkipReason};
use crate::workers::worker::Worker;

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// 结果已写入
    Completed(EnrichedResult),
    /// 条目被放弃
    Skipped(SkipReason),
}

/// 抓取工作者
///
/// 从共享队列拉取条目，抓取网站首页、提取图标链接并写入结果。
/// 单个条目的任何失败都只影响该条目，不会终止工作器。
pub struct ScrapeWorker {
    id: usize,
    name: String,
    queue: Arc<dyn TaskQueue>,
    engine: Arc<dyn ScraperEngine>,
    sink: Arc<dyn ResultSink>,
    tracker: Arc<InFlightTracker>,
    stats: Arc<PipelineStats>,
    request_timeout: Duration,
    shutdown: CancellationToken,
}

impl ScrapeWorker {
    /// 创建新的抓取工作器实例
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        queue: Arc<dyn TaskQueue>,
        engine: Arc<dyn ScraperEngine>,
        sink: Arc<dyn ResultSink>,
        tracker: Arc<InFlightTracker>,
        stats: Arc<PipelineStats>,
        request_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            id,
            name: format!("scrape-worker-{}", id),
            queue,
            engine,
            sink,
            tracker,
            stats,
            request_timeout,
            shutdown,
        }
    }

    /// 处理单个条目
    #[instrument(skip(self, item), fields(worker = self.id, univ = %item.name, kode = %item.identifier))]
    pub async fn process_item(&self, mut item: WorkItem) -> ItemOutcome {
        info!(website = %item.website, "Scraped website");

        item.website = normalize_url(&item.website);
        let request = ScrapeRequest::new(item.website.clone(), self.request_timeout);

        let fetched = tokio::select! {
            _ = self.shutdown.cancelled() => return ItemOutcome::Skipped(SkipReason::Cancelled),
            result = tokio::time::timeout(self.request_timeout, self.engine.scrape(&request)) => {
                result.unwrap_or_else(|_| Err(EngineError::Timeout(self.request_timeout)))
            }
        };

        let response = match fetched {
            Ok(response) => response,
            Err(e) if e.is_transport() => {
                error!(error = %e, url = %request.url, "Fetch failed");
                return ItemOutcome::Skipped(SkipReason::Fetch(e.to_string()));
            }
            Err(e) => {
                error!(error = %e, url = %request.url, "Unreadable response");
                return ItemOutcome::Skipped(SkipReason::Parse(e.to_string()));
            }
        };

        if !(200..300).contains(&response.status_code) {
            warn!(status = response.status_code, "Non-success status, extracting anyway");
        }

        if !is_html(&response.content_type) {
            debug!(content_type = %response.content_type, "Response is not declared as HTML, extracting anyway");
        }

        let icon_urls = FaviconExtractor::extract(&response.content);
        debug!(
            icons = icon_urls.len(),
            content_type = %response.content_type,
            elapsed_ms = response.response_time_ms,
            "Icons extracted"
        );

        let result = EnrichedResult::new(item, icon_urls);
        if let Err(e) = self.sink.append(&result).await {
            error!(error = %e, "Failed to write result");
            return ItemOutcome::Skipped(SkipReason::Sink(e.to_string()));
        }

        ItemOutcome::Completed(result)
    }

    fn record(&self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Completed(_) => self.stats.record_written(),
            ItemOutcome::Skipped(reason) => {
                warn!(worker = self.id, reason = %reason, "Item skipped");
                self.stats.record_skipped(reason);
            }
        }
    }
}

// Servers often mislabel HTML, so this only feeds logging.
fn is_html(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("text/html") || essence.eq_ignore_ascii_case("application/xhtml+xml")
}

#[async_trait]
impl Worker for ScrapeWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        debug!(worker = %self.name, "Scrape worker started");

        loop {
            let next = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                item = self.queue.dequeue() => item,
            };

            let Some(item) = next else {
                break;
            };

            let outcome = self.process_item(item).await;
            self.record(&outcome);
            self.tracker.finished();
        }

        debug!(worker = %self.name, "Scrape worker stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "scrape_worker_test.rs"]
mod tests;
