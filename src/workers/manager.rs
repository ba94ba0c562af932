// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::result_sink::ResultSink;
use crate::domain::services::item_source::ItemSource;
use crate::engines::traits::ScraperEngine;
use crate::queue::in_flight::InFlightTracker;
use crate::queue::work_queue::{BoundedWorkQueue, TaskQueue};
use crate::utils::errors::{PipelineError, WorkerError};
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::producer::Producer;
use crate::workers::scrape_worker::ScrapeWorker;
use crate::workers::stats::{PipelineReport, PipelineStats};
use crate::workers::worker::Worker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// 流水线运行参数
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 队列容量
    pub queue_capacity: usize,
    /// 抓取工作器数量
    pub worker_count: usize,
    /// 队列已满时的重试策略
    pub retry_policy: RetryPolicy,
    /// 单次抓取的超时时间
    pub request_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 100,
            worker_count: 10,
            retry_policy: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), PipelineError> {
        if self.queue_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(PipelineError::InvalidConfig(
                "worker_count must be greater than 0".to_string(),
            ));
        }
        if self.retry_policy.initial_backoff.is_zero() {
            return Err(PipelineError::InvalidConfig(
                "retry interval must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 工作管理器
///
/// 负责一次流水线运行的完整生命周期：启动生产者与抓取工作器，
/// 等待完成屏障（生产者结束且在途条目为0），关闭队列并汇总报告。
pub struct WorkerManager {
    config: PipelineConfig,
    source: Arc<dyn ItemSource>,
    engine: Arc<dyn ScraperEngine>,
    sink: Arc<dyn ResultSink>,
    shutdown: CancellationToken,
}

impl WorkerManager {
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn ItemSource>,
        engine: Arc<dyn ScraperEngine>,
        sink: Arc<dyn ResultSink>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            source,
            engine,
            sink,
            shutdown,
        }
    }

    /// 运行流水线直到全部条目处理完毕或收到取消信号
    ///
    /// 单个条目的失败只体现在报告中；只有配置错误或任务崩溃才会返回错误。
    pub async fn run(self) -> Result<PipelineReport, PipelineError> {
        self.config.validate()?;

        let token = self.shutdown.child_token();
        let queue = Arc::new(BoundedWorkQueue::new(self.config.queue_capacity));
        let tracker = Arc::new(InFlightTracker::new());
        let stats = Arc::new(PipelineStats::new());

        info!(
            capacity = self.config.queue_capacity,
            workers = self.config.worker_count,
            "Starting pipeline"
        );

        let producer = Producer::new(
            self.source.clone(),
            queue.clone(),
            self.config.retry_policy.clone(),
            tracker.clone(),
            stats.clone(),
            token.clone(),
        );
        let producer_name = producer.name().to_string();
        let producer_handle = tokio::spawn(async move { producer.run().await });

        let handles = self.start_workers(&queue, &tracker, &stats, &token);

        let mut failure: Option<PipelineError> = None;
        match producer_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(worker = %producer_name, error = %e, "Producer failed");
                token.cancel();
                failure = Some(PipelineError::Worker(e));
            }
            Err(e) => {
                error!(worker = %producer_name, error = %e, "Producer task panicked");
                token.cancel();
                failure = Some(PipelineError::TaskJoin(e));
            }
        }

        if !token.is_cancelled() {
            tokio::select! {
                _ = tracker.wait_idle() => info!("All items processed"),
                _ = token.cancelled() => warn!("Pipeline cancelled, stopping workers"),
            }
        }

        queue.close();

        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(worker = %name, error = %e, "Scrape worker failed"),
                Err(e) => {
                    error!(worker = %name, error = %e, "Scrape worker task panicked");
                    failure.get_or_insert(PipelineError::TaskJoin(e));
                }
            }
        }

        let leftover = drain_closed(queue.as_ref()).await;
        if leftover > 0 {
            warn!(dropped = leftover, "Queued items were not processed");
            stats.record_dropped(leftover);
        }

        if let Some(e) = failure {
            return Err(e);
        }

        let report = stats.snapshot();
        info!(
            produced = report.produced,
            enqueued = report.enqueued,
            written = report.written,
            skipped = report.skipped,
            dropped = report.dropped,
            "Pipeline finished"
        );
        Ok(report)
    }

    /// 启动抓取工作器
    ///
    /// 创建并启动 `worker_count` 个工作器，每个工作器运行在独立的任务中
    fn start_workers(
        &self,
        queue: &Arc<BoundedWorkQueue>,
        tracker: &Arc<InFlightTracker>,
        stats: &Arc<PipelineStats>,
        token: &CancellationToken,
    ) -> Vec<(String, JoinHandle<Result<(), WorkerError>>)> {
        (1..=self.config.worker_count)
            .map(|id| {
                let worker = ScrapeWorker::new(
                    id,
                    queue.clone(),
                    self.engine.clone(),
                    self.sink.clone(),
                    tracker.clone(),
                    stats.clone(),
                    self.config.request_timeout,
                    token.clone(),
                );
                let name = worker.name().to_string();
                (name, tokio::spawn(async move { worker.run().await }))
            })
            .collect()
    }
}

// The queue must already be closed, otherwise `dequeue` would wait for new items.
async fn drain_closed(queue: &dyn TaskQueue) -> u64 {
    let mut count = 0;
    while queue.dequeue().await.is_some() {
        count += 1;
    }
    count
}
