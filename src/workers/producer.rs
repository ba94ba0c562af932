// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::WorkItem;
use crate::domain::services::item_source::ItemSource;
use crate::infrastructure::metrics::QUEUE_DEPTH;
use crate::queue::in_flight::InFlightTracker;
use crate::queue::overflow::OverflowBuffer;
use crate::queue::work_queue::{QueueError, TaskQueue};
use crate::utils::errors::WorkerError;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::stats::PipelineStats;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use metrics::gauge;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 生产者
///
/// 按源顺序对每个条目执行非阻塞入队。队列已满时进入溢出模式：
/// 条目放入本地缓冲区，按重试策略等待后重试队首条目，
/// 缓冲区清空之前不会读取后续的源条目，因此入队顺序与源顺序一致。
pub struct Producer {
    source: Arc<dyn ItemSource>,
    queue: Arc<dyn TaskQueue>,
    retry_policy: RetryPolicy,
    tracker: Arc<InFlightTracker>,
    stats: Arc<PipelineStats>,
    shutdown: CancellationToken,
}

impl Producer {
    pub fn new(
        source: Arc<dyn ItemSource>,
        queue: Arc<dyn TaskQueue>,
        retry_policy: RetryPolicy,
        tracker: Arc<InFlightTracker>,
        stats: Arc<PipelineStats>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            queue,
            retry_policy,
            tracker,
            stats,
            shutdown,
        }
    }

    // The in-flight count is raised before the item becomes visible to workers,
    // otherwise a fast worker could finish it before it was counted.
    fn offer(&self, item: WorkItem) -> Result<(), QueueError> {
        self.tracker.dispatched();
        match self.queue.try_enqueue(item) {
            Ok(()) => {
                self.stats.record_enqueued();
                gauge!(QUEUE_DEPTH).set(self.queue.len() as f64);
                Ok(())
            }
            Err(e) => {
                self.tracker.finished();
                Err(e)
            }
        }
    }

    async fn produce_all(&self, overflow: &mut OverflowBuffer) -> Result<(), WorkerError> {
        for item in self.source.produce() {
            if self.shutdown.is_cancelled() {
                return Err(WorkerError::Cancelled);
            }
            self.stats.record_produced();

            let website = item.website.clone();
            match self.offer(item) {
                Ok(()) => {
                    info!(website = %website, "Scraping website icon");
                }
                Err(QueueError::Full(item)) => {
                    info!(
                        univ = %item.name,
                        capacity = self.queue.capacity(),
                        "Channel is full. Waiting the channel to be available..."
                    );
                    self.stats.record_overflow();
                    overflow.push(item);
                    self.drain_overflow(overflow).await?;
                }
                Err(QueueError::Closed(item)) => {
                    overflow.push(item);
                    return Err(WorkerError::QueueError("queue closed".to_string()));
                }
            }
        }

        Ok(())
    }

    async fn drain_overflow(&self, overflow: &mut OverflowBuffer) -> Result<(), WorkerError> {
        let mut attempt = 0u32;

        while let Some(item) = overflow.take_front() {
            match self.offer(item) {
                Ok(()) => {
                    attempt = 0;
                    debug!(remaining = overflow.len(), "Buffered item enqueued");
                }
                Err(QueueError::Full(item)) => {
                    overflow.restore_front(item);
                    attempt = attempt.saturating_add(1);
                    let wait = self.retry_policy.calculate_backoff(attempt);
                    info!(
                        wait_ms = wait.as_millis() as u64,
                        attempt,
                        buffered = overflow.len(),
                        "Channel is still full. Waiting...."
                    );
                    self.stats.record_retry();

                    tokio::select! {
                        _ = self.shutdown.cancelled() => return Err(WorkerError::Cancelled),
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
                Err(QueueError::Closed(item)) => {
                    overflow.restore_front(item);
                    return Err(WorkerError::QueueError("queue closed".to_string()));
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Worker for Producer {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Producer started");
        let mut overflow = OverflowBuffer::new();

        let result = self.produce_all(&mut overflow).await;
        let dropped = overflow.clear() as u64;
        if dropped > 0 {
            self.stats.record_dropped(dropped);
        }

        match result {
            Ok(()) => {
                info!("Producer finished");
                Ok(())
            }
            Err(WorkerError::Cancelled) => {
                warn!(dropped, "Producer cancelled");
                Ok(())
            }
            Err(e) => {
                warn!(dropped, error = %e, "Producer stopped");
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "producer"
    }
}

#[cfg(test)]
#[path = "producer_test.rs"]
mod tests;
