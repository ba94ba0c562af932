// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use favicrawl::domain::models::work_item::WorkItem;
use favicrawl::queue::in_flight::InFlightTracker;
use favicrawl::queue::work_queue::{BoundedWorkQueue, TaskQueue};
use favicrawl::utils::retry_policy::RetryPolicy;
use favicrawl::workers::producer::Producer;
use favicrawl::workers::stats::PipelineStats;
use favicrawl::workers::Worker;
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn items(n: usize) -> Vec<WorkItem> {
    (0..n)
        .map(|i| WorkItem::new(i.to_string(), format!("kampus{}.ac.id", i), format!("Kampus {}", i)))
        .collect()
}

/// 在随机的生产与消费速度下运行一次，返回观测到的最大队列长度与消费条目数
async fn observe(capacity: usize, count: usize, consumer_delays: Vec<u64>) -> (usize, usize) {
    let queue = Arc::new(BoundedWorkQueue::new(capacity));
    let tracker = Arc::new(InFlightTracker::new());
    let producer = Producer::new(
        Arc::new(items(count)),
        queue.clone(),
        RetryPolicy::fixed(Duration::from_millis(1)),
        tracker.clone(),
        Arc::new(PipelineStats::new()),
        CancellationToken::new(),
    );

    let max_seen = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));

    let monitor = {
        let queue = queue.clone();
        let max_seen = max_seen.clone();
        let done = done.clone();
        tokio::spawn(async move {
            while !done.load(Ordering::SeqCst) {
                max_seen.fetch_max(queue.len(), Ordering::SeqCst);
                tokio::task::yield_now().await;
            }
        })
    };

    let consumers: Vec<_> = consumer_delays
        .into_iter()
        .map(|delay| {
            let queue = queue.clone();
            let tracker = tracker.clone();
            tokio::spawn(async move {
                let mut consumed = 0usize;
                while let Some(_item) = queue.dequeue().await {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    tracker.finished();
                    consumed += 1;
                }
                consumed
            })
        })
        .collect();

    producer.run().await.unwrap();
    tracker.wait_idle().await;
    queue.close();

    let mut consumed = 0;
    for consumer in consumers {
        consumed += consumer.await.unwrap();
    }
    done.store(true, Ordering::SeqCst);
    monitor.await.unwrap();

    (max_seen.load(Ordering::SeqCst), consumed)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_queue_never_exceeds_capacity(
        capacity in 1usize..6,
        count in 0usize..40,
        consumer_delays in prop::collection::vec(0u64..4, 1..4),
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let (max_seen, consumed) = runtime.block_on(observe(capacity, count, consumer_delays));

        prop_assert!(max_seen <= capacity, "observed {} items with capacity {}", max_seen, capacity);
        prop_assert_eq!(consumed, count);
    }
}
