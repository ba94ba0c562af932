// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use favicrawl::domain::models::work_item::WorkItem;
use favicrawl::domain::services::item_source::ProfileItemSource;
use favicrawl::domain::models::institution::InstitutionProfile;
use favicrawl::queue::in_flight::InFlightTracker;
use favicrawl::queue::work_queue::{BoundedWorkQueue, TaskQueue};
use favicrawl::utils::retry_policy::RetryPolicy;
use favicrawl::workers::producer::Producer;
use favicrawl::workers::stats::PipelineStats;
use favicrawl::workers::Worker;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn profiles(websites: &[String]) -> Vec<InstitutionProfile> {
    websites
        .iter()
        .enumerate()
        .map(|(i, website)| InstitutionProfile {
            npsn: i.to_string(),
            nm_lemb: format!("Kampus {}", i),
            website: website.clone(),
            ..Default::default()
        })
        .collect()
}

async fn dequeue_order(capacity: usize, source: ProfileItemSource, expected: usize) -> Vec<WorkItem> {
    let queue = Arc::new(BoundedWorkQueue::new(capacity));
    let producer = Producer::new(
        Arc::new(source),
        queue.clone(),
        RetryPolicy::fixed(Duration::from_millis(1)),
        Arc::new(InFlightTracker::new()),
        Arc::new(PipelineStats::new()),
        CancellationToken::new(),
    );

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move {
            let mut received = Vec::with_capacity(expected);
            while received.len() < expected {
                tokio::time::sleep(Duration::from_millis(1)).await;
                if let Some(item) = queue.dequeue().await {
                    received.push(item);
                }
            }
            received
        })
    };

    producer.run().await.unwrap();
    consumer.await.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_enqueue_order_matches_source_order(
        capacity in 1usize..4,
        websites in prop::collection::vec(prop_oneof!["[a-z]{3,8}\\.ac\\.id", Just(String::new()), Just("  ".to_string())], 0..25),
    ) {
        let expected: Vec<String> = websites
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.trim().is_empty())
            .map(|(i, _)| i.to_string())
            .collect();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let received = runtime.block_on(dequeue_order(
            capacity,
            ProfileItemSource::new(profiles(&websites)),
            expected.len(),
        ));

        let ids: Vec<String> = received.into_iter().map(|item| item.identifier).collect();
        prop_assert_eq!(ids, expected);
    }
}
