// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

pub const ITEMS_PRODUCED: &str = "favicrawl_items_produced_total";
pub const ITEMS_ENQUEUED: &str = "favicrawl_items_enqueued_total";
pub const ITEMS_OVERFLOWED: &str = "favicrawl_items_overflowed_total";
pub const ENQUEUE_RETRIES: &str = "favicrawl_enqueue_retries_total";
pub const ITEMS_WRITTEN: &str = "favicrawl_items_written_total";
pub const ITEMS_SKIPPED: &str = "favicrawl_items_skipped_total";
pub const QUEUE_DEPTH: &str = "favicrawl_queue_depth";

/// 启动Prometheus导出器并注册指标说明
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder on {}: {}", addr, e))?;

    describe_counter!(ITEMS_PRODUCED, "Work items emitted by the item source");
    describe_counter!(ITEMS_ENQUEUED, "Work items placed on the bounded queue");
    describe_counter!(ITEMS_OVERFLOWED, "Work items rejected by a full queue and buffered");
    describe_counter!(ENQUEUE_RETRIES, "Retry waits spent on a full queue");
    describe_counter!(ITEMS_WRITTEN, "Enriched results written to the sink");
    describe_counter!(ITEMS_SKIPPED, "Work items abandoned by workers, labelled by reason");
    describe_gauge!(QUEUE_DEPTH, "Current number of items waiting in the queue");

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
