// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{is_html, ItemOutcome, ScrapeWorker};
use crate::domain::models::work_item::{EnrichedResult, WorkItem};
use crate::domain::repositories::result_sink::{ResultSink, SinkError};
use crate::engines::reqwest_engine::{ReqwestEngine, DEFAULT_USER_AGENT};
use crate::infrastructure::storage::InMemorySink;
use crate::queue::in_flight::InFlightTracker;
use crate::queue::work_queue::{BoundedWorkQueue, TaskQueue};
use crate::workers::stats::{PipelineStats, SkipReason};
use crate::workers::worker::Worker;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html><head>
    <link rel="icon" href="/favicon.ico">
    <link rel="stylesheet" href="/main.css">
    <link rel="icon" href="/icon-192.png">
</head><body>Selamat datang</body></html>"#;

struct FailingSink;

#[async_trait]
impl ResultSink for FailingSink {
    async fn append(&self, _result: &EnrichedResult) -> Result<(), SinkError> {
        Err(SinkError::Io(std::io::Error::other("disk full")))
    }
}

struct Fixture {
    queue: Arc<BoundedWorkQueue>,
    tracker: Arc<InFlightTracker>,
    stats: Arc<PipelineStats>,
    shutdown: CancellationToken,
}

impl Fixture {
    fn new() -> Self {
        Self {
            queue: Arc::new(BoundedWorkQueue::new(16)),
            tracker: Arc::new(InFlightTracker::new()),
            stats: Arc::new(PipelineStats::new()),
            shutdown: CancellationToken::new(),
        }
    }

    fn worker(&self, sink: Arc<dyn ResultSink>, timeout: Duration) -> ScrapeWorker {
        ScrapeWorker::new(
            1,
            self.queue.clone(),
            Arc::new(ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap()),
            sink,
            self.tracker.clone(),
            self.stats.clone(),
            timeout,
            self.shutdown.clone(),
        )
    }
}

async fn page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;
    server
}

// Declares gzip but sends bytes that are not a gzip stream, so reading the body fails.
async fn broken_body_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(b"<html>this is not gzip</html>".to_vec()),
        )
        .mount(&server)
        .await;
    server
}

fn unreachable_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_process_item_extracts_icons_and_writes_result() {
    let server = page_server().await;
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    let item = WorkItem::new("001001", server.uri(), "Universitas Indonesia");
    let outcome = worker.process_item(item).await;

    let expected = EnrichedResult::new(
        WorkItem::new("001001", server.uri(), "Universitas Indonesia"),
        vec!["/favicon.ico".to_string(), "/icon-192.png".to_string()],
    );
    assert_eq!(outcome, ItemOutcome::Completed(expected.clone()));
    assert_eq!(sink.records(), vec![expected]);
}

#[tokio::test]
async fn test_result_carries_normalized_address() {
    let server = page_server().await;
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    let padded = format!("  {}  ", server.uri());
    let outcome = worker.process_item(WorkItem::new("1", padded, "Padded")).await;

    match outcome {
        ItemOutcome::Completed(result) => assert_eq!(result.item.website, server.uri()),
        other => panic!("expected completed item, got {:?}", other),
    }
    assert_eq!(sink.records()[0].item.website, server.uri());
}

#[tokio::test]
async fn test_transport_failure_skips_item() {
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    let outcome = worker
        .process_item(WorkItem::new("1", unreachable_address(), "Offline"))
        .await;

    assert!(matches!(outcome, ItemOutcome::Skipped(SkipReason::Fetch(_))));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_slow_site_hits_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_millis(200));

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        worker.process_item(WorkItem::new("1", server.uri(), "Slow")),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, ItemOutcome::Skipped(SkipReason::Fetch(_))));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_unreadable_body_is_parse_skip() {
    let server = broken_body_server().await;
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    let outcome = worker
        .process_item(WorkItem::new("1", server.uri(), "Rusak"))
        .await;

    assert!(
        matches!(outcome, ItemOutcome::Skipped(SkipReason::Parse(_))),
        "got {:?}",
        outcome
    );
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_run_continues_after_unreadable_body() {
    let broken = broken_body_server().await;
    let good = page_server().await;
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    fixture.tracker.dispatched();
    fixture
        .queue
        .try_enqueue(WorkItem::new("broken", broken.uri(), "Rusak"))
        .unwrap();
    fixture.tracker.dispatched();
    fixture
        .queue
        .try_enqueue(WorkItem::new("good", good.uri(), "Baik"))
        .unwrap();
    fixture.queue.close();

    tokio::time::timeout(Duration::from_secs(10), worker.run())
        .await
        .unwrap()
        .unwrap();

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].item.identifier, "good");
    assert_eq!(fixture.tracker.current(), 0);

    let report = fixture.stats.snapshot();
    assert_eq!(report.processed, 2);
    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_sink_failure_is_reported_as_skip() {
    let server = page_server().await;
    let fixture = Fixture::new();
    let worker = fixture.worker(Arc::new(FailingSink), Duration::from_secs(5));

    let outcome = worker
        .process_item(WorkItem::new("1", server.uri(), "Universitas"))
        .await;

    assert!(matches!(outcome, ItemOutcome::Skipped(SkipReason::Sink(_))));
}

#[tokio::test]
async fn test_run_drains_queue_until_closed() {
    let server = page_server().await;
    let fixture = Fixture::new();
    let sink = Arc::new(InMemorySink::new());
    let worker = fixture.worker(sink.clone(), Duration::from_secs(5));

    for n in 0..3 {
        fixture.tracker.dispatched();
        fixture
            .queue
            .try_enqueue(WorkItem::new(n.to_string(), server.uri(), format!("U{}", n)))
            .unwrap();
    }
    fixture.tracker.dispatched();
    fixture
        .queue
        .try_enqueue(WorkItem::new("offline", unreachable_address(), "Offline"))
        .unwrap();
    fixture.queue.close();

    tokio::time::timeout(Duration::from_secs(10), worker.run())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(sink.len(), 3);
    assert_eq!(fixture.tracker.current(), 0);

    let report = fixture.stats.snapshot();
    assert_eq!(report.processed, 4);
    assert_eq!(report.written, 3);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_run_stops_on_cancellation_while_idle() {
    let fixture = Fixture::new();
    let worker = fixture.worker(Arc::new(InMemorySink::new()), Duration::from_secs(5));

    let shutdown = fixture.shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
    });

    tokio::time::timeout(Duration::from_secs(2), worker.run())
        .await
        .expect("idle worker must observe cancellation")
        .unwrap();
}

#[tokio::test]
async fn test_worker_name_and_html_detection() {
    let fixture = Fixture::new();
    let worker = fixture.worker(Arc::new(InMemorySink::new()), Duration::from_secs(5));
    assert_eq!(worker.name(), "scrape-worker-1");

    assert!(is_html("text/html"));
    assert!(is_html("Text/HTML; charset=UTF-8"));
    assert!(is_html("application/xhtml+xml"));
    assert!(!is_html("application/json"));
    assert!(!is_html(""));
}
