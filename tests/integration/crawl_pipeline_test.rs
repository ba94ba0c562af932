// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{mount_homepage, profile, read_results, write_profiles};
use favicrawl::application::usecases::crawl_favicons::CrawlFaviconsUseCase;
use favicrawl::engines::reqwest_engine::{ReqwestEngine, DEFAULT_USER_AGENT};
use favicrawl::utils::retry_policy::RetryPolicy;
use favicrawl::workers::manager::PipelineConfig;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(capacity: usize, workers: usize) -> PipelineConfig {
    PipelineConfig {
        queue_capacity: capacity,
        worker_count: workers,
        retry_policy: RetryPolicy::fixed(Duration::from_millis(10)),
        request_timeout: Duration::from_secs(5),
    }
}

fn use_case(config: PipelineConfig) -> CrawlFaviconsUseCase {
    CrawlFaviconsUseCase::new(config, Arc::new(ReqwestEngine::new(DEFAULT_USER_AGENT).unwrap()))
}

#[tokio::test]
async fn test_crawl_writes_one_line_per_reachable_site() {
    let server = MockServer::start().await;
    mount_homepage(&server, "/ui", &["/favicon.ico", "/apple.png"]).await;
    mount_homepage(&server, "/itb", &[]).await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    let output = dir.path().join("out").join("univResult.json");
    write_profiles(
        &input,
        &[
            profile("001", "Universitas Indonesia", &format!("{}/ui", server.uri())),
            profile("002", "Tanpa Situs", "   "),
            profile("003", "Institut Teknologi Bandung", &format!("{}/itb", server.uri())),
        ],
    );

    let report = use_case(config(1, 2))
        .execute(&input, &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.produced, 2);
    assert_eq!(report.written, 2);
    assert_eq!(report.dropped, 0);

    let mut results = read_results(&output);
    results.sort_by(|a, b| a.item.identifier.cmp(&b.item.identifier));
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].item.name, "Universitas Indonesia");
    assert_eq!(results[0].icon_urls, vec!["/favicon.ico", "/apple.png"]);
    assert!(results[1].icon_urls.is_empty());
}

#[tokio::test]
async fn test_crawl_appends_to_existing_output() {
    let server = MockServer::start().await;
    mount_homepage(&server, "/", &["/favicon.ico"]).await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    let output = dir.path().join("univResult.json");
    write_profiles(&input, &[profile("001", "UI", &server.uri())]);

    for _ in 0..2 {
        use_case(config(4, 1))
            .execute(&input, &output, CancellationToken::new())
            .await
            .unwrap();
    }

    assert_eq!(read_results(&output).len(), 2);
}

#[tokio::test]
async fn test_unreachable_sites_are_skipped_not_fatal() {
    let server = MockServer::start().await;
    mount_homepage(&server, "/", &["/favicon.ico"]).await;

    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    let output = dir.path().join("univResult.json");
    write_profiles(
        &input,
        &[
            profile("001", "Offline", &format!("http://{}", closed)),
            profile("002", "Online", &server.uri()),
        ],
    );

    let report = use_case(config(2, 2))
        .execute(&input, &output, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.written, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(read_results(&output)[0].item.identifier, "002");
}

#[tokio::test]
async fn test_missing_input_is_a_startup_error() {
    let dir = TempDir::new().unwrap();
    let result = use_case(config(2, 2))
        .execute(
            &dir.path().join("missing.json"),
            &dir.path().join("out.json"),
            CancellationToken::new(),
        )
        .await;

    assert!(result.is_err());
    assert!(!dir.path().join("out.json").exists());
}

#[tokio::test]
async fn test_cancellation_ends_run_with_slow_sites() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    let output = dir.path().join("univResult.json");
    let profiles: Vec<_> = (0..20)
        .map(|i| profile(&i.to_string(), "Lambat", &server.uri()))
        .collect();
    write_profiles(&input, &profiles);

    let shutdown = CancellationToken::new();
    let cancel = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        use_case(config(2, 2)).execute(&input, &output, shutdown),
    )
    .await
    .expect("cancelled crawl must return promptly")
    .unwrap();

    assert_eq!(report.written, 0);
    assert!(report.produced < 20);
    assert!(read_results(&output).is_empty());
}
