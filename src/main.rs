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

use anyhow::Context;
use favicrawl::application::usecases::crawl_favicons::CrawlFaviconsUseCase;
use favicrawl::application::usecases::resolve_institutions::ResolveInstitutionsUseCase;
use favicrawl::config::settings::{RunMode, Settings};
use favicrawl::domain::models::institution::RosterEntry;
use favicrawl::engines::reqwest_engine::ReqwestEngine;
use favicrawl::infrastructure::directory_client::DirectoryClient;
use favicrawl::infrastructure::input::read_json_lines;
use favicrawl::infrastructure::metrics;
use favicrawl::infrastructure::storage::JsonLinesSink;
use favicrawl::utils::telemetry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Instrument};

/// 主函数
///
/// 应用程序入口点，负责加载配置、初始化日志与指标，并按运行模式启动对应用例
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;
    info!(mode = ?settings.mode, "Configuration loaded");

    // 3. Prometheus exporter
    if settings.metrics.enabled {
        let addr: SocketAddr = settings
            .metrics
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid metrics address {}", settings.metrics.listen_addr))?;
        metrics::init_metrics(addr)?;
    }

    // 4. Ctrl-C cancels the run
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Shutdown signal received");
                signal_token.cancel();
            }
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    });

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);

    match settings.mode {
        RunMode::Crawl => crawl(&settings, shutdown).instrument(span).await,
        RunMode::Resolve => resolve(&settings, shutdown).instrument(span).await,
    }
}

async fn crawl(settings: &Settings, shutdown: CancellationToken) -> anyhow::Result<()> {
    let engine = ReqwestEngine::new(&settings.crawl.user_agent).context("Failed to build HTTP client")?;
    let use_case = CrawlFaviconsUseCase::new(settings.pipeline_config(), Arc::new(engine));

    let report = use_case
        .execute(&settings.crawl.input_path, &settings.crawl.output_path, shutdown)
        .await?;

    info!(
        report = %serde_json::to_string(&report).unwrap_or_default(),
        "Crawl finished"
    );
    Ok(())
}

async fn resolve(settings: &Settings, shutdown: CancellationToken) -> anyhow::Result<()> {
    let roster: Vec<RosterEntry> = read_json_lines(&settings.resolve.input_path)
        .await
        .with_context(|| format!("Failed to load roster from {}", settings.resolve.input_path.display()))?;

    let output_path = settings.resolve.output_path_or_default();
    let sink = JsonLinesSink::open(&output_path)
        .await
        .with_context(|| format!("Failed to open {}", output_path.display()))?;

    let client = DirectoryClient::new(
        &settings.directory.base_url,
        Duration::from_secs(settings.directory.timeout_secs),
    )
    .context("Failed to build directory client")?;

    let use_case = ResolveInstitutionsUseCase::new(client, sink, settings.resolve.resume_from.clone());
    let report = use_case.execute(&roster, &shutdown).await;

    info!(
        output = %output_path.display(),
        report = %serde_json::to_string(&report).unwrap_or_default(),
        "Resolve finished"
    );
    Ok(())
}
