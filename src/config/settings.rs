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

use crate::engines::reqwest_engine::DEFAULT_USER_AGENT;
use crate::utils::retry_policy::{BackoffMode, RetryPolicy};
use crate::workers::manager::PipelineConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 运行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// 抓取高校网站图标
    #[default]
    Crawl,
    /// 通过目录接口解析高校名录
    Resolve,
}

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 运行模式
    pub mode: RunMode,
    /// 流水线配置
    pub pipeline: PipelineSettings,
    /// 图标抓取配置
    pub crawl: CrawlSettings,
    /// 目录接口配置
    pub directory: DirectorySettings,
    /// 名录解析配置
    pub resolve: ResolveSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 流水线配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 队列容量
    pub queue_capacity: usize,
    /// 抓取工作器数量
    pub worker_count: usize,
    /// 队列已满时的重试间隔（毫秒）
    pub retry_interval_ms: u64,
    /// 退避模式
    pub retry_backoff: BackoffMode,
    /// 指数退避的最大间隔（毫秒）
    pub max_retry_interval_ms: u64,
}

/// 图标抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 输入文件路径（每行一个高校详情JSON）
    pub input_path: PathBuf,
    /// 结果文件路径
    pub output_path: PathBuf,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

/// 目录接口配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    /// 接口基础地址
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 名录解析配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveSettings {
    /// 名录文件路径（每行一个 `{nama, kode}`）
    pub input_path: PathBuf,
    /// 输出文件路径，未设置时使用 `data-{unix时间戳}.json`
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// 从该代码对应的条目开始处理
    #[serde(default)]
    pub resume_from: Option<String>,
}

impl ResolveSettings {
    pub fn output_path_or_default(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("data-{}.json", chrono::Utc::now().timestamp())))
    }
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动Prometheus导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `FAVICRAWL__SECTION__KEY` 形式的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FAVICRAWL")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 仅包含内置默认值的配置构建器
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("mode", "crawl")?
            // Pipeline
            .set_default("pipeline.queue_capacity", 100)?
            .set_default("pipeline.worker_count", 10)?
            .set_default("pipeline.retry_interval_ms", 1000)?
            .set_default("pipeline.retry_backoff", "fixed")?
            .set_default("pipeline.max_retry_interval_ms", 30_000)?
            // Crawl
            .set_default("crawl.input_path", "./result.json")?
            .set_default("crawl.output_path", "./univResult.json")?
            .set_default("crawl.request_timeout_secs", 30)?
            .set_default("crawl.user_agent", DEFAULT_USER_AGENT)?
            // Directory API
            .set_default("directory.base_url", "https://api-frontend.kemdikbud.go.id")?
            .set_default("directory.timeout_secs", 30)?
            // Resolve
            .set_default("resolve.input_path", "./daftar_pt.json")?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.queue_capacity == 0 {
            return Err(ConfigError::Message(
                "pipeline.queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.worker_count == 0 {
            return Err(ConfigError::Message(
                "pipeline.worker_count must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.retry_interval_ms == 0 {
            return Err(ConfigError::Message(
                "pipeline.retry_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.crawl.request_timeout_secs == 0 || self.directory.timeout_secs == 0 {
            return Err(ConfigError::Message("timeouts must be greater than 0".to_string()));
        }
        url::Url::parse(&self.directory.base_url).map_err(|e| {
            ConfigError::Message(format!("directory.base_url is not a valid URL: {}", e))
        })?;
        Ok(())
    }

    /// 根据配置构建入队重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        let interval = Duration::from_millis(self.pipeline.retry_interval_ms);
        match self.pipeline.retry_backoff {
            BackoffMode::Fixed => RetryPolicy::fixed(interval),
            BackoffMode::Exponential => RetryPolicy::exponential(
                interval,
                Duration::from_millis(self.pipeline.max_retry_interval_ms),
            ),
        }
    }

    /// 根据配置构建流水线运行参数
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            queue_capacity: self.pipeline.queue_capacity,
            worker_count: self.pipeline.worker_count,
            retry_policy: self.retry_policy(),
            request_timeout: Duration::from_secs(self.crawl.request_timeout_secs),
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
