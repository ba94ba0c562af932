// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use std::time::Duration;

/// 退避模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackoffMode {
    /// 固定间隔
    #[default]
    Fixed,
    /// 指数退避，受最大间隔限制
    Exponential,
}

/// 入队重试策略
///
/// 队列已满时生产者按此策略等待后重新尝试非阻塞入队。
/// 入队重试没有次数上限，直到条目成功入队或任务被取消。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 初始退避时间
    pub initial_backoff: Duration,
    /// 最大退避时间
    pub max_backoff: Duration,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
    /// 退避模式
    pub mode: BackoffMode,
    /// 是否启用抖动
    pub enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// 创建固定间隔的重试策略
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_backoff: interval,
            max_backoff: interval,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
            mode: BackoffMode::Fixed,
            enable_jitter: false,
        }
    }

    /// 创建指数退避的重试策略
    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial_backoff: initial,
            max_backoff: max.max(initial),
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
            mode: BackoffMode::Exponential,
            enable_jitter: true,
        }
    }

    /// 计算第 `attempt` 次重试（从1开始）前的等待时间
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if self.mode == BackoffMode::Fixed {
            return self.initial_backoff;
        }

        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let backoff_secs =
            self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let capped_backoff = backoff_secs.min(self.max_backoff.as_secs_f64());

        let final_backoff = if self.enable_jitter && self.jitter_factor > 0.0 {
            let jitter_range = capped_backoff * self.jitter_factor;
            let jitter = rand::random_range(-jitter_range..jitter_range);
            (capped_backoff + jitter).max(0.0)
        } else {
            capped_backoff
        };

        Duration::from_secs_f64(final_backoff)
    }
}
