// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::metrics as names;
use metrics::counter;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 条目被放弃的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 网络请求失败或超时
    Fetch(String),
    /// 响应内容无法读取或解析
    Parse(String),
    /// 结果写入失败
    Sink(String),
    /// 处理过程中收到取消信号
    Cancelled,
}

impl SkipReason {
    /// 指标标签
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Fetch(_) => "fetch",
            SkipReason::Parse(_) => "parse",
            SkipReason::Sink(_) => "sink",
            SkipReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::Fetch(e) => write!(f, "fetch failed: {}", e),
            SkipReason::Parse(e) => write!(f, "parse failed: {}", e),
            SkipReason::Sink(e) => write!(f, "sink write failed: {}", e),
            SkipReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// 流水线运行计数
///
/// 生产者与所有工作器共享，同时把计数同步到全局指标。
#[derive(Debug, Default)]
pub struct PipelineStats {
    produced: AtomicU64,
    enqueued: AtomicU64,
    overflowed: AtomicU64,
    enqueue_retries: AtomicU64,
    processed: AtomicU64,
    written: AtomicU64,
    skipped: AtomicU64,
    dropped: AtomicU64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_produced(&self) {
        self.produced.fetch_add(1, Ordering::Relaxed);
        counter!(names::ITEMS_PRODUCED).increment(1);
    }

    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        counter!(names::ITEMS_ENQUEUED).increment(1);
    }

    pub fn record_overflow(&self) {
        self.overflowed.fetch_add(1, Ordering::Relaxed);
        counter!(names::ITEMS_OVERFLOWED).increment(1);
    }

    pub fn record_retry(&self) {
        self.enqueue_retries.fetch_add(1, Ordering::Relaxed);
        counter!(names::ENQUEUE_RETRIES).increment(1);
    }

    pub fn record_written(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        self.written.fetch_add(1, Ordering::Relaxed);
        counter!(names::ITEMS_WRITTEN).increment(1);
    }

    pub fn record_skipped(&self, reason: &SkipReason) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        self.skipped.fetch_add(1, Ordering::Relaxed);
        counter!(names::ITEMS_SKIPPED, "reason" => reason.label()).increment(1);
    }

    pub fn record_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// 生成当前计数快照
    pub fn snapshot(&self) -> PipelineReport {
        PipelineReport {
            produced: self.produced.load(Ordering::Relaxed),
            enqueued: self.enqueued.load(Ordering::Relaxed),
            overflowed: self.overflowed.load(Ordering::Relaxed),
            enqueue_retries: self.enqueue_retries.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// 一次运行的汇总报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// 条目源产生的条目数
    pub produced: u64,
    /// 成功入队的条目数
    pub enqueued: u64,
    /// 因队列已满进入溢出缓冲区的次数
    pub overflowed: u64,
    /// 溢出模式下的等待重试次数
    pub enqueue_retries: u64,
    /// 工作器处理完成的条目数（含放弃的条目）
    pub processed: u64,
    /// 写入结果的条目数
    pub written: u64,
    /// 被放弃的条目数
    pub skipped: u64,
    /// 因取消而未被处理的条目数
    pub dropped: u64,
}
