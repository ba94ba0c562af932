// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("队列错误: {0}")]
    QueueError(String),

    #[error("任务已取消")]
    Cancelled,
}

/// 流水线错误类型
///
/// 仅用于启动或协调阶段的致命错误，单个条目的失败不会产生此错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("任务执行失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("工作器错误: {0}")]
    Worker(#[from] WorkerError),
}
