// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::EnrichedResult;
use async_trait::async_trait;
use thiserror::Error;

/// 结果输出错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 之前的失败写入无法回滚，输出已不可再写
    #[error("Output is poisoned by an earlier partial write")]
    Poisoned,
}

/// 结果输出特质
///
/// 所有工作器共享同一个输出。实现必须保证每次调用写入的
/// 一条完整记录（JSON加换行）不会与其他调用交错。
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 追加一条富化结果
    async fn append(&self, result: &EnrichedResult) -> Result<(), SinkError>;
}
