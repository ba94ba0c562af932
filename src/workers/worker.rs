// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// Worker trait定义
///
/// 生产者和抓取工作器都实现此trait，由工作管理器统一启动和等待
#[async_trait]
pub trait Worker: Send + Sync {
    /// 运行工作器直到输入耗尽或收到取消信号
    async fn run(&self) -> Result<(), WorkerError>;

    /// 获取工作器名称
    fn name(&self) -> &str;
}
