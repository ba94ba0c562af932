// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Serialize;
use std::io;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::domain::models::work_item::EnrichedResult;
use crate::domain::repositories::result_sink::{ResultSink, SinkError};

/// 可回滚的行写入目标
///
/// 写入失败后输出会被截断回最后一条完整记录的末尾。
#[async_trait]
pub trait LineTarget: AsyncWrite + Unpin + Send {
    /// 截断到指定长度
    async fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

#[async_trait]
impl LineTarget for File {
    async fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len).await
    }
}

struct LineState<W> {
    target: W,
    committed_len: u64,
    poisoned: bool,
}

/// 追加写入的JSON Lines文件
///
/// 以追加模式打开目标文件（不存在则创建），从不回读已有内容。
/// 每条记录序列化后连同换行符在持锁期间一次写出，记录之间不会交错。
/// 写入中途失败时文件被截断回写入前的长度；截断也失败时输出进入
/// 损坏状态，之后的追加全部被拒绝。
pub struct JsonLinesSink<W = File> {
    state: Mutex<LineState<W>>,
}

impl JsonLinesSink<File> {
    /// 打开输出文件
    ///
    /// 父目录不存在时会被创建。
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        let committed_len = file.metadata().await?.len();

        debug!(path = %path.display(), bytes = committed_len, "Result file opened");
        Ok(Self::with_target(file, committed_len))
    }
}

impl<W: LineTarget> JsonLinesSink<W> {
    fn with_target(target: W, committed_len: u64) -> Self {
        Self {
            state: Mutex::new(LineState {
                target,
                committed_len,
                poisoned: false,
            }),
        }
    }

    /// 追加任意可序列化记录
    pub async fn write_record<T: Serialize + ?Sized>(&self, record: &T) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut state = self.state.lock().await;
        if state.poisoned {
            return Err(SinkError::Poisoned);
        }

        let written = match state.target.write_all(&line).await {
            Ok(()) => state.target.flush().await,
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => {
                state.committed_len += line.len() as u64;
                Ok(())
            }
            Err(e) => {
                let len = state.committed_len;
                if let Err(rollback) = state.target.truncate_to(len).await {
                    error!(error = %rollback, "Failed to roll back partial record, refusing further writes");
                    state.poisoned = true;
                } else {
                    warn!(error = %e, bytes = len, "Partial record rolled back");
                }
                Err(SinkError::Io(e))
            }
        }
    }
}

#[async_trait]
impl<W: LineTarget + 'static> ResultSink for JsonLinesSink<W> {
    async fn append(&self, result: &EnrichedResult) -> Result<(), SinkError> {
        self.write_record(result).await
    }
}

/// 测试用的内存输出实现（用于单元测试）
#[derive(Default)]
pub struct InMemorySink {
    records: parking_lot::Mutex<Vec<EnrichedResult>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EnrichedResult> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl ResultSink for InMemorySink {
    async fn append(&self, result: &EnrichedResult) -> Result<(), SinkError> {
        self.records.lock().push(result.clone());
        Ok(())
    }
}
