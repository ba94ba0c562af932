// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::WorkItem;
use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// 队列错误类型
///
/// 入队被拒绝时条目原样返还给调用方，队列本身不发生任何变化。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// 队列已满
    #[error("Queue full")]
    Full(WorkItem),

    /// 队列已关闭
    #[error("Queue closed")]
    Closed(WorkItem),
}

impl QueueError {
    /// 取回被拒绝的条目
    pub fn into_inner(self) -> WorkItem {
        match self {
            QueueError::Full(item) | QueueError::Closed(item) => item,
        }
    }
}

/// 任务队列特质
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 非阻塞入队
    fn try_enqueue(&self, item: WorkItem) -> Result<(), QueueError>;

    /// 出队，队列为空时等待
    ///
    /// 队列关闭且已取空时返回 `None`。
    async fn dequeue(&self) -> Option<WorkItem>;

    /// 关闭队列，之后的入队全部被拒绝
    fn close(&self);

    /// 当前队列长度
    fn len(&self) -> usize;

    /// 队列容量
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 有界工作队列
///
/// 基于tokio有界mpsc通道，接收端由所有工作器共享。
/// 入队与关闭由同一把锁串行化，因此关闭之后不会再有条目进入通道。
pub struct BoundedWorkQueue {
    sender: mpsc::Sender<WorkItem>,
    receiver: tokio::sync::Mutex<mpsc::Receiver<WorkItem>>,
    // `true` while the queue accepts items.
    gate: Mutex<bool>,
    closed: CancellationToken,
}

impl BoundedWorkQueue {
    /// 创建指定容量的队列
    ///
    /// # 参数
    ///
    /// * `capacity` - 队列容量，必须大于0
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender,
            receiver: tokio::sync::Mutex::new(receiver),
            gate: Mutex::new(true),
            closed: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl TaskQueue for BoundedWorkQueue {
    fn try_enqueue(&self, item: WorkItem) -> Result<(), QueueError> {
        let open = self.gate.lock();
        if !*open {
            return Err(QueueError::Closed(item));
        }

        match self.sender.try_send(item) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(item)) => Err(QueueError::Full(item)),
            Err(TrySendError::Closed(item)) => Err(QueueError::Closed(item)),
        }
    }

    async fn dequeue(&self) -> Option<WorkItem> {
        let mut receiver = self.receiver.lock().await;
        tokio::select! {
            biased;
            item = receiver.recv() => item,
            // Every send happened before close, so anything left is already buffered.
            _ = self.closed.cancelled() => receiver.try_recv().ok(),
        }
    }

    fn close(&self) {
        let mut open = self.gate.lock();
        *open = false;
        self.closed.cancel();
    }

    fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

#[async_trait]
impl<T: TaskQueue + ?Sized> TaskQueue for std::sync::Arc<T> {
    fn try_enqueue(&self, item: WorkItem) -> Result<(), QueueError> {
        (**self).try_enqueue(item)
    }

    async fn dequeue(&self) -> Option<WorkItem> {
        (**self).dequeue().await
    }

    fn close(&self) {
        (**self).close()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}
