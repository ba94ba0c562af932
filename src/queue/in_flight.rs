// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// 在途条目计数器
///
/// 成功入队时加一，工作器处理完一个条目（无论结果）时减一。
/// 与“生产者已结束”一起构成流水线的完成屏障。
#[derive(Debug, Default)]
pub struct InFlightTracker {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个成功入队的条目
    pub fn dispatched(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// 记录一个处理完成的条目
    pub fn finished(&self) {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .unwrap_or(0);
        if previous == 1 {
            self.idle.notify_waiters();
        }
    }

    pub fn current(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// 等待在途条目数归零
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.current() == 0 {
                return;
            }
            notified.await;
        }
    }
}
