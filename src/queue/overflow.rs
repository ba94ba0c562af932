// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::work_item::WorkItem;
use std::collections::VecDeque;

/// 溢出缓冲区
///
/// 生产者本地的FIFO缓冲，保存被满队列拒绝的条目。
/// 条目只有在成功进入队列后才会离开缓冲区，顺序与生产顺序一致。
#[derive(Debug, Default)]
pub struct OverflowBuffer {
    items: VecDeque<WorkItem>,
}

impl OverflowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加到缓冲区尾部
    pub fn push(&mut self, item: WorkItem) {
        self.items.push_back(item);
    }

    /// 取出队首条目以尝试入队
    pub fn take_front(&mut self) -> Option<WorkItem> {
        self.items.pop_front()
    }

    /// 入队失败时把条目放回队首
    pub fn restore_front(&mut self, item: WorkItem) {
        self.items.push_front(item);
    }

    pub fn front(&self) -> Option<&WorkItem> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 清空缓冲区，返回被丢弃的条目数
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }
}
