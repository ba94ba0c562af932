// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 抓取工作单元
///
/// 表示一个待访问的院校网站。由条目源创建，创建后不可变，
/// 在一次运行中只会被一个工作器消费一次，失败也不会重新入队。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// 院校名称
    #[serde(rename = "nama")]
    pub name: String,
    /// 院校编码，在一次运行中唯一
    #[serde(rename = "kode")]
    pub identifier: String,
    /// 目标网站地址，可能缺少协议前缀
    pub website: String,
}

impl WorkItem {
    pub fn new(
        identifier: impl Into<String>,
        website: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            website: website.into(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}

/// 富化结果
///
/// 工作单元加上从网站首页提取到的图标链接，写入结果文件后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedResult {
    /// 原始工作单元，`website` 为规范化后的地址
    #[serde(flatten)]
    pub item: WorkItem,
    /// 按文档顺序提取到的图标链接
    pub icon_urls: Vec<String>,
}

impl EnrichedResult {
    pub fn new(item: WorkItem, icon_urls: Vec<String>) -> Self {
        Self { item, icon_urls }
    }
}
