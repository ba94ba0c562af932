// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 图标提取服务（favicon_extractor）：从HTML文档头部提取图标链接
/// - 条目源（item_source）：把院校档案转换为抓取工作单元
pub mod favicon_extractor;
pub mod item_source;
