// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含系统的核心业务实体：
/// - 院校（institution）：目录服务返回的院校档案和名册条目
/// - 工作单元（work_item）：抓取流水线中的工作单元和富化结果
pub mod institution;
pub mod work_item;
