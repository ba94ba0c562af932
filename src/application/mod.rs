// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含图标抓取与名录解析两个用例，将领域逻辑与基础设施装配在一起
pub mod usecases;
