// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// 每个运行模式对应一个用例，负责装配输入、输出与工作组件
pub mod crawl_favicons;
pub mod resolve_institutions;
