// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理运行模式、流水线、抓取、目录接口和指标导出等配置
pub mod settings;
