// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取引擎模块
///
/// 定义抓取引擎接口，并提供基于reqwest的实现
pub mod reqwest_engine;
pub mod traits;
