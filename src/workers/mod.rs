// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 包括生产者、抓取工作器、运行计数以及负责生命周期的工作管理器
pub mod manager;
pub mod producer;
pub mod scrape_worker;
pub mod stats;
pub mod worker;

pub use worker::Worker;
