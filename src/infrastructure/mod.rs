// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供对外部系统的具体实现：
/// - 目录服务客户端（directory_client）：院校搜索与详情接口
/// - 输入（input）：JSON Lines输入文件的读取
/// - 指标（metrics）：Prometheus指标导出
/// - 存储（storage）：结果输出的文件与内存实现
pub mod directory_client;
pub mod input;
pub mod metrics;
pub mod storage;
