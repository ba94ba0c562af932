// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含图标抓取与名录解析用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心实体、条目源、图标提取与结果输出接口
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 提供文件输入输出、目录接口客户端与指标导出
pub mod infrastructure;

/// 队列模块
///
/// 实现有界工作队列、溢出缓冲区与在途计数
pub mod queue;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现生产者、抓取工作器和生命周期管理
pub mod workers;
