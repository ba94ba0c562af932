// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层的输出抽象，具体实现由基础设施层提供：
/// - 结果输出（result_sink）：富化结果的追加写入
pub mod result_sink;
