// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供有界工作队列、生产者溢出缓冲区和在途条目计数
pub mod in_flight;
pub mod overflow;
pub mod work_queue;
