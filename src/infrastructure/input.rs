// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 输入错误类型
#[derive(Error, Debug)]
pub enum InputError {
    /// 文件无法打开或读取
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 读取JSON Lines文件
///
/// 每个非空行解码为一条记录，解码失败的行记录日志后跳过，读到文件末尾结束。
pub async fn read_json_lines<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, InputError> {
    let path = path.as_ref();
    let io_err = |source| InputError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).await.map_err(io_err)?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut line_no = 0usize;
    let mut skipped = 0usize;

    while let Some(line) = lines.next_line().await.map_err(io_err)? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(line = line_no, error = %e, "Skipping malformed record");
            }
        }
    }

    info!(
        path = %path.display(),
        records = records.len(),
        skipped,
        "Input loaded"
    );

    Ok(records)
}
