// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::domain::models::institution::RosterEntry;
use crate::infrastructure::directory_client::{DirectoryClient, DirectoryError};
use crate::infrastructure::storage::JsonLinesSink;

/// 名录解析的汇总报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// 名录条目总数
    pub total: usize,
    /// 续传时跳过的条目数
    pub skipped: usize,
    /// 成功写入详情的条目数
    pub resolved: usize,
    /// 目录中不存在的条目数
    pub not_found: usize,
    /// 请求、解码或写入失败的条目数
    pub failed: usize,
    /// 是否因取消而提前结束
    pub cancelled: bool,
}

enum EntryOutcome {
    Resolved,
    NotFound,
    Failed,
}

/// 高校名录解析用例
///
/// 按名录顺序逐个查询目录接口，得到档案ID后获取详情并追加写入输出文件。
/// 单个条目失败只记录日志，不影响后续条目。
pub struct ResolveInstitutionsUseCase {
    client: DirectoryClient,
    sink: JsonLinesSink,
    resume_from: Option<String>,
}

impl ResolveInstitutionsUseCase {
    pub fn new(client: DirectoryClient, sink: JsonLinesSink, resume_from: Option<String>) -> Self {
        Self {
            client,
            sink,
            resume_from,
        }
    }

    pub async fn execute(&self, roster: &[RosterEntry], shutdown: &CancellationToken) -> ResolveReport {
        let mut report = ResolveReport {
            total: roster.len(),
            ..Default::default()
        };

        let start = match &self.resume_from {
            Some(code) => match roster.iter().position(|entry| &entry.kode == code) {
                Some(index) => index,
                None => {
                    warn!(resume_from = %code, "Resume code not present in roster, nothing to do");
                    roster.len()
                }
            },
            None => 0,
        };
        report.skipped = start;

        let pending = &roster[start..];
        for (index, entry) in pending.iter().enumerate() {
            if shutdown.is_cancelled() {
                warn!(remaining = pending.len() - index, "Resolve cancelled");
                report.cancelled = true;
                break;
            }

            match self.resolve_entry(entry).await {
                EntryOutcome::Resolved => report.resolved += 1,
                EntryOutcome::NotFound => report.not_found += 1,
                EntryOutcome::Failed => report.failed += 1,
            }
        }

        info!(
            total = report.total,
            resolved = report.resolved,
            not_found = report.not_found,
            failed = report.failed,
            "Resolve finished"
        );
        report
    }

    #[instrument(skip(self, entry), fields(univ = %entry.nama, univ_code = %entry.kode))]
    async fn resolve_entry(&self, entry: &RosterEntry) -> EntryOutcome {
        let profile_id = match self.client.lookup_profile_id(&entry.kode, &entry.nama).await {
            Ok(id) => id,
            Err(e @ DirectoryError::NotFound(_)) => {
                warn!(error = %e, "Institution not listed");
                return EntryOutcome::NotFound;
            }
            Err(e) => {
                error!(error = %e, "Lookup failed");
                return EntryOutcome::Failed;
            }
        };

        info!(dikti_code = %profile_id, "Visiting {}", entry.nama);

        let profile = match self.client.fetch_profile(&profile_id).await {
            Ok(profile) => profile,
            Err(e) => {
                error!(error = %e, "Detail request failed");
                return EntryOutcome::Failed;
            }
        };
        info!(website = %profile.website, "{} website", entry.nama);

        if let Err(e) = self.sink.write_record(&profile).await {
            error!(error = %e, "Failed to write profile");
            return EntryOutcome::Failed;
        }

        EntryOutcome::Resolved
    }
}
