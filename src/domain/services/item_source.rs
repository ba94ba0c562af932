// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::institution::InstitutionProfile;
use crate::domain::models::work_item::WorkItem;
use std::sync::Arc;
use tracing::warn;

/// 条目源特质
///
/// 从静态输入派生出有限、可重复生成的惰性工作单元序列。
/// 除了记录被跳过的条目外没有其他副作用。
pub trait ItemSource: Send + Sync {
    /// 生成工作单元序列
    fn produce(&self) -> Box<dyn Iterator<Item = WorkItem> + Send + '_>;
}

/// 基于院校档案的条目源
///
/// 网站地址去除空白后为空的档案会被跳过。
#[derive(Debug, Clone)]
pub struct ProfileItemSource {
    profiles: Arc<Vec<InstitutionProfile>>,
}

impl ProfileItemSource {
    pub fn new(profiles: Vec<InstitutionProfile>) -> Self {
        Self {
            profiles: Arc::new(profiles),
        }
    }

    /// 源记录总数（含将被跳过的记录）
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn to_work_item(profile: &InstitutionProfile) -> Option<WorkItem> {
        if profile.website.trim().is_empty() {
            warn!(univ = %profile.nm_lemb, npsn = %profile.npsn, "URL is empty, skipping");
            return None;
        }

        Some(WorkItem::new(
            profile.npsn.clone(),
            profile.website.clone(),
            profile.nm_lemb.clone(),
        ))
    }
}

impl ItemSource for ProfileItemSource {
    fn produce(&self) -> Box<dyn Iterator<Item = WorkItem> + Send + '_> {
        Box::new(self.profiles.iter().filter_map(Self::to_work_item))
    }
}

impl ItemSource for Vec<WorkItem> {
    fn produce(&self) -> Box<dyn Iterator<Item = WorkItem> + Send + '_> {
        Box::new(self.iter().cloned())
    }
}
