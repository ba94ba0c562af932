// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::institution::{DirectoryHit, InstitutionProfile};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 目录服务档案链接的路径前缀
pub const PROFILE_PATH_PREFIX: &str = "/data_pt/";

/// 目录服务错误类型
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// 请求失败
    #[error("Directory request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// 响应无法解码
    #[error("Malformed directory response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// 未找到匹配的院校
    #[error("{0} not found!")]
    NotFound(String),

    /// 命中项缺少档案链接
    #[error("Directory hit for {0} has no profile link")]
    MalformedHit(String),
}

/// 院校目录服务客户端
///
/// 先按院校编码搜索得到档案ID，再按档案ID获取院校详情。
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// 创建新的目录服务客户端
    ///
    /// # 参数
    ///
    /// * `base_url` - 服务根地址，例如 `https://api-frontend.kemdikbud.go.id`
    /// * `timeout` - 单次请求超时时间
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 按院校编码查找档案ID
    ///
    /// 取第一个院校命中项的链接，并去掉其中所有的 `/data_pt/` 前缀。
    /// 去掉前缀后为空的链接视为响应格式错误。
    pub async fn lookup_profile_id(&self, code: &str, name: &str) -> Result<String, DirectoryError> {
        let url = format!("{}/hit/{}", self.base_url, urlencoding::encode(code));
        let hits: DirectoryHit = self.get_json(&url).await?;

        let first = hits
            .pt
            .first()
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;

        let profile_id = first.website_link.replace(PROFILE_PATH_PREFIX, "");
        if profile_id.trim().is_empty() {
            return Err(DirectoryError::MalformedHit(name.to_string()));
        }
        Ok(profile_id)
    }

    /// 按档案ID获取院校详情
    ///
    /// 档案ID原样拼入路径，与目录服务返回的链接保持一致。
    pub async fn fetch_profile(&self, profile_id: &str) -> Result<InstitutionProfile, DirectoryError> {
        let url = format!("{}/v2/detail_pt/{}", self.base_url, profile_id);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DirectoryError> {
        debug!(url, "Directory request");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_json::from_slice(&body).map_err(|source| DirectoryError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
