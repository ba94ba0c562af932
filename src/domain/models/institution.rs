// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 院校详情
///
/// 目录服务 `detail_pt` 接口返回的院校档案，也是抓取阶段输入文件的记录格式。
/// 缺失或为 `null` 的字段按默认值处理。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionProfile {
    /// 院校编码
    #[serde(deserialize_with = "null_as_default")]
    pub npsn: String,
    /// 院校状态
    #[serde(deserialize_with = "null_as_default")]
    pub stat_sp: String,
    /// 院校名称
    #[serde(deserialize_with = "null_as_default")]
    pub nm_lemb: String,
    /// 成立日期
    #[serde(deserialize_with = "null_as_default")]
    pub tgl_berdiri: String,
    /// 设立文书编号
    #[serde(deserialize_with = "null_as_default")]
    pub sk_pendirian_sp: String,
    /// 设立文书日期
    #[serde(deserialize_with = "null_as_default")]
    pub tgl_sk_pendirian_sp: String,
    /// 街道地址
    #[serde(deserialize_with = "null_as_default")]
    pub jln: String,
    /// 所在地区
    #[serde(deserialize_with = "null_as_default")]
    pub nama_wil: String,
    /// 邮政编码
    #[serde(deserialize_with = "null_as_default")]
    pub kode_pos: String,
    /// 电话
    #[serde(deserialize_with = "null_as_default")]
    pub no_tel: String,
    /// 传真
    #[serde(deserialize_with = "null_as_default")]
    pub no_fax: String,
    /// 邮箱
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// 官方网站
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    /// 纬度
    #[serde(deserialize_with = "null_as_default")]
    pub lintang: f64,
    /// 经度
    #[serde(deserialize_with = "null_as_default")]
    pub bujur: f64,
    /// 目录服务内部ID
    #[serde(deserialize_with = "null_as_default")]
    pub id_sp: String,
    /// 占地面积
    #[serde(deserialize_with = "null_as_default")]
    pub luas_tanah: i64,
    /// 实验室数量
    #[serde(deserialize_with = "null_as_default")]
    pub laboratorium: i64,
    /// 教室数量
    #[serde(deserialize_with = "null_as_default")]
    pub ruang_kelas: i64,
    /// 图书馆数量
    #[serde(deserialize_with = "null_as_default")]
    pub perpustakaan: i64,
    /// 是否接入互联网
    #[serde(deserialize_with = "null_as_default")]
    pub internet: bool,
    /// 是否通电
    #[serde(deserialize_with = "null_as_default")]
    pub listrik: bool,
    /// 校长姓名
    #[serde(deserialize_with = "null_as_default")]
    pub nama_rektor: String,
    /// 认证历史
    #[serde(deserialize_with = "null_as_default")]
    pub akreditasi_list: Vec<Accreditation>,
}

/// 认证记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accreditation {
    /// 认证等级
    #[serde(deserialize_with = "null_as_default")]
    pub akreditasi: String,
    /// 授予日期
    #[serde(deserialize_with = "lenient_date")]
    pub tgl_akreditasi: Option<DateTime<Utc>>,
    /// 有效期至
    #[serde(deserialize_with = "lenient_date")]
    pub tgl_berlaku: Option<DateTime<Utc>>,
}

/// 院校名册条目
///
/// 解析阶段的输入，仅包含名称与编码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub nama: String,
    #[serde(deserialize_with = "null_as_default")]
    pub kode: String,
}

/// 目录服务 `hit` 接口的搜索结果
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryHit {
    #[serde(deserialize_with = "null_as_default")]
    pub dosen: Vec<HitEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub prodi: Vec<HitEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub pt: Vec<HitEntry>,
}

/// 单条搜索命中
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HitEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "website-link", deserialize_with = "null_as_default")]
    pub website_link: String,
}

// JSON `null` leaves the zero value in place, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates; empty strings map to None.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(None),
    };
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}
