// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 默认补全的URL协议前缀
pub const DEFAULT_SCHEME: &str = "https://";

/// 规范化目标地址
///
/// 若地址不以 `http://` 或 `https://`（不区分大小写）开头，则去除首尾空白并补全 `https://`。
/// 已带协议的地址原样返回，因此该函数是幂等的。
pub fn normalize_url(raw: &str) -> String {
    if has_scheme(raw) {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        return trimmed.to_string();
    }

    format!("{}{}", DEFAULT_SCHEME, trimmed)
}

fn has_scheme(s: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        s.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
