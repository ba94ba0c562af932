// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};
use std::sync::OnceLock;

/// 图标链接提取服务
///
/// 纯函数式转换：HTML文本 → 图标链接列表。
pub struct FaviconExtractor;

fn head_link_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("head link").expect("static selector is valid"))
}

impl FaviconExtractor {
    /// 提取图标链接
    ///
    /// 只考虑 `head` 内的 `link` 元素，`rel` 去除空白后必须等于 `icon`，
    /// 没有 `href` 的元素被忽略。链接按文档顺序原样返回。
    pub fn extract(html_content: &str) -> Vec<String> {
        let document = Html::parse_document(html_content);

        document
            .select(head_link_selector())
            .filter(|element| {
                element
                    .value()
                    .attr("rel")
                    .is_some_and(|rel| rel.trim() == "icon")
            })
            .filter_map(|element| element.value().attr("href").map(|href| href.to_string()))
            .collect()
    }
}

#[cfg(test)]
#[path = "favicon_extractor_test.rs"]
mod tests;
