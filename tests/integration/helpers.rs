// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use favicrawl::domain::models::institution::InstitutionProfile;
use favicrawl::domain::models::work_item::EnrichedResult;
use std::io::Write;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 挂载带有给定图标链接的首页
pub async fn mount_homepage(server: &MockServer, route: &str, icons: &[&str]) {
    let links: String = icons
        .iter()
        .map(|href| format!(r#"<link rel="icon" href="{}">"#, href))
        .collect();
    let body = format!("<html><head><title>Kampus</title>{}</head><body></body></html>", links);

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn profile(npsn: &str, name: &str, website: &str) -> InstitutionProfile {
    InstitutionProfile {
        npsn: npsn.to_string(),
        nm_lemb: name.to_string(),
        website: website.to_string(),
        ..Default::default()
    }
}

pub fn write_profiles(path: &Path, profiles: &[InstitutionProfile]) {
    let mut file = std::fs::File::create(path).unwrap();
    for profile in profiles {
        writeln!(file, "{}", serde_json::to_string(profile).unwrap()).unwrap();
    }
}

pub fn read_results(path: &Path) -> Vec<EnrichedResult> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
