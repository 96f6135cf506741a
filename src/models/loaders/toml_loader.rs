use crate::models::site::{Site, SiteList};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载站点列表
pub async fn load_sites(toml_file_path: &Path) -> Result<Vec<Site>> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取站点文件: {}", toml_file_path.display()))?;

    let list = parse_sites(&content)
        .with_context(|| format!("无法解析站点文件: {}", toml_file_path.display()))?;

    tracing::info!(
        "从 {} 加载了 {} 个站点",
        toml_file_path.file_name().unwrap_or_default().to_string_lossy(),
        list.len()
    );

    Ok(list)
}

/// 解析站点列表，丢弃上限为 0 或 URL 为空的条目
pub fn parse_sites(content: &str) -> Result<Vec<Site>> {
    let list: SiteList = toml::from_str(content)?;
    let mut sites = Vec::with_capacity(list.sites.len());
    for site in list.sites {
        if site.url.trim().is_empty() || site.max_questions == 0 {
            tracing::warn!("忽略无效站点配置: {:?}", site);
            continue;
        }
        sites.push(site);
    }
    Ok(sites)
}
