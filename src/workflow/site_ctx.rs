//! 站点处理上下文
//!
//! 封装"我正在处理第几个站点、抓到多少道为止"这一信息

use std::fmt::Display;

use crate::models::Site;

/// 站点处理上下文
#[derive(Debug, Clone)]
pub struct SiteCtx {
    pub site: Site,

    /// 站点序号（从1开始，仅用于日志显示）
    pub site_index: usize,
}

impl SiteCtx {
    pub fn new(site: Site, site_index: usize) -> Self {
        Self { site, site_index }
    }

    pub fn url(&self) -> &str {
        &self.site.url
    }

    pub fn category(&self) -> &str {
        &self.site.category
    }
}

impl Display for SiteCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[站点 {}]", self.site_index)
    }
}
