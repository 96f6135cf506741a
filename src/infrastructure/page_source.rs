//! 页面源 - 基础设施层
//!
//! 持有一个打开的 Page，只暴露"读取渲染后 HTML"的能力

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use tracing::{debug, warn};

use crate::error::BrowserError;

/// 正文容器出现即认为页面可读
pub const CONTENT_READY_SELECTOR: &str = ".entry-content";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 页面源
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 等待正文渲染完成
/// - 不认识题目结构
pub struct PageSource {
    page: Page,
    url: String,
}

impl PageSource {
    /// 打开页面并等待正文容器出现
    ///
    /// 超时会关闭页面并返回 [`BrowserError::ContentTimeout`]
    pub async fn open(browser: &Browser, url: &str, timeout: Duration) -> Result<Self> {
        debug!("打开页面: {}", url);
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| BrowserError::navigation_failed(url, e))?;

        let source = Self {
            page,
            url: url.to_string(),
        };

        if tokio::time::timeout(timeout, source.wait_for_content()).await.is_err() {
            source.close().await;
            return Err(BrowserError::ContentTimeout {
                url: url.to_string(),
                selector: CONTENT_READY_SELECTOR.to_string(),
                timeout_secs: timeout.as_secs(),
            }
            .into());
        }

        debug!("✓ 正文已加载: {}", url);
        Ok(source)
    }

    async fn wait_for_content(&self) {
        while self.page.find_element(CONTENT_READY_SELECTOR).await.is_err() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// 获取渲染后的完整 HTML
    pub async fn html(&self) -> Result<String> {
        let html = self
            .page
            .content()
            .await
            .map_err(|e| BrowserError::navigation_failed(&self.url, e))?;
        debug!("页面 HTML 长度: {} 字节", html.len());
        Ok(html)
    }

    /// 关闭页面；失败只记录警告
    pub async fn close(self) {
        if let Err(e) = self.page.close().await {
            warn!("关闭页面失败 ({}): {}", self.url, e);
        }
    }
}
