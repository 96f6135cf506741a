//! 批量站点处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量站点的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志抬头、获取浏览器、创建流程与存储
//! 2. **批量加载**：从站点文件加载 `Vec<Site>`
//! 3. **并发控制**：使用 Semaphore 限制同时抓取的站点数
//! 4. **分批处理**：每批完成并等待间隔后再开始下一批
//! 5. **全局统计**：汇总所有站点的处理结果

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::models::{self, Site};
use crate::orchestrator::site_processor::{self, SiteStats};
use crate::services::JsonStore;
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_sites_loaded, log_startup,
    print_final_stats,
};
use crate::utils::RunStats;
use crate::workflow::{ScrapeFlow, SiteCtx};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Arc<Browser>,
    flow: Arc<ScrapeFlow>,
    store: Arc<JsonStore>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(config.max_concurrent_sites, config.enable_hints);

        let browser = browser::acquire_browser(&config).await?;

        Ok(Self {
            flow: Arc::new(ScrapeFlow::new(&config)),
            store: Arc::new(JsonStore::new(&config.output_json_file)),
            browser: Arc::new(browser),
            config,
        })
    }

    /// 从站点文件加载站点并全部处理
    pub async fn run(&self) -> Result<RunStats> {
        info!("📁 正在加载站点列表: {}", self.config.sites_file);
        let sites = models::load_sites(Path::new(&self.config.sites_file)).await?;
        self.run_sites(sites).await
    }

    /// 处理给定的站点列表
    pub async fn run_sites(&self, sites: Vec<Site>) -> Result<RunStats> {
        if sites.is_empty() {
            warn!("⚠️ 没有待抓取的站点，程序结束");
            return Ok(RunStats::default());
        }

        log_sites_loaded(sites.len(), self.config.max_concurrent_sites);

        let stats = self.process_all_sites(sites).await?;
        print_final_stats(
            &stats,
            &self.config.output_log_file,
            &self.config.output_json_file,
        );
        Ok(stats)
    }

    /// 关闭自己启动的浏览器；连接模式下保留用户的浏览器
    pub async fn shutdown(self) {
        if self.config.browser_debug_port.is_some() {
            return;
        }
        match Arc::try_unwrap(self.browser) {
            Ok(mut browser) => {
                if let Err(e) = browser.close().await {
                    warn!("关闭浏览器失败: {}", e);
                }
                let _ = browser.wait().await;
            }
            Err(_) => warn!("浏览器仍被占用，跳过关闭"),
        }
    }

    async fn process_all_sites(&self, sites: Vec<Site>) -> Result<RunStats> {
        let batch_size = self.config.max_concurrent_sites;
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = sites.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = RunStats {
            sites_total: total,
            ..Default::default()
        };

        for batch_start in (0..total).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(total);
            let batch_num = batch_start / batch_size + 1;

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total);

            let batch = self
                .process_batch(&sites[batch_start..batch_end], batch_start, semaphore.clone())
                .await?;

            stats.sites_succeeded += batch.succeeded;
            stats.sites_failed += batch.failed;
            stats.questions += batch.stats.questions;
            stats.hints += batch.stats.hints;

            log_batch_complete(batch_num, batch.succeeded, batch.succeeded + batch.failed);

            if batch_end < total && self.config.site_delay_secs > 0 {
                info!("⏳ 等待 {} 秒后处理下一批", self.config.site_delay_secs);
                tokio::time::sleep(Duration::from_secs(self.config.site_delay_secs)).await;
            }
        }

        Ok(stats)
    }

    async fn process_batch(
        &self,
        sites: &[Site],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut handles = Vec::new();

        for (idx, site) in sites.iter().enumerate() {
            let ctx = SiteCtx::new(site.clone(), batch_start + idx + 1);
            let permit = semaphore.clone().acquire_owned().await?;

            let browser = self.browser.clone();
            let flow = self.flow.clone();
            let store = self.store.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = site_processor::process_site(&browser, &flow, &store, &ctx).await;
                if let Err(e) = &result {
                    error!("{} ❌ 处理过程中发生错误: {:#}", ctx, e);
                }
                result
            });
            handles.push((batch_start + idx + 1, handle));
        }

        let mut result = BatchResult::default();
        for (site_index, handle) in handles {
            match handle.await {
                Ok(Ok(stats)) => {
                    result.succeeded += 1;
                    result.stats.questions += stats.questions;
                    result.stats.hints += stats.hints;
                }
                Ok(Err(_)) => result.failed += 1,
                Err(e) => {
                    error!("[站点 {}] 任务执行失败: {}", site_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    succeeded: usize,
    failed: usize,
    stats: SiteStats,
}
