//! 站点抓取流程 - 流程层
//!
//! 核心职责：定义"一个站点"的完整处理流程
//!
//! 流程顺序：
//! 1. 随机等待 → 打开页面 → 读取 HTML → 关闭页面
//! 2. 提取题目
//! 3. 生成提示（可选）

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use rand::Rng;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::extractor;
use crate::infrastructure::PageSource;
use crate::models::{EnrichedQuestion, QuestionRecord};
use crate::services::HintService;
use crate::utils::truncate_text;
use crate::workflow::site_ctx::SiteCtx;

/// 站点处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessResult {
    /// 抓到了题目
    Success,
    /// 页面正常但没有可用的题目
    Empty,
}

/// 一个站点的产出
#[derive(Debug, Clone)]
pub struct SiteOutcome {
    pub result: ProcessResult,
    pub questions: Vec<EnrichedQuestion>,
}

impl SiteOutcome {
    pub fn hint_count(&self) -> usize {
        self.questions.iter().filter(|q| !q.hint.is_empty()).count()
    }
}

/// 站点抓取流程
///
/// - 编排取页、提取、补充提示
/// - 不持有浏览器，只借用
/// - 不负责落盘
pub struct ScrapeFlow {
    hint_service: Option<HintService>,
    page_load_timeout: Duration,
    min_delay_ms: u64,
    max_delay_ms: u64,
    verbose_logging: bool,
}

impl ScrapeFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            hint_service: config.enable_hints.then(|| HintService::new(config)),
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            min_delay_ms: config.min_request_delay_ms,
            max_delay_ms: config.max_request_delay_ms,
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, browser: &Browser, ctx: &SiteCtx) -> Result<SiteOutcome> {
        info!("{} 🌐 {}", ctx, ctx.site);

        let html = self.fetch_html(browser, ctx).await?;

        // Html 不是 Send，解析和提取必须在同一个同步调用里完成
        let records = extractor::extract_html(&html, ctx.site.max_questions);
        if records.is_empty() {
            error!("{} ❌ 页面中没有提取到题目: {}", ctx, ctx.url());
            return Ok(SiteOutcome {
                result: ProcessResult::Empty,
                questions: Vec::new(),
            });
        }
        info!(
            "{} ✓ 提取到 {} 道题目（上限 {}）",
            ctx,
            records.len(),
            ctx.site.max_questions
        );
        if self.verbose_logging {
            self.log_records(ctx, &records);
        }

        let questions = match &self.hint_service {
            Some(service) => {
                info!("{} 💡 正在生成提示...", ctx);
                service.enrich(records, Some(ctx.category())).await
            }
            None => records
                .into_iter()
                .map(|r| EnrichedQuestion::plain(r, Some(ctx.category())))
                .collect(),
        };

        Ok(SiteOutcome {
            result: ProcessResult::Success,
            questions,
        })
    }

    /// 打开页面读取 HTML，无论成功与否都关闭页面
    async fn fetch_html(&self, browser: &Browser, ctx: &SiteCtx) -> Result<String> {
        let delay = self.request_delay();
        debug!("{} 等待 {} 毫秒后打开页面", ctx, delay.as_millis());
        tokio::time::sleep(delay).await;

        let source = PageSource::open(browser, ctx.url(), self.page_load_timeout).await?;
        let html = source.html().await;
        source.close().await;
        html
    }

    fn request_delay(&self) -> Duration {
        let ms = if self.max_delay_ms > self.min_delay_ms {
            rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms)
        } else {
            self.min_delay_ms
        };
        Duration::from_millis(ms)
    }

    fn log_records(&self, ctx: &SiteCtx, records: &[QuestionRecord]) {
        for (i, record) in records.iter().enumerate() {
            debug!("{}   {}. {}", ctx, i + 1, truncate_text(&record.to_string(), 120));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(min: u64, max: u64) -> ScrapeFlow {
        let config = Config {
            enable_hints: false,
            min_request_delay_ms: min,
            max_request_delay_ms: max,
            ..Config::default()
        };
        ScrapeFlow::new(&config)
    }

    #[test]
    fn request_delay_stays_in_range() {
        let flow = flow(100, 200);
        for _ in 0..20 {
            let ms = flow.request_delay().as_millis();
            assert!((100..=200).contains(&ms));
        }
    }

    #[test]
    fn fixed_delay_when_range_is_empty() {
        assert_eq!(flow(50, 50).request_delay(), Duration::from_millis(50));
    }

    #[test]
    fn hints_disabled_means_no_service() {
        assert!(flow(0, 0).hint_service.is_none());
    }
}
