//! 单个站点处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **流程调度**：委托 `ScrapeFlow` 完成取页、提取、补充提示
//! 2. **落盘**：把本站点的题目追加到 JSON 存储
//! 3. **统计输出**：记录题目数和提示数

use anyhow::Result;
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::services::JsonStore;
use crate::workflow::{ProcessResult, ScrapeFlow, SiteCtx};

/// 单个站点的处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SiteStats {
    pub questions: usize,
    pub hints: usize,
}

/// 处理单个站点
///
/// 页面中没有题目不算失败，只返回空统计
pub async fn process_site(
    browser: &Browser,
    flow: &ScrapeFlow,
    store: &JsonStore,
    ctx: &SiteCtx,
) -> Result<SiteStats> {
    log_site_start(ctx);

    let outcome = flow.run(browser, ctx).await?;
    if outcome.result == ProcessResult::Empty {
        warn!("{} ⚠️ 跳过写入：没有题目", ctx);
        return Ok(SiteStats::default());
    }

    let stats = SiteStats {
        questions: outcome.questions.len(),
        hints: outcome.hint_count(),
    };
    store.append(&outcome.questions).await?;

    log_site_complete(ctx, &stats);
    Ok(stats)
}

// ========== 日志辅助函数 ==========

fn log_site_start(ctx: &SiteCtx) {
    info!("{} 开始处理", ctx);
    info!("{} 分类: {}", ctx, ctx.category());
    info!("{} 题目上限: {}", ctx, ctx.site.max_questions);
}

fn log_site_complete(ctx: &SiteCtx, stats: &SiteStats) {
    info!(
        "{} 题目统计: 抓取 {}, 生成提示 {}",
        ctx, stats.questions, stats.hints
    );
    info!("{} ✅ 站点处理完成", ctx);
}
