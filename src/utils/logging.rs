//! 日志工具模块
//!
//! 负责订阅器初始化，以及启动、批次和统计信息的格式化输出

use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 订阅器
///
/// 优先读取 `RUST_LOG`；未设置时按 `verbose` 选择 debug 或 info 级别。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mcq_scrape={default_level},warn")));

    // 测试中可能被多次调用，重复初始化直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件，写入带时间戳的抬头
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目抓取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize, hints_enabled: bool) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 选择题抓取模式");
    info!("📊 最大并发站点数: {}", max_concurrent);
    info!(
        "💡 LLM 提示生成: {}",
        if hints_enabled { "已启用" } else { "已关闭" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录站点加载信息
pub fn log_sites_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待抓取的站点", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
}

/// 记录批次开始信息
///
/// `start` 与 `end` 为本批站点的编号（从 1 开始）
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("🌐 本批站点: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &RunStats, log_file_path: &str, output_path: &str) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功站点: {}/{}", stats.sites_succeeded, stats.sites_total);
    info!("❌ 失败站点: {}", stats.sites_failed);
    info!("📝 抓取题目: {}", stats.questions);
    info!("💡 生成提示: {}", stats.hints);
    info!("{}", "=".repeat(60));
    info!("题目已保存至: {}", output_path);
    info!("日志已保存至: {}", log_file_path);
}

/// 一次运行的汇总数据
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub sites_total: usize,
    pub sites_succeeded: usize,
    pub sites_failed: usize,
    pub questions: usize,
    pub hints: usize,
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text("题目内容很长", 2), "题目...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn log_file_starts_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();
        init_log_file(path).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("题目抓取日志"));
    }
}
