//! # MCQ Scrape
//!
//! 从题库网页中抓取选择题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 核心是一个纯同步的提取引擎，外围按四层组织：
//!
//! ### 提取引擎（Extractor）
//! - `extractor/` - 输入解析好的 HTML 文档，输出 `Vec<QuestionRecord>`
//! - 不做 I/O，不返回错误，不合格的块直接跳过
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageSource` - 打开页面、等待正文、读取 HTML
//!
//! ### ② 业务能力层（Services）
//! - `HintService` - 通过 LLM 为题目生成提示并整理代码
//! - `JsonStore` - 把题目追加到 JSON 文件
//!
//! ### ③ 流程层（Workflow）
//! - `SiteCtx` - 上下文封装（站点 + 序号）
//! - `ScrapeFlow` - 流程编排（取页 → 提取 → 提示）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量站点处理器，管理浏览器和并发
//! - `orchestrator/site_processor` - 单个站点处理器，负责落盘和统计

pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extractor::{extract, extract_html, Extractor};
pub use infrastructure::PageSource;
pub use models::{EnrichedQuestion, QuestionRecord, Site};
pub use orchestrator::App;
pub use services::{HintService, JsonStore};
pub use workflow::{ProcessResult, ScrapeFlow, SiteCtx};
