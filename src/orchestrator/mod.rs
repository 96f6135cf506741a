//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量站点处理器
//! - 管理应用生命周期（初始化、运行、关闭浏览器）
//! - 控制并发数量（Semaphore）并分批处理站点
//! - 输出全局统计信息
//!
//! ### `site_processor` - 单个站点处理器
//! - 委托 ScrapeFlow 处理一个站点
//! - 把题目追加到 JSON 存储
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Site>)
//!     ↓
//! site_processor (处理单个 Site)
//!     ↓
//! workflow::ScrapeFlow (取页 → 提取 → 提示)
//!     ↓
//! services / extractor (能力层：提示生成、JSON 存储、题目提取)
//!     ↓
//! infrastructure (基础设施：PageSource)
//! ```

pub mod batch_processor;
pub mod site_processor;

pub use batch_processor::App;
pub use site_processor::{process_site, SiteStats};
