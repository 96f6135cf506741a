use serde::{Deserialize, Serialize};

/// 待抓取的题目页面
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub url: String,
    pub max_questions: usize,
    pub category: String,
}

/// 站点列表文件（TOML 中的 `[[sites]]`）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteList {
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (分类: {}, 上限: {})",
            self.url, self.category, self.max_questions
        )
    }
}
