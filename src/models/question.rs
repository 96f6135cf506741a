use serde::{Deserialize, Serialize};

/// 从页面提取出的一道选择题
///
/// 由提取引擎创建后只读交给调用方；补充提示等信息时包装成 [`EnrichedQuestion`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    /// 题干与选项之间的附加代码
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// 补充了提示与分类的题目，写入 JSON 的最终形态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedQuestion {
    #[serde(flatten)]
    pub record: QuestionRecord,
    #[serde(default)]
    pub hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EnrichedQuestion {
    /// 未经 LLM 处理的题目：提示为空
    pub fn plain(record: QuestionRecord, category: Option<&str>) -> Self {
        Self {
            record,
            hint: String::new(),
            category: category.map(str::to_string),
        }
    }
}

impl std::fmt::Display for QuestionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断题干以便日志显示（最多80个字符）
        let preview = if self.question.chars().count() > 80 {
            self.question.chars().take(80).collect::<String>() + "..."
        } else {
            self.question.clone()
        };
        write!(f, "{} [选项: {}, 答案: {}]", preview, self.options.len(), self.answer)
    }
}
