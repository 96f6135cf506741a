//! 提示生成服务 - 业务能力层
//!
//! 只负责"为一道题生成提示"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::models::{EnrichedQuestion, QuestionRecord};
use crate::utils::truncate_text;

const CODE_DETECTED: &str = "[Code Detected]";
const FORMATTED_CODE: &str = "[Formatted Code]";
const HINT: &str = "[Hint]";

/// 单道题最多调用次数
pub const MAX_ATTEMPTS: usize = 3;

static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^.*```.*\n?").expect("valid fence regex"));
static ESCAPED_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(.)").expect("valid escape regex"));

const SYSTEM_PROMPT: &str = "You help students practise multiple-choice questions. \
    You write short hints that nudge without revealing the answer, and you tidy up code snippets.";

/// 一次提示生成的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintOutcome {
    pub hint: String,
    /// 模型识别出代码时返回的格式化代码
    pub formatted_code: Option<String>,
}

/// 提示生成服务
///
/// 职责：
/// - 调用 LLM 为单道题生成提示
/// - 让 LLM 顺带整理题目中的代码片段
/// - 失败时重试，重试用尽交给调用方降级
pub struct HintService {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_tokens: u32,
    temperature: f32,
}

impl HintService {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
        }
    }

    /// 通用的 LLM 调用函数，返回去掉首尾空白的响应文本
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String> {
        debug!(
            "调用 LLM API，模型: {}，消息长度: {} 字符",
            self.model_name,
            user_message.len()
        );

        let mut messages = Vec::new();
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::api_failed(&self.model_name, e))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 为一道题生成提示，最多尝试 [`MAX_ATTEMPTS`] 次
    pub async fn generate_hint(&self, record: &QuestionRecord) -> Result<HintOutcome> {
        let prompt = build_hint_prompt(record);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.send_to_llm(&prompt, Some(SYSTEM_PROMPT)).await {
                Ok(response) => {
                    debug!("LLM 响应: {}", truncate_text(&response, 120));
                    return Ok(parse_hint_response(&response));
                }
                Err(e) => {
                    warn!(
                        "⚠️ 提示生成失败 (第 {}/{} 次): {}",
                        attempt, MAX_ATTEMPTS, e
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
                    }
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
        }
        .into())
    }

    /// 为一批题目补充提示
    ///
    /// 单道题失败时提示留空，不影响其余题目
    pub async fn enrich(
        &self,
        records: Vec<QuestionRecord>,
        category: Option<&str>,
    ) -> Vec<EnrichedQuestion> {
        let total = records.len();
        let mut enriched = Vec::with_capacity(total);

        for (i, record) in records.into_iter().enumerate() {
            match self.generate_hint(&record).await {
                Ok(outcome) => {
                    debug!("✓ 题目 {}/{} 已生成提示", i + 1, total);
                    enriched.push(apply_outcome(record, outcome, category));
                }
                Err(e) => {
                    warn!("❌ 题目 {}/{} 提示生成失败: {}", i + 1, total, e);
                    enriched.push(EnrichedQuestion::plain(record, category));
                }
            }
        }

        enriched
    }
}

/// 把生成结果合并进题目；模型给出的代码覆盖提取到的附加信息
pub fn apply_outcome(
    mut record: QuestionRecord,
    outcome: HintOutcome,
    category: Option<&str>,
) -> EnrichedQuestion {
    if let Some(code) = outcome.formatted_code {
        record.additional_info = Some(code);
    }
    EnrichedQuestion {
        record,
        hint: outcome.hint,
        category: category.map(str::to_string),
    }
}

/// 构建提示生成的用户消息
pub fn build_hint_prompt(record: &QuestionRecord) -> String {
    format!(
        r#"This prompt has two tasks:
1. Detect whether the input contains a code snippet. If so, identify the programming language and format it properly.
2. Generate a hint that provides subtle guidance without revealing the answer. The hint should read like a natural clue rather than an explicit instruction.

### Formatting Instructions:
- If a code snippet is detected, format it the way a professional developer would, with proper indentation and spacing.
- DO NOT wrap the code in quotes, backticks, or code blocks.
- DO NOT put labels such as "Formatted Code" or "Language:" before the code.
- ONLY return the code, exactly as it would be written in an IDE.

### Hint Generation Instructions:
- Offer a nudge in the right direction rather than instructing the user.
- Do not lead the user straight to the answer; help them reason about the question and its options.
- Do not start the hint with "consider", "think", "remember", or any similar directive.
- Do not include "hint:" or any other prefix.

### Input
Question: {question}
Options: {options:?}
Answer: {answer}
Explanation: {explanation}
Additional Info: {additional_info}

Respond in the following format:
{CODE_DETECTED} (Yes/No)

{FORMATTED_CODE}
<the formatted code exactly as it should be written, without quotes>

{HINT}
<generated hint here>"#,
        question = record.question,
        options = record.options,
        answer = record.answer,
        explanation = record.explanation,
        additional_info = record.additional_info.as_deref().unwrap_or(""),
    )
}

/// 解析 LLM 的分段响应
///
/// 没有 `[Code Detected]` 段时视为无法解析，提示留空
pub fn parse_hint_response(response: &str) -> HintOutcome {
    let response = response.trim();
    if !response.contains(CODE_DETECTED) {
        warn!("LLM 响应缺少 {} 段，忽略", CODE_DETECTED);
        return HintOutcome::default();
    }

    let hint_after_marker = |text: &str| {
        text.split_once(HINT)
            .map(|(_, hint)| hint.trim().to_string())
    };

    match response.split_once(FORMATTED_CODE) {
        Some((detected, rest)) if detected.contains("Yes") => {
            let (code, hint) = match rest.split_once(HINT) {
                Some((code, hint)) => (code, hint.trim().to_string()),
                None => (rest, String::new()),
            };
            let code = post_format_code(code.trim());
            HintOutcome {
                hint,
                formatted_code: (!code.trim().is_empty()).then(|| code.trim().to_string()),
            }
        }
        _ => HintOutcome {
            hint: hint_after_marker(response).unwrap_or_else(|| response.to_string()),
            formatted_code: None,
        },
    }
}

/// 去掉代码围栏所在的行并还原反斜杠转义
pub fn post_format_code(code: &str) -> String {
    let without_fences = FENCE_LINE.replace_all(code, "");
    ESCAPED_CHAR.replace_all(&without_fences, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> QuestionRecord {
        QuestionRecord {
            question: "What is the output of this C code?".to_string(),
            options: vec!["0".to_string(), "1".to_string()],
            answer: "b".to_string(),
            explanation: "x is incremented once.".to_string(),
            subtopic: None,
            additional_info: Some("int x = 0; x++; printf(\"%d\", x);".to_string()),
        }
    }

    #[test]
    fn prompt_carries_record_fields() {
        let prompt = build_hint_prompt(&record());
        assert!(prompt.contains("Question: What is the output of this C code?"));
        assert!(prompt.contains(r#"Options: ["0", "1"]"#));
        assert!(prompt.contains("Additional Info: int x = 0;"));
        assert!(prompt.contains("[Code Detected] (Yes/No)"));
    }

    #[test]
    fn parses_code_and_hint() {
        let response = concat!(
            "[Code Detected] Yes\n\n",
            "[Formatted Code]\n```c\nint x = 0;\nx++;\n```\n\n",
            "[Hint]\nLook at how often x changes."
        );
        let outcome = parse_hint_response(response);
        assert_eq!(outcome.formatted_code.as_deref(), Some("int x = 0;\nx++;"));
        assert_eq!(outcome.hint, "Look at how often x changes.");
    }

    #[test]
    fn code_is_dropped_when_not_detected() {
        let response = "[Code Detected] No\n\n[Formatted Code]\n\n[Hint]\nPhases happen in order.";
        let outcome = parse_hint_response(response);
        assert_eq!(outcome.formatted_code, None);
        assert_eq!(outcome.hint, "Phases happen in order.");
    }

    #[test]
    fn missing_hint_marker_keeps_whole_response() {
        let response = "[Code Detected] No\nThe order of phases matters.";
        let outcome = parse_hint_response(response);
        assert_eq!(outcome.hint, response);
    }

    #[test]
    fn unstructured_response_yields_empty_outcome() {
        assert_eq!(parse_hint_response("just some text"), HintOutcome::default());
    }

    #[test]
    fn post_format_removes_fences_and_escapes() {
        let code = "```java\nSystem.out.println(\\\"hi\\\");\n```";
        assert_eq!(post_format_code(code), "System.out.println(\"hi\");\n");
    }

    #[test]
    fn formatted_code_overrides_additional_info() {
        let outcome = HintOutcome {
            hint: "h".to_string(),
            formatted_code: Some("int x = 0;".to_string()),
        };
        let enriched = apply_outcome(record(), outcome, Some("C Programming"));
        assert_eq!(enriched.record.additional_info.as_deref(), Some("int x = 0;"));
        assert_eq!(enriched.category.as_deref(), Some("C Programming"));

        let kept = apply_outcome(record(), HintOutcome::default(), None);
        assert_eq!(kept.record.additional_info, record().additional_info);
        assert_eq!(kept.hint, "");
    }

    /// 需要 LLM_API_KEY 环境变量
    #[tokio::test]
    #[ignore]
    async fn test_generate_hint_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let service = HintService::new(&config);

        match service.generate_hint(&record()).await {
            Ok(outcome) => {
                println!("提示: {}", outcome.hint);
                println!("代码: {:?}", outcome.formatted_code);
                assert!(!outcome.hint.is_empty());
            }
            Err(e) => panic!("提示生成失败: {}", e),
        }
    }
}
