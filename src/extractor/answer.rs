//! 答案与解析
//!
//! 块内的"查看答案"按钮带一个 id，对应的答案容器 id 为 `target-{id}`，
//! 可以位于文档任意位置。容器只在每个文档建一次索引，按 id 查找。

use std::collections::HashMap;

use scraper::{ElementRef, Html};

use super::dom::ElementExt;
use super::patterns::{
    collapse_whitespace, normalize_lines, ANSWER_MARKER, ANSWER_TARGET, EXPLANATION_LABEL,
    EXPLANATION_MARKER, REVEAL_CONTROL,
};
use super::text_formatter::format;

const TARGET_PREFIX: &str = "target-";

/// 解析出的答案与解析文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub explanation: String,
}

/// 答案容器索引：按钮 id → 答案容器
pub struct AnswerIndex<'a> {
    containers: HashMap<&'a str, ElementRef<'a>>,
}

impl<'a> AnswerIndex<'a> {
    pub fn build(document: &'a Html) -> Self {
        let mut containers = HashMap::new();
        for container in document.select(&ANSWER_TARGET) {
            let Some(identifier) = container
                .value()
                .id()
                .and_then(|id| id.strip_prefix(TARGET_PREFIX))
            else {
                continue;
            };
            // 重复 id 时以文档中第一次出现的为准
            containers.entry(identifier).or_insert(container);
        }
        Self { containers }
    }

    pub fn get(&self, identifier: &str) -> Option<ElementRef<'a>> {
        self.containers.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// 为块解析答案与解析；结构不完整或容器含复杂内容时返回 `None`
pub fn resolve_answer(block: ElementRef<'_>, index: &AnswerIndex<'_>) -> Option<Resolution> {
    let control = block.select(&REVEAL_CONTROL).next()?;
    let identifier = control.value().attr("id")?.trim();
    if identifier.is_empty() {
        return None;
    }

    let container = index.get(identifier)?;
    if container.has_complex_content() {
        return None;
    }

    split_answer_text(&format(&container))
}

/// 按 `Answer:` / `Explanation:` 标记拆分渲染后的答案文本
///
/// 答案取最后一个 `Answer:` 之后的第一行。解析有两种来源：
/// 存在 `Explanation:` 时取该标记之后的全部内容，否则取答案行之后的所有行。
pub fn split_answer_text(rendered: &str) -> Option<Resolution> {
    let (_, remainder) = rendered.rsplit_once(ANSWER_MARKER)?;

    let mut lines = remainder.lines();
    let answer = collapse_whitespace(lines.next()?);
    if answer.is_empty() {
        return None;
    }

    let explanation = match remainder.split_once(EXPLANATION_MARKER) {
        Some((_, after_marker)) => normalize_lines(after_marker),
        None => normalize_lines(&lines.collect::<Vec<_>>().join("\n")),
    };
    let explanation = EXPLANATION_LABEL.replace(&explanation, "").trim().to_string();

    Some(Resolution {
        answer,
        explanation,
    })
}
