//! 候选块分类
//!
//! 判断一个块是不是可以提取的题目，以及它属于哪种排版：
//! - `Combined`：题干和选项在同一个块里，用 `<br>` 分隔
//! - `Split`：题干单独一块，选项在紧随其后的候选块里

use scraper::ElementRef;

use super::dom::ElementExt;
use super::patterns::{ANSWER_CONTAINER_CLASS, LINE_BREAK, OPTION_PREFIX, QUESTION_START};

/// 排版类型，按块各自判断，不假设整页统一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Combined,
    Split,
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 不是以序号或选项字母开头
    NotAQuestion,
    /// 含图片、代码、脚本或嵌套的答案结构
    ComplexContent,
    /// 缺少分隔选项的换行，或后面没有答案容器
    MissingStructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accept(Layout),
    Reject(RejectReason),
}

/// 对 `block` 分类；`following` 是文档顺序中的下一个候选块
pub fn classify(block: ElementRef<'_>, following: Option<ElementRef<'_>>) -> Classification {
    if !QUESTION_START.is_match(&block.raw_first_line()) {
        return Classification::Reject(RejectReason::NotAQuestion);
    }

    if block.has_complex_content() {
        return Classification::Reject(RejectReason::ComplexContent);
    }

    if block.contains(&LINE_BREAK) {
        return if answer_container_follows(block) {
            Classification::Accept(Layout::Combined)
        } else {
            Classification::Reject(RejectReason::MissingStructure)
        };
    }

    // 只有题干的块：选项块必须以选项行开头，带换行，后面紧跟答案容器
    match following {
        Some(options_block) if options_block.has_complex_content() => {
            Classification::Reject(RejectReason::ComplexContent)
        }
        Some(options_block)
            if OPTION_PREFIX.is_match(&options_block.raw_first_line())
                && options_block.contains(&LINE_BREAK)
                && answer_container_follows(options_block) =>
        {
            Classification::Accept(Layout::Split)
        }
        _ => Classification::Reject(RejectReason::MissingStructure),
    }
}

fn answer_container_follows(block: ElementRef<'_>) -> bool {
    block
        .next_element_sibling()
        .is_some_and(|sibling| {
            sibling.value().name() == "div" && sibling.has_class(ANSWER_CONTAINER_CLASS)
        })
}
