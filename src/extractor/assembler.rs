use crate::models::QuestionRecord;

use super::answer::Resolution;

/// 一道题在组装前收集到的各个字段
#[derive(Debug, Default)]
pub struct RecordParts {
    pub question: Option<String>,
    pub options: Vec<String>,
    pub resolution: Option<Resolution>,
    pub additional_info: Option<String>,
}

/// 题干、选项（至少两个）、答案、解析全部非空才生成记录，否则整题丢弃
pub fn assemble(parts: RecordParts, subtopic: Option<&str>) -> Option<QuestionRecord> {
    let question = parts.question.filter(|q| !q.is_empty())?;
    if parts.options.len() < 2 {
        return None;
    }
    let Resolution {
        answer,
        explanation,
    } = parts.resolution?;
    if answer.is_empty() || explanation.is_empty() {
        return None;
    }

    Some(QuestionRecord {
        question,
        options: parts.options,
        answer,
        explanation,
        subtopic: subtopic.map(str::to_string),
        additional_info: parts.additional_info.filter(|info| !info.is_empty()),
    })
}
