//! 题目提取引擎
//!
//! 纯同步、无 I/O：输入一份已解析的文档和数量上限，按文档顺序返回题目记录。
//!
//! ```text
//! extract
//!   ├── classifier::classify        判断块是否为题目、属于哪种排版
//!   ├── text_formatter::format      行内文本渲染（sub/sup/br）
//!   ├── options::extract_options    选项
//!   ├── answer::resolve_answer      答案与解析
//!   └── assembler::assemble         字段齐全才生成记录
//! ```
//!
//! 页面结构不符时只会少产出或不产出记录，不会返回错误。

pub mod answer;
pub mod assembler;
pub mod classifier;
mod dom;
pub mod options;
pub mod patterns;
pub mod text_formatter;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::models::QuestionRecord;
use answer::{resolve_answer, AnswerIndex};
use assembler::{assemble, RecordParts};
use classifier::{classify, Classification, Layout};
use dom::ElementExt;
use options::extract_options;
use patterns::{
    collapse_whitespace, normalize_code_snippet, BLOCK, CODE_BODY, CODE_WRAPPER,
    CODE_WRAPPER_CLASS, CONTENT, DOCUMENT_TITLE, ENTRY_TITLE, OPTION_PREFIX, ORDINAL_PREFIX,
    SITE_NAME,
};
use text_formatter::format;

pub use answer::Resolution;
pub use classifier::RejectReason;

/// 解析 HTML 并提取最多 `max_count` 道题
pub fn extract_html(html: &str, max_count: usize) -> Vec<QuestionRecord> {
    let document = Html::parse_document(html);
    extract(&document, max_count)
}

/// 从文档中提取最多 `max_count` 道题
pub fn extract(document: &Html, max_count: usize) -> Vec<QuestionRecord> {
    Extractor::new(document).extract(max_count)
}

/// 单个文档的提取器：答案索引和子主题只计算一次
pub struct Extractor<'a> {
    document: &'a Html,
    answers: AnswerIndex<'a>,
    subtopic: Option<String>,
}

impl<'a> Extractor<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self {
            document,
            answers: AnswerIndex::build(document),
            subtopic: derive_subtopic(document),
        }
    }

    pub fn subtopic(&self) -> Option<&str> {
        self.subtopic.as_deref()
    }

    /// 按文档顺序遍历候选块，达到上限立即停止
    pub fn extract(&self, max_count: usize) -> Vec<QuestionRecord> {
        if max_count == 0 {
            return Vec::new();
        }

        let Some(content) = self.document.select(&CONTENT).next() else {
            debug!("未找到正文容器 div.entry-content");
            return Vec::new();
        };
        if self.answers.is_empty() {
            debug!("页面没有答案容器，跳过提取");
            return Vec::new();
        }

        let blocks: Vec<ElementRef<'a>> = content.select(&BLOCK).collect();
        debug!(
            "候选块 {} 个，答案容器 {} 个",
            blocks.len(),
            self.answers.len()
        );

        let mut records = Vec::new();
        let mut cursor = 0;
        while cursor < blocks.len() {
            let position = cursor + 1;
            let block = blocks[cursor];
            let following = blocks.get(cursor + 1).copied();

            let parts = match classify(block, following) {
                Classification::Reject(reason) => {
                    debug!("跳过第 {} 个块: {:?}", position, reason);
                    cursor += 1;
                    continue;
                }
                Classification::Accept(Layout::Combined) => self.combined_parts(block),
                Classification::Accept(Layout::Split) => {
                    let Some(options_block) = following else {
                        cursor += 1;
                        continue;
                    };
                    // 选项块已被本题消费
                    cursor += 1;
                    self.split_parts(block, options_block)
                }
            };

            match assemble(parts, self.subtopic.as_deref()) {
                Some(record) => {
                    records.push(record);
                    if records.len() >= max_count {
                        break;
                    }
                }
                None => debug!("第 {} 个块字段不完整，丢弃", position),
            }
            cursor += 1;
        }

        records
    }

    fn combined_parts(&self, block: ElementRef<'a>) -> RecordParts {
        RecordParts {
            question: question_text(block),
            options: extract_options(block),
            resolution: resolve_answer(block, &self.answers),
            additional_info: None,
        }
    }

    fn split_parts(&self, block: ElementRef<'a>, options_block: ElementRef<'a>) -> RecordParts {
        RecordParts {
            question: question_text(block),
            options: extract_options(options_block),
            resolution: resolve_answer(options_block, &self.answers),
            additional_info: side_code(block, options_block),
        }
    }
}

/// 题干：选项行之前的所有行，去掉开头序号
fn question_text(block: ElementRef<'_>) -> Option<String> {
    let rendered = format(&block);
    let mut lines = Vec::new();
    for line in rendered.lines().map(collapse_whitespace) {
        if line.is_empty() {
            continue;
        }
        if OPTION_PREFIX.is_match(&line) {
            break;
        }
        lines.push(line);
    }

    let first = lines.first_mut()?;
    let stripped = ORDINAL_PREFIX.replace(first.as_str(), "").into_owned();
    *first = stripped;
    let question = lines.join("\n").trim().to_string();
    (!question.is_empty()).then_some(question)
}

/// 题干块与选项块之间的附加代码块（`.hk1_style-wrap5 pre`）
fn side_code(question_block: ElementRef<'_>, options_block: ElementRef<'_>) -> Option<String> {
    for sibling in question_block.next_siblings().filter_map(ElementRef::wrap) {
        if sibling == options_block || sibling.value().name() == "p" {
            break;
        }
        let wrapper = if sibling.has_class(CODE_WRAPPER_CLASS) {
            Some(sibling)
        } else {
            sibling.select(&CODE_WRAPPER).next()
        };
        let Some(wrapper) = wrapper else {
            continue;
        };
        let code = wrapper
            .select(&CODE_BODY)
            .next()
            .map(|pre| normalize_code_snippet(&pre.text().collect::<Vec<_>>().join("\n")))?;
        return (!code.is_empty()).then_some(code);
    }
    None
}

fn derive_subtopic(document: &Html) -> Option<String> {
    if let Some(heading) = document.select(&ENTRY_TITLE).next() {
        return subtopic_from_title(&element_text(heading));
    }

    // <title> 末尾通常带站点名
    let title = element_text(document.select(&DOCUMENT_TITLE).next()?);
    let site_name = document
        .select(&SITE_NAME)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse_whitespace);
    subtopic_from_title(strip_site_name(&title, site_name.as_deref()))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn is_title_dash(c: char) -> bool {
    c == '-' || c == '–'
}

/// 去掉标题末尾的站点名段
///
/// 有 `og:site_name` 时只在末段与之相同（忽略大小写）时去掉；
/// 没有时，标题至少三段才把末段视为站点名。
pub fn strip_site_name<'t>(title: &'t str, site_name: Option<&str>) -> &'t str {
    let Some((head, tail)) = title.rsplit_once(is_title_dash) else {
        return title;
    };
    let is_site = match site_name {
        Some(name) => tail.trim().eq_ignore_ascii_case(name.trim()),
        None => head.contains(is_title_dash),
    };
    if is_site {
        head.trim_end()
    } else {
        title
    }
}

/// 取标题中最后一个 `-` 或 `–` 之后的文字
pub fn subtopic_from_title(title: &str) -> Option<String> {
    let (_, tail) = title.rsplit_once(is_title_dash)?;
    let tail = tail.trim();
    (!tail.is_empty()).then(|| tail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(body: &str) -> String {
        format!(
            r#"<html><head><title>Quiz</title></head><body>
            <h1 class="entry-title">C Programming Questions and Answers – Pointers</h1>
            <div class="entry-content">{body}</div></body></html>"#
        )
    }

    fn question(n: usize, id: &str) -> String {
        format!(
            r#"<p>{n}) Question number {n}?<br>a) one<br>b) two<br>c) three<br>d) four<span class="collapseomatic" id="{id}">View Answer</span></p>
            <div class="collapseomatic_content" id="target-{id}">Answer: b<br>Explanation: Reason {n}.</div>"#
        )
    }

    #[test]
    fn subtopic_uses_last_dash() {
        assert_eq!(
            subtopic_from_title("Data Structures Questions – Stack - Linked List").as_deref(),
            Some("Linked List")
        );
        assert_eq!(subtopic_from_title("No dash here"), None);
        assert_eq!(subtopic_from_title("Trailing –  "), None);
    }

    #[test]
    fn subtopic_prefers_entry_title() {
        let html = page("");
        let doc = Html::parse_document(&html);
        assert_eq!(Extractor::new(&doc).subtopic(), Some("Pointers"));
    }

    #[test]
    fn subtopic_falls_back_to_document_title() {
        let doc = Html::parse_document(
            r#"<html><head><title>Software Engineering - Testing</title></head><body></body></html>"#,
        );
        assert_eq!(Extractor::new(&doc).subtopic(), Some("Testing"));
    }

    #[test]
    fn document_title_drops_trailing_site_name() {
        let doc = Html::parse_document(
            r#"<html><head><title>C Questions - Pointers - Sanfoundry</title></head><body></body></html>"#,
        );
        assert_eq!(Extractor::new(&doc).subtopic(), Some("Pointers"));

        let doc = Html::parse_document(
            r#"<html><head><title>Pointers – Sanfoundry</title>
            <meta property="og:site_name" content="Sanfoundry"></head><body></body></html>"#,
        );
        assert_eq!(Extractor::new(&doc).subtopic(), Some("Pointers"));
    }

    #[test]
    fn site_name_is_only_dropped_when_it_matches() {
        assert_eq!(
            strip_site_name("C Questions - Pointers - SANFOUNDRY", Some("Sanfoundry")),
            "C Questions - Pointers"
        );
        assert_eq!(
            strip_site_name("C Questions - Pointers - Arrays", Some("Sanfoundry")),
            "C Questions - Pointers - Arrays"
        );
        assert_eq!(strip_site_name("Quiz - Stack", None), "Quiz - Stack");
        assert_eq!(strip_site_name("Quiz", None), "Quiz");
    }

    #[test]
    fn page_without_answer_containers_yields_nothing() {
        let body = r#"<p>1) What is 2+2?<br>a) 3<br>b) 4<span class="collapseomatic" id="id1">View Answer</span></p>"#;
        let doc = Html::parse_document(&page(body));
        let extractor = Extractor::new(&doc);
        assert!(extractor.answers.is_empty());
        assert!(extractor.extract(10).is_empty());
    }

    #[test]
    fn question_text_stops_at_first_option_line() {
        let doc = Html::parse_fragment("<p>3. What is printed?<br>int x = 1;<br>a) 1<br>b) 2</p>");
        let block = doc.select(&BLOCK).next().unwrap();
        assert_eq!(
            question_text(block).as_deref(),
            Some("What is printed?\nint x = 1;")
        );
    }

    #[test]
    fn cap_halts_iteration() {
        let body: String = (1..=5).map(|n| question(n, &format!("id{n}"))).collect();
        let html = page(&body);
        let records = extract_html(&html, 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].explanation, "Reason 3.");
    }

    #[test]
    fn zero_cap_returns_nothing() {
        let html = page(&question(1, "id1"));
        assert!(extract_html(&html, 0).is_empty());
    }

    #[test]
    fn missing_content_container_returns_nothing() {
        let html = r#"<html><body><div class="other"><p>1) Q?<br>a) x<br>b) y</p></div></body></html>"#;
        assert!(extract_html(html, 10).is_empty());
    }

    #[test]
    fn split_layout_consumes_the_options_block() {
        let body = r#"
            <p>1) What is the output of the following code?</p>
            <div class="hk1_style-wrap5"><div class="hk1_style-wrap4"><div class="hk1_style"><div>
              <pre class="de1">int main()
{
    printf("hi");
}</pre>
            </div></div></div></div>
            <p>a) hi<br>b) error<br>c) nothing<br>d) undefined<span class="collapseomatic" id="id7">View Answer</span></p>
            <div class="collapseomatic_content" id="target-id7">Answer: a<br>Explanation: printf prints hi.</div>
        "#;
        let records = extract_html(&page(body), 10);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.question, "What is the output of the following code?");
        assert_eq!(record.options, vec!["hi", "error", "nothing", "undefined"]);
        assert_eq!(record.answer, "a");
        assert_eq!(record.explanation, "printf prints hi.");
        assert_eq!(
            record.additional_info.as_deref(),
            Some(r#"int main() { printf("hi"); }"#)
        );
    }

    #[test]
    fn split_layout_without_side_code_has_no_additional_info() {
        let body = r#"
            <p>2. Which is a linear structure?</p>
            <p>a) tree<br>b) graph<br>c) array<span class="collapseomatic" id="id8">View Answer</span></p>
            <div class="collapseomatic_content" id="target-id8">Answer: c<br>Explanation: Arrays are linear.</div>
        "#;
        let records = extract_html(&page(body), 10);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].additional_info, None);
        assert_eq!(records[0].options, vec!["tree", "graph", "array"]);
    }
}
