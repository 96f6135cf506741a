//! 题目页面的文本模式与归一化工具
//!
//! 所有正则只编译一次，分类、选项、答案三个环节共用同一套规则

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// 答案文本中的答案标记
pub const ANSWER_MARKER: &str = "Answer:";

/// 答案文本中的解析标记
pub const EXPLANATION_MARKER: &str = "Explanation:";

/// 题目起始：`12) ` / `3. ` 序号，或 `a) ` / `B. ` 选项字母
pub static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[).]\s|[a-dA-D][).]\s)").expect("valid question start pattern")
});

/// 题干开头的序号
pub static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[).]\s*").expect("valid ordinal pattern"));

/// 选项行开头的字母
pub static OPTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-d]\)").expect("valid option pattern"));

/// 残留的解析标签
pub static EXPLANATION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Explanation:\s*").expect("valid explanation label"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// 正文容器
pub static CONTENT: LazyLock<Selector> = LazyLock::new(|| selector("div.entry-content"));

/// 候选块
pub static BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("p"));

pub static LINE_BREAK: LazyLock<Selector> = LazyLock::new(|| selector("br"));

/// 会让纯文本提取丢失信息的内容：图片、noscript、代码、脚本、嵌套的答案/代码包装层
pub static COMPLEX_CONTENT: LazyLock<Selector> = LazyLock::new(|| {
    selector("img, noscript, code, pre, script, .collapseomatic_content, .hk1_style-wrap5")
});

/// "查看答案"按钮
pub static REVEAL_CONTROL: LazyLock<Selector> =
    LazyLock::new(|| selector("span.collapseomatic[id]"));

/// 答案容器，id 形如 `target-{id}`
pub static ANSWER_TARGET: LazyLock<Selector> = LazyLock::new(|| selector(r#"[id^="target-"]"#));

/// 页面标题，优先文章标题
pub static ENTRY_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1.entry-title"));
pub static DOCUMENT_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
pub static SITE_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:site_name"]"#));

/// 附加代码块中的代码
pub static CODE_WRAPPER: LazyLock<Selector> = LazyLock::new(|| selector(".hk1_style-wrap5"));
pub static CODE_BODY: LazyLock<Selector> = LazyLock::new(|| selector("pre"));

pub const ANSWER_CONTAINER_CLASS: &str = "collapseomatic_content";
pub const REVEAL_CONTROL_CLASS: &str = "collapseomatic";
pub const CODE_WRAPPER_CLASS: &str = "hk1_style-wrap5";

/// 把任意空白（含换行、不换行空格）压成单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 逐行压缩空白，丢弃空行，保留行结构
pub fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// 附加代码的预处理：合并多余空行与空白
pub fn normalize_code_snippet(code: &str) -> String {
    collapse_whitespace(code)
}
