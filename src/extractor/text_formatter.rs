//! 行内文本渲染
//!
//! 把一个节点的行内内容渲染为纯文本：
//! - `sub` → `_{...}`，`sup` → `^{...}`
//! - `br` → `\n`
//! - 加粗、斜体、下划线、span 等行内元素递归展开
//! - 其余元素（图片、代码、脚本、块级容器、未知标签）一律视为终止，之后的内容不再累积

use ego_tree::NodeRef;
use scraper::node::Node;
use std::ops::ControlFlow;

/// 渲染时关心的节点种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Subscript,
    Superscript,
    LineBreak,
    Inline,
    /// 块级、媒体或未知元素，渲染到此为止
    Terminal,
    /// 注释、文档类型等，直接跳过
    Ignored,
}

const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "em", "font", "i", "mark", "s", "small", "span", "strong", "u",
];

pub fn node_kind(node: &NodeRef<'_, Node>) -> NodeKind {
    match node.value() {
        Node::Text(_) => NodeKind::Text,
        Node::Element(element) => match element.name() {
            "sub" => NodeKind::Subscript,
            "sup" => NodeKind::Superscript,
            "br" => NodeKind::LineBreak,
            name if INLINE_TAGS.contains(&name) => NodeKind::Inline,
            _ => NodeKind::Terminal,
        },
        _ => NodeKind::Ignored,
    }
}

/// 渲染节点的全部子内容并去掉首尾空白
pub fn format(node: &NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    let _ = render_children(node, &mut out);
    out.trim().to_string()
}

/// 依次渲染子节点；遇到终止元素时返回 `Break`
pub(crate) fn render_children(node: &NodeRef<'_, Node>, out: &mut String) -> ControlFlow<()> {
    for child in node.children() {
        render_node(&child, out)?;
    }
    ControlFlow::Continue(())
}

/// 渲染单个节点本身
pub(crate) fn render_node(node: &NodeRef<'_, Node>, out: &mut String) -> ControlFlow<()> {
    match node_kind(node) {
        NodeKind::Text => {
            if let Node::Text(text) = node.value() {
                out.push_str(text);
            }
        }
        NodeKind::Subscript => return render_token(node, "_{", out),
        NodeKind::Superscript => return render_token(node, "^{", out),
        NodeKind::LineBreak => out.push('\n'),
        NodeKind::Inline => return render_children(node, out),
        NodeKind::Terminal => return ControlFlow::Break(()),
        NodeKind::Ignored => {}
    }
    ControlFlow::Continue(())
}

fn render_token(node: &NodeRef<'_, Node>, open: &str, out: &mut String) -> ControlFlow<()> {
    let mut inner = String::new();
    let flow = render_children(node, &mut inner);
    out.push_str(open);
    out.push_str(inner.trim());
    out.push('}');
    flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn format_first(html: &str, css: &str) -> String {
        let doc = Html::parse_fragment(html);
        let selector = Selector::parse(css).unwrap();
        let element = doc.select(&selector).next().unwrap();
        format(&element)
    }

    #[test]
    fn subscript_and_superscript_become_tokens() {
        assert_eq!(format_first("<p>H<sub>2</sub>O</p>", "p"), "H_{2}O");
        assert_eq!(format_first("<p>2<sup>n</sup> - 1</p>", "p"), "2^{n} - 1");
        assert_eq!(
            format_first("<p>x<sub><i>i</i></sub><sup>2</sup></p>", "p"),
            "x_{i}^{2}"
        );
    }

    #[test]
    fn line_breaks_become_newlines() {
        assert_eq!(
            format_first("<p>first<br>second<br/>third</p>", "p"),
            "first\nsecond\nthird"
        );
    }

    #[test]
    fn inline_emphasis_is_flattened() {
        assert_eq!(
            format_first("<p>a <b>bold</b> <em>and <u>under</u></em> <span>span</span></p>", "p"),
            "a bold and under span"
        );
    }

    #[test]
    fn media_terminates_accumulation() {
        assert_eq!(
            format_first(r#"<p>before <img src="x.png"> after</p>"#, "p"),
            "before"
        );
    }

    #[test]
    fn termination_inside_inline_stops_the_whole_render() {
        assert_eq!(
            format_first("<p>a <b>bold <code>x</code> tail</b> after</p>", "p"),
            "a bold"
        );
    }

    #[test]
    fn unknown_elements_terminate() {
        assert_eq!(
            format_first("<div>keep<table><tr><td>x</td></tr></table>drop</div>", "div"),
            "keep"
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(format_first("<p>a<!-- hidden -->b</p>", "p"), "ab");
    }

    #[test]
    fn format_is_trimmed() {
        assert_eq!(format_first("<p>\n   padded   \n</p>", "p"), "padded");
    }
}
