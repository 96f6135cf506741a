//! 选项提取
//!
//! 按换行把块切成若干行，`a)`~`d)` 开头的行开启一个新选项，
//! 其后不带前缀的行视为同一选项的续行。少于两个有效选项时返回空列表。

use scraper::ElementRef;

use super::dom::ElementExt;
use super::patterns::{collapse_whitespace, OPTION_PREFIX, REVEAL_CONTROL_CLASS};
use super::text_formatter::{node_kind, render_node, NodeKind};

/// 提取块中的选项，保持文档顺序并去重
pub fn extract_options(block: ElementRef<'_>) -> Vec<String> {
    let mut collector = OptionCollector::default();
    let mut segment = Segment::default();

    for child in block.children() {
        if ElementRef::wrap(child).is_some_and(|el| el.has_class(REVEAL_CONTROL_CLASS)) {
            break;
        }
        if node_kind(&child) == NodeKind::LineBreak {
            collector.push_segment(std::mem::take(&mut segment));
            continue;
        }
        if !segment.aborted && render_node(&child, &mut segment.text).is_break() {
            segment.aborted = true;
        }
    }
    collector.push_segment(segment);

    collector.finish()
}

/// 两个 `<br>` 之间的渲染结果
#[derive(Debug, Default)]
struct Segment {
    text: String,
    /// 遇到了图片、代码等终止元素
    aborted: bool,
}

#[derive(Debug, Default)]
struct OptionCollector {
    options: Vec<String>,
    open: Option<Segment>,
}

impl OptionCollector {
    fn push_segment(&mut self, segment: Segment) {
        // 行内元素里嵌套的 br 和源码换行同样是行边界
        let mut lines = segment.text.lines().peekable();
        while let Some(line) = lines.next() {
            let aborted = segment.aborted && lines.peek().is_none();
            self.push_line(line, aborted);
        }
    }

    fn push_line(&mut self, line: &str, aborted: bool) {
        if OPTION_PREFIX.is_match(line.trim_start()) {
            self.flush();
            self.open = Some(Segment {
                text: line.to_string(),
                aborted,
            });
        } else if let Some(open) = self.open.as_mut() {
            if !open.aborted {
                open.text.push(' ');
                open.text.push_str(line);
                open.aborted = aborted;
            }
        }
    }

    fn flush(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let stripped = OPTION_PREFIX.replace(open.text.trim_start(), "");
        let option = collapse_whitespace(&stripped);
        if !option.is_empty() && !self.options.contains(&option) {
            self.options.push(option);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        if self.options.len() >= 2 {
            self.options
        } else {
            Vec::new()
        }
    }
}
