use scraper::{ElementRef, Selector};

use super::patterns::COMPLEX_CONTENT;

/// 在 [`ElementRef`] 上补充的 DOM 导航辅助方法
pub trait ElementExt<'a> {
    /// 向后跳过文本和注释节点，返回第一个元素兄弟
    fn next_element_sibling(&self) -> Option<ElementRef<'a>>;

    fn has_class(&self, class_name: &str) -> bool;

    /// 是否存在匹配 `selector` 的后代元素（不含自身）
    fn contains(&self, selector: &Selector) -> bool;

    /// 原始文本（不做任何格式化）的第一行，去掉首尾空白
    fn raw_first_line(&self) -> String;

    /// 是否包含会让纯文本提取失真的内容
    fn has_complex_content(&self) -> bool {
        self.contains(&COMPLEX_CONTENT)
    }
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn next_element_sibling(&self) -> Option<ElementRef<'a>> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.value().classes().any(|c| c == class_name)
    }

    fn contains(&self, selector: &Selector) -> bool {
        self.select(selector).next().is_some()
    }

    fn raw_first_line(&self) -> String {
        let text = self.text().collect::<String>();
        text.trim_start().lines().next().unwrap_or("").trim().to_string()
    }
}
