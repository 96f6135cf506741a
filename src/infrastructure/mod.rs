pub mod page_source;

pub use page_source::{PageSource, CONTENT_READY_SELECTOR};
