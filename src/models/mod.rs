pub mod loaders;
pub mod question;
pub mod site;

pub use loaders::{load_sites, parse_sites};
pub use question::{EnrichedQuestion, QuestionRecord};
pub use site::{Site, SiteList};
