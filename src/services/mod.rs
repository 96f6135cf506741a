pub mod hint_service;
pub mod json_store;

pub use hint_service::{HintOutcome, HintService};
pub use json_store::JsonStore;
