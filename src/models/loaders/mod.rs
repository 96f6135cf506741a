pub mod toml_loader;

pub use toml_loader::{load_sites, parse_sites};
