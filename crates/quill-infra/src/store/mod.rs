//! Storage adapters.

mod json_file;

pub use json_file::{JsonFilePostRepository, JsonFileStore};
