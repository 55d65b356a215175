//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! The only backend is a flat JSON document on disk: the whole post
//! collection is read once at startup and rewritten after every mutation.

pub mod store;

pub use store::{JsonFilePostRepository, JsonFileStore};
