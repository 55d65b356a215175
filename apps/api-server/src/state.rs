//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::PostRepository;
use quill_infra::{JsonFilePostRepository, JsonFileStore};

use crate::config::AppConfig;

/// Shared application state.
///
/// The repository handle is the serialization boundary: every worker goes
/// through the same `Arc`, and the file-backed implementation runs each
/// operation as one critical section.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state, loading the post collection once.
    ///
    /// A missing or malformed file is not fatal: the store logs the
    /// diagnostic and starts empty, and the file is rewritten on the first
    /// successful mutation.
    pub fn new(config: &AppConfig) -> Self {
        let store = JsonFileStore::load_or_empty(&config.posts_file);
        tracing::info!(
            path = %config.posts_file.display(),
            posts = store.posts().len(),
            "post collection loaded"
        );

        Self {
            posts: Arc::new(JsonFilePostRepository::new(store)),
        }
    }
}
