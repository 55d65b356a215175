use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostPatch};
use crate::error::DomainError;

/// Post repository - the seam between the HTTP layer and storage.
///
/// Implementations own the post collection and keep it synchronized with its
/// durable copy after every successful mutation. Callers get back owned
/// snapshots; the collection itself never escapes the implementation.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts in storage order.
    async fn list(&self) -> Vec<Post>;

    /// Find a post by its unique id.
    async fn find_by_id(&self, id: u64) -> Option<Post>;

    /// Create a post from validated-or-rejected input and assign it the next id.
    async fn create(&self, input: NewPost) -> Result<Post, DomainError>;

    /// Apply a partial update to the post with the given id.
    async fn update(&self, id: u64, patch: PostPatch) -> Result<Post, DomainError>;

    /// Remove the post with the given id. Remaining ids are not renumbered.
    async fn delete(&self, id: u64) -> Result<(), DomainError>;

    /// Increment the like counter of the post with the given id.
    async fn like(&self, id: u64) -> Result<Post, DomainError>;
}
