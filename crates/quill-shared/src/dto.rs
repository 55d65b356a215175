//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to create a post. All fields are required and must be non-empty;
/// the repository rejects the request otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub author: String,
    pub title: String,
    pub content: String,
}

/// Partial update for a post. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub content: String,
    pub likes: u64,
}
