use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Post entity - a single blog post as stored in the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub content: String,
    /// Like counter. Older records may lack the field entirely.
    #[serde(default)]
    pub likes: u64,
}

/// Input for creating a post. The id is assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub content: String,
}

impl NewPost {
    /// Reject the input unless every field is present and non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("author", &self.author),
            ("title", &self.title),
            ("content", &self.content),
        ] {
            if value.is_empty() {
                return Err(DomainError::Validation(format!(
                    "field '{field}' must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Materialize a post under the given id.
    pub fn into_post(self, id: u64) -> Post {
        Post {
            id,
            author: self.author,
            title: self.title,
            content: self.content,
            likes: 0,
        }
    }
}

/// Partial update for a post. `None` fields retain their previous value;
/// `id` and `likes` are never touched by an update.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    /// Overwrite the provided fields on `post`, leaving the rest as-is.
    pub fn apply(self, post: &mut Post) {
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: 5,
            author: "Ada".to_string(),
            title: "On Engines".to_string(),
            content: "Notes".to_string(),
            likes: 2,
        }
    }

    #[test]
    fn validate_rejects_empty_field() {
        let input = NewPost {
            author: String::new(),
            title: "T".to_string(),
            content: "C".to_string(),
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn patch_overwrites_only_provided_fields() {
        let mut post = sample();
        PostPatch {
            title: Some("New".to_string()),
            ..Default::default()
        }
        .apply(&mut post);

        assert_eq!(post.title, "New");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.content, "Notes");
        assert_eq!(post.likes, 2);
        assert_eq!(post.id, 5);
    }

    #[test]
    fn likes_field_defaults_to_zero_when_absent() {
        let post: Post = serde_json::from_str(
            r#"{"id": 1, "author": "A", "title": "T", "content": "C"}"#,
        )
        .unwrap();
        assert_eq!(post.likes, 0);
    }
}
