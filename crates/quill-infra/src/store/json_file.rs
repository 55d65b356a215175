//! JSON-file-backed post repository.
//!
//! The whole collection lives in memory for the life of the process; the
//! configured file holds the durable copy and is rewritten in full after
//! every mutation. There is no write-ahead log: a crash between mutation and
//! persist loses that mutation, and a failed persist leaves the disk copy
//! stale until the next successful write.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::sync::Mutex;

use quill_core::domain::{NewPost, Post, PostPatch};
use quill_core::error::{DomainError, StoreError};
use quill_core::ports::PostRepository;

/// In-memory post collection bound to a JSON file on disk.
///
/// This type is the single-threaded core: it performs no locking of its own.
/// Wrap it in [`JsonFilePostRepository`] (or serialize access yourself)
/// before sharing it between request handlers.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    posts: Vec<Post>,
}

impl JsonFileStore {
    /// Read and parse the file at `path`, sorting the collection ascending
    /// by id. A missing or unparseable file is a [`StoreError::Unreadable`];
    /// deciding whether that is fatal is left to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|e| StoreError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut posts: Vec<Post> =
            serde_json::from_str(&raw).map_err(|e| StoreError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        posts.sort_by_key(|post| post.id);

        Ok(Self { path, posts })
    }

    /// Load from `path`, substituting an empty collection when the file is
    /// missing or malformed. This is the startup policy: the diagnostic is
    /// logged and the error never reaches the caller.
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "starting with an empty post collection");
                Self::empty(path)
            }
        }
    }

    /// An empty collection bound to `path`. Nothing is written until the
    /// first mutation persists.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            posts: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All posts in current in-memory order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Linear scan for the post with the given id.
    pub fn find(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Validate `input`, assign the next id, and append the new post.
    /// The collection is untouched when validation fails.
    pub fn add(&mut self, input: NewPost) -> Result<Post, DomainError> {
        input.validate()?;
        let post = input.into_post(self.next_id());
        self.posts.push(post.clone());
        Ok(post)
    }

    /// Overwrite the fields `patch` provides on the post with the given id;
    /// omitted fields, the id, and the like counter keep their values.
    pub fn update(&mut self, id: u64, patch: PostPatch) -> Result<Post, DomainError> {
        let post = self.find_mut(id)?;
        patch.apply(post);
        Ok(post.clone())
    }

    /// Remove the post with the given id. Remaining ids are not renumbered.
    pub fn remove(&mut self, id: u64) -> Result<(), DomainError> {
        let index = self
            .posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(DomainError::NotFound(id))?;
        self.posts.remove(index);
        Ok(())
    }

    /// Increment the like counter of the post with the given id.
    pub fn like(&mut self, id: u64) -> Result<Post, DomainError> {
        let post = self.find_mut(id)?;
        post.likes += 1;
        Ok(post.clone())
    }

    /// Serialize the whole collection to the configured path, replacing the
    /// previous contents. Non-ASCII text is written literally and the output
    /// is indented with four spaces for diff-friendliness.
    pub fn persist(&self) -> Result<(), StoreError> {
        let write_failed = |reason: String| StoreError::WriteFailed {
            path: self.path.display().to_string(),
            reason,
        };

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.posts
            .serialize(&mut serializer)
            .map_err(|e| write_failed(e.to_string()))?;
        buf.push(b'\n');

        fs::write(&self.path, buf).map_err(|e| write_failed(e.to_string()))
    }

    /// Ids derive from the maximum id present, so deleting and re-adding
    /// posts in any order never hands out an id currently in use.
    fn next_id(&self) -> u64 {
        self.posts
            .iter()
            .map(|post| post.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Post, DomainError> {
        self.posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(DomainError::NotFound(id))
    }
}

/// [`PostRepository`] over a [`JsonFileStore`].
///
/// The async mutex is the serialization boundary the store itself does not
/// provide: id allocation, mutation, and persist run as one critical section
/// per call, so concurrent handlers cannot interleave partial mutations.
pub struct JsonFilePostRepository {
    store: Mutex<JsonFileStore>,
}

impl JsonFilePostRepository {
    pub fn new(store: JsonFileStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Write-through after a successful mutation. A failed write is logged
    /// and swallowed: the in-memory collection keeps the mutation and the
    /// disk copy stays stale until the next successful persist.
    fn persist_best_effort(store: &JsonFileStore) {
        if let Err(e) = store.persist() {
            tracing::error!(error = %e, "post collection not persisted; disk copy is stale");
        }
    }
}

#[async_trait::async_trait]
impl PostRepository for JsonFilePostRepository {
    async fn list(&self) -> Vec<Post> {
        self.store.lock().await.posts().to_vec()
    }

    async fn find_by_id(&self, id: u64) -> Option<Post> {
        self.store.lock().await.find(id).cloned()
    }

    async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut store = self.store.lock().await;
        let post = store.add(input)?;
        tracing::debug!(post_id = post.id, "created post");
        Self::persist_best_effort(&store);
        Ok(post)
    }

    async fn update(&self, id: u64, patch: PostPatch) -> Result<Post, DomainError> {
        let mut store = self.store.lock().await;
        let post = store.update(id, patch)?;
        Self::persist_best_effort(&store);
        Ok(post)
    }

    async fn delete(&self, id: u64) -> Result<(), DomainError> {
        let mut store = self.store.lock().await;
        store.remove(id)?;
        tracing::debug!(post_id = id, "deleted post");
        Self::persist_best_effort(&store);
        Ok(())
    }

    async fn like(&self, id: u64) -> Result<Post, DomainError> {
        let mut store = self.store.lock().await;
        let post = store.like(id)?;
        Self::persist_best_effort(&store);
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn post(id: u64, likes: u64) -> Post {
        Post {
            id,
            author: format!("author-{id}"),
            title: format!("title-{id}"),
            content: format!("content-{id}"),
            likes,
        }
    }

    fn new_post(author: &str, title: &str, content: &str) -> NewPost {
        NewPost {
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn store_with(dir: &TempDir, posts: Vec<Post>) -> JsonFileStore {
        let mut store = JsonFileStore::empty(dir.path().join("posts.json"));
        store.posts = posts;
        store.persist().expect("seed persist");
        JsonFileStore::load(store.path()).expect("seed reload")
    }

    #[test]
    fn load_sorts_ascending_by_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(
            &path,
            r#"[
                {"id": 3, "author": "a", "title": "t", "content": "c", "likes": 0},
                {"id": 1, "author": "a", "title": "t", "content": "c", "likes": 0},
                {"id": 2, "author": "a", "title": "t", "content": "c", "likes": 0}
            ]"#,
        )
        .unwrap();

        let store = JsonFileStore::load(&path).unwrap();
        let ids: Vec<u64> = store.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn load_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let result = JsonFileStore::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(StoreError::Unreadable { .. })));
    }

    #[test]
    fn load_or_empty_substitutes_empty_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::load_or_empty(dir.path().join("absent.json"));
        assert!(store.posts().is_empty());
    }

    #[test]
    fn load_or_empty_substitutes_empty_for_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(&path, "{ not json ]").unwrap();

        let store = JsonFileStore::load_or_empty(&path);
        assert!(store.posts().is_empty());
    }

    #[test]
    fn add_assigns_strictly_increasing_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::empty(dir.path().join("posts.json"));

        let mut last = 0;
        for n in 0..5 {
            let created = store.add(new_post("a", "t", &format!("c{n}"))).unwrap();
            assert!(created.id > last);
            last = created.id;
        }
    }

    #[test]
    fn add_rejects_empty_author_and_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, vec![post(1, 0)]);
        let disk_before = fs::read_to_string(store.path()).unwrap();

        let result = store.add(new_post("", "T", "C"));

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(store.posts().len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), disk_before);
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, vec![post(1, 0)]);

        assert!(matches!(
            store.remove(999),
            Err(DomainError::NotFound(999))
        ));
        assert_eq!(store.posts().len(), 1);
    }

    #[test]
    fn like_counts_from_zero_when_field_was_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("posts.json");
        fs::write(
            &path,
            r#"[{"id": 5, "author": "a", "title": "t", "content": "c"}]"#,
        )
        .unwrap();

        let mut store = JsonFileStore::load(&path).unwrap();
        assert_eq!(store.like(5).unwrap().likes, 1);
        store.like(5).unwrap();
        assert_eq!(store.like(5).unwrap().likes, 3);
    }

    #[test]
    fn update_patches_only_the_given_field() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, vec![post(5, 7)]);

        let updated = store
            .update(
                5,
                PostPatch {
                    title: Some("New".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.author, "author-5");
        assert_eq!(updated.content, "content-5");
        assert_eq!(updated.likes, 7);
        assert_eq!(updated.id, 5);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::empty(dir.path().join("posts.json"));
        let result = store.update(1, PostPatch::default());
        assert!(matches!(result, Err(DomainError::NotFound(1))));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, vec![post(1, 2), post(2, 0), post(9, 4)]);

        let reloaded = JsonFileStore::load(store.path()).unwrap();
        assert_eq!(reloaded.posts(), store.posts());
    }

    #[test]
    fn id_allocation_derives_from_current_maximum() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, vec![post(1, 0), post(2, 0)]);

        let created = store.add(new_post("a", "t", "c")).unwrap();
        assert_eq!(created.id, 3);

        store.remove(3).unwrap();
        let recreated = store.add(new_post("a", "t", "c")).unwrap();
        assert_eq!(recreated.id, 3);

        // A gap in the middle never shrinks the allocation point.
        store.remove(1).unwrap();
        let after_gap = store.add(new_post("a", "t", "c")).unwrap();
        assert_eq!(after_gap.id, 4);
    }

    #[test]
    fn persist_to_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        // The path is a directory, so the write cannot complete.
        let store = JsonFileStore::empty(dir.path());
        assert!(matches!(
            store.persist(),
            Err(StoreError::WriteFailed { .. })
        ));
    }

    #[test]
    fn persist_keeps_non_ascii_literal_and_indents_with_four_spaces() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::empty(dir.path().join("posts.json"));
        store
            .add(new_post("Åsa Pérez", "Déjà vu", "naïve café"))
            .unwrap();
        store.persist().unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("Déjà vu"));
        assert!(!raw.contains("\\u"));
        assert!(raw.starts_with("[\n    {"));
    }

    #[tokio::test]
    async fn repository_create_list_like_through_the_port() {
        let dir = TempDir::new().unwrap();
        let repo =
            JsonFilePostRepository::new(JsonFileStore::empty(dir.path().join("posts.json")));

        let created = repo.create(new_post("Ada", "Engines", "Notes")).await.unwrap();
        let liked = repo.like(created.id).await.unwrap();
        assert_eq!(liked.likes, 1);

        let listed = repo.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], liked);

        // The mutation reached the disk copy.
        let reloaded = JsonFileStore::load(dir.path().join("posts.json")).unwrap();
        assert_eq!(reloaded.posts(), listed.as_slice());
    }

    #[tokio::test]
    async fn repository_swallows_persist_failures() {
        let dir = TempDir::new().unwrap();
        // Unwritable target: the path is the temp directory itself.
        let repo = JsonFilePostRepository::new(JsonFileStore::empty(dir.path()));

        let created = repo.create(new_post("Ada", "Engines", "Notes")).await;
        assert!(created.is_ok());

        // In-memory state keeps the mutation even though the write failed.
        assert!(repo.find_by_id(1).await.is_some());
    }

    #[tokio::test]
    async fn repository_delete_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo =
            JsonFilePostRepository::new(JsonFileStore::empty(dir.path().join("posts.json")));
        assert!(matches!(
            repo.delete(999).await,
            Err(DomainError::NotFound(999))
        ));
    }
}
