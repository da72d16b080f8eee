//! The blog post repository.
//!
//! Posts are one file each, markdown with YAML front matter, living in a
//! flat directory. The archive re-scans its store on every operation;
//! content is read-only at runtime and edited by adding or removing files.

use std::io::Cursor;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    domain::{Post, PostMetadata, PostStatus, Slug},
    storage::{front_matter::MarkdownPost, Store},
};

/// The sentinel category matching every post.
pub const ALL_CATEGORIES: &str = "All";

/// A read-only archive of blog posts backed by a [`Store`].
///
/// Files that are not markdown, have names that are not valid slugs, or
/// fail to parse are skipped with a log line; one bad file never takes
/// down the listing.
#[derive(Debug, Clone)]
pub struct PostArchive<S> {
    store: S,
}

impl<S: Store> PostArchive<S> {
    /// Creates an archive over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// All published posts, most recent first.
    ///
    /// Returns metadata only; fetch the body with [`Self::post`]. The sort
    /// is stable, so posts sharing a date keep their (sorted-key) scan
    /// order across calls.
    #[must_use]
    pub fn published(&self) -> Vec<PostMetadata> {
        let mut posts: Vec<_> = self
            .scan()
            .into_iter()
            .filter(|post| post.status == PostStatus::Published)
            .collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        posts
    }

    /// Fetches one post, including its markdown body.
    ///
    /// Returns `None` when the file does not exist, cannot be read, or
    /// cannot be parsed; a missing post is an expected condition, not an
    /// error.
    #[must_use]
    pub fn post(&self, slug: &Slug) -> Option<Post> {
        let key = format!("{slug}.md");
        let bytes = match self.store.read(&key) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::debug!("Cannot read post {key}: {error}");
                return None;
            }
        };

        match MarkdownPost::read(&mut Cursor::new(bytes), slug.clone()) {
            Ok(post) => Some(post.into()),
            Err(error) => {
                tracing::debug!("Cannot parse post {key}: {error}");
                None
            }
        }
    }

    /// Published posts in the given category, or every published post for
    /// the [`ALL_CATEGORIES`] sentinel.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<PostMetadata> {
        self.published()
            .into_iter()
            .filter(|post| category == ALL_CATEGORIES || post.category == category)
            .collect()
    }

    /// Published posts with the featured flag, most recent first.
    #[must_use]
    pub fn featured(&self) -> Vec<PostMetadata> {
        self.published()
            .into_iter()
            .filter(|post| post.featured)
            .collect()
    }

    /// Distinct categories, alphabetical, prefixed with the
    /// [`ALL_CATEGORIES`] sentinel.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .published()
            .into_iter()
            .map(|post| post.category)
            .collect();
        categories.sort();
        categories.dedup();
        categories.insert(0, ALL_CATEGORIES.to_string());
        categories
    }

    /// Distinct tags across all published posts, alphabetical.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .published()
            .into_iter()
            .flat_map(|post| post.tags)
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Case-insensitive substring search over title, excerpt and tags.
    ///
    /// Matches keep the date-descending order of [`Self::published`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<PostMetadata> {
        let needle = query.to_lowercase();
        self.published()
            .into_iter()
            .filter(|post| {
                post.title.to_lowercase().contains(&needle)
                    || post.excerpt.to_lowercase().contains(&needle)
                    || post
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Parses every markdown file in the store, skipping bad ones.
    fn scan(&self) -> Vec<PostMetadata> {
        let keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| key.ends_with(".md"))
            .collect();

        keys.par_iter()
            .filter_map(|key| self.try_load(key))
            .collect()
    }

    fn try_load(&self, key: &str) -> Option<PostMetadata> {
        let stem = key.strip_suffix(".md").unwrap_or(key);
        let slug: Slug = match stem.parse() {
            Ok(slug) => slug,
            Err(error) => {
                tracing::debug!("Skipping file with invalid slug at {key}: {error}");
                return None;
            }
        };

        let bytes = match self.store.read(key) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::debug!("Failed to read post at {key}: {error}");
                return None;
            }
        };

        match MarkdownPost::read(&mut Cursor::new(bytes), slug) {
            Ok(post) => Some(Post::from(post).metadata),
            Err(error) => {
                tracing::debug!("Failed to parse post at {key}: {error}");
                None
            }
        }
    }
}
