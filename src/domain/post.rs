use std::{fmt, ops::Deref, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A URL-safe identifier for a blog post, derived from its storage filename.
///
/// A slug is non-empty and contains no path separators or whitespace, so it
/// can be mapped back to a file name without escaping.
///
/// Examples: `rust-ownership-explained`, `2023-retrospective`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct Slug(String);

impl Slug {
    /// Creates a new `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError`] if the string is empty, or contains path
    /// separators or whitespace.
    pub fn new(s: String) -> Result<Self, SlugError> {
        if s.is_empty() || s.chars().any(|c| c == '/' || c == '\\' || c.is_whitespace()) {
            return Err(SlugError(s));
        }
        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Slug {
    type Error = SlugError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Slug {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid slug.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid slug '{0}': must be non-empty with no path separators or whitespace")]
pub struct SlugError(String);

/// Publication state of a post.
///
/// Only published posts reach the public listing, search, category and
/// featured views. Drafts are loaded but filtered out before any of those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible in all views.
    #[default]
    Published,
    /// Loaded, but excluded from every listing.
    Draft,
}

/// Everything known about a post except its body.
///
/// Listing views return metadata only; callers that need the markdown body
/// fetch the full [`Post`] by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    /// Unique identifier, derived from the storage filename.
    pub slug: Slug,
    /// Display title.
    pub title: String,
    /// Short summary shown in listings.
    pub excerpt: String,
    /// Single category tag.
    pub category: String,
    /// Ordered tags, as written in the front matter.
    pub tags: Vec<String>,
    /// Publication date.
    pub date: NaiveDate,
    /// Estimated read time, as a display string (e.g. "8 min").
    pub read_time: String,
    /// Whether the post is highlighted on the homepage.
    pub featured: bool,
    /// Publication state.
    pub status: PostStatus,
    /// Optional header image path.
    pub image: Option<String>,
}

/// A complete blog post: metadata plus the markdown body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// The post's metadata.
    pub metadata: PostMetadata,
    /// Free-form markdown body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_simple_names() {
        let slug: Slug = "rust-ownership-explained".parse().unwrap();
        assert_eq!(slug.as_str(), "rust-ownership-explained");
    }

    #[test]
    fn slug_rejects_empty() {
        assert!(Slug::new(String::new()).is_err());
    }

    #[test]
    fn slug_rejects_path_separators() {
        assert!("nested/slug".parse::<Slug>().is_err());
        assert!(r"nested\slug".parse::<Slug>().is_err());
    }

    #[test]
    fn slug_rejects_whitespace() {
        assert!("two words".parse::<Slug>().is_err());
    }

    #[test]
    fn status_defaults_to_published() {
        assert_eq!(PostStatus::default(), PostStatus::Published);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_yaml::to_string(&PostStatus::Draft).unwrap().trim(),
            "draft"
        );
        let status: PostStatus = serde_yaml::from_str("published").unwrap();
        assert_eq!(status, PostStatus::Published);
    }
}
