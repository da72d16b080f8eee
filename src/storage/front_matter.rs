use std::io::{self, BufRead};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostMetadata, PostStatus, Slug};

/// A blog post serialized as markdown with a YAML front-matter header.
#[derive(Debug, Clone)]
pub struct MarkdownPost {
    slug: Slug,
    front_matter: FrontMatter,
    body: String,
}

impl MarkdownPost {
    /// Parses a post file from a reader.
    ///
    /// The input must start with a `---` line, followed by YAML front
    /// matter, a closing `---` line, and then the markdown body. Leading
    /// and trailing blank lines around the body are trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, the front-matter delimiters
    /// are missing, or the YAML header cannot be deserialized.
    pub fn read<R: BufRead>(reader: &mut R, slug: Slug) -> Result<Self, FrontMatterError> {
        let mut lines = reader.lines();

        // Ensure front matter starts correctly
        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))?
            .map_err(FrontMatterError::from)?;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected front matter starting with '---'",
            )
            .into());
        }

        // Collect lines until the next '---'
        let mut terminated = false;
        let mut header_lines = Vec::new();
        for line in lines.by_ref() {
            let line = line?;
            if line.trim() == "---" {
                terminated = true;
                break;
            }
            header_lines.push(line);
        }

        if !terminated {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Front matter is not terminated by '---'",
            )
            .into());
        }

        let front_matter: FrontMatter = serde_yaml::from_str(&header_lines.join("\n"))?;

        // The rest of the lines are the markdown body
        let body = lines
            .collect::<Result<Vec<_>, _>>()?
            .join("\n")
            .trim()
            .to_string();

        Ok(Self {
            slug,
            front_matter,
            body,
        })
    }

    /// The slug this post was loaded under.
    #[must_use]
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }
}

impl From<MarkdownPost> for Post {
    fn from(post: MarkdownPost) -> Self {
        let MarkdownPost {
            slug,
            front_matter:
                FrontMatter {
                    title,
                    excerpt,
                    category,
                    tags,
                    date,
                    read_time,
                    featured,
                    status,
                    image,
                },
            body,
        } = post;

        Self {
            metadata: PostMetadata {
                slug,
                title,
                excerpt,
                category,
                tags,
                date,
                read_time,
                featured,
                status,
                image,
            },
            body,
        }
    }
}

/// Errors that can occur when parsing a post file.
#[derive(Debug, thiserror::Error)]
#[error("failed to read front matter")]
pub enum FrontMatterError {
    /// An I/O error occurred, including missing or malformed delimiters.
    Io(#[from] io::Error),
    /// The YAML header could not be parsed.
    Yaml(#[from] serde_yaml::Error),
}

/// The YAML header of a post file.
///
/// Field names are camelCase on disk (`readTime`). `featured` defaults to
/// false, `status` to published and `tags` to empty when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter {
    title: String,
    excerpt: String,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    date: NaiveDate,
    read_time: String,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn slug() -> Slug {
        "testing-in-rust".parse().unwrap()
    }

    #[test]
    fn parses_full_header_and_body() {
        let input = r#"---
title: "Testing in Rust"
excerpt: "Patterns for fast, reliable test suites."
category: "Engineering"
tags:
- rust
- testing
date: 2023-12-15
readTime: "8 min"
featured: true
status: published
image: "/images/testing.png"
---

First paragraph.

Second paragraph.
"#;

        let mut reader = Cursor::new(input);
        let post: Post = MarkdownPost::read(&mut reader, slug()).unwrap().into();

        assert_eq!(post.metadata.title, "Testing in Rust");
        assert_eq!(post.metadata.category, "Engineering");
        assert_eq!(post.metadata.tags, vec!["rust", "testing"]);
        assert_eq!(
            post.metadata.date,
            NaiveDate::from_ymd_opt(2023, 12, 15).unwrap()
        );
        assert_eq!(post.metadata.read_time, "8 min");
        assert!(post.metadata.featured);
        assert_eq!(post.metadata.status, PostStatus::Published);
        assert_eq!(post.metadata.image.as_deref(), Some("/images/testing.png"));
        assert_eq!(post.body, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn optional_fields_default() {
        let input = r#"---
title: "Minimal"
excerpt: "Just the required fields."
category: "Notes"
date: 2024-01-02
readTime: "2 min"
---
Body.
"#;

        let mut reader = Cursor::new(input);
        let post: Post = MarkdownPost::read(&mut reader, slug()).unwrap().into();

        assert!(post.metadata.tags.is_empty());
        assert!(!post.metadata.featured);
        assert_eq!(post.metadata.status, PostStatus::Published);
        assert_eq!(post.metadata.image, None);
    }

    #[test]
    fn body_may_contain_triple_dashes() {
        let input = r#"---
title: "Dashes"
excerpt: "e"
category: "Notes"
date: 2024-01-02
readTime: "1 min"
---
Above the line

---

Below the line
"#;

        let mut reader = Cursor::new(input);
        let post = MarkdownPost::read(&mut reader, slug()).unwrap();

        assert_eq!(
            Post::from(post).body,
            "Above the line\n\n---\n\nBelow the line"
        );
    }

    #[test]
    fn empty_body_is_allowed() {
        let input = r#"---
title: "No body"
excerpt: "e"
category: "Notes"
date: 2024-01-02
readTime: "1 min"
---
"#;

        let mut reader = Cursor::new(input);
        let post = MarkdownPost::read(&mut reader, slug()).unwrap();
        assert_eq!(Post::from(post).body, "");
    }

    #[test]
    fn missing_opening_delimiter_fails() {
        let mut reader = Cursor::new("title: no front matter here");
        let result = MarkdownPost::read(&mut reader, slug());
        assert!(matches!(result, Err(FrontMatterError::Io(_))));
    }

    #[test]
    fn unterminated_front_matter_fails() {
        let input = r#"---
title: "Oops"
excerpt: "e"
category: "Notes"
date: 2024-01-02
readTime: "1 min"
Body without a closing delimiter"#;

        let mut reader = Cursor::new(input);
        let result = MarkdownPost::read(&mut reader, slug());
        assert!(matches!(result, Err(FrontMatterError::Io(_))));
    }

    #[test]
    fn invalid_yaml_fails() {
        let input = r"---
title: [unclosed
date: not-a-date
---
Body
";

        let mut reader = Cursor::new(input);
        let result = MarkdownPost::read(&mut reader, slug());
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn missing_required_field_fails() {
        let input = r#"---
title: "No date"
excerpt: "e"
category: "Notes"
readTime: "1 min"
---
Body
"#;

        let mut reader = Cursor::new(input);
        let result = MarkdownPost::read(&mut reader, slug());
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn empty_input_fails() {
        let mut reader = Cursor::new("");
        assert!(MarkdownPost::read(&mut reader, slug()).is_err());
    }
}
