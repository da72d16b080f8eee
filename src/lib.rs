//! Flat-file content repository for a personal portfolio and blog.
//!
//! Blog posts are markdown documents with YAML front matter, one file per
//! post. The reading list is a single JSON catalog rewritten in full on
//! every mutation.

pub mod domain;
pub use domain::{Book, BookStatus, BookUpdate, Config, Post, PostMetadata, PostStatus, Slug};

/// Storage ports and codecs for content files.
pub mod storage;
pub use storage::{FsStore, MemStore, Store};

mod blog;
pub use blog::PostArchive;

mod reading;
pub use reading::{Bookshelf, ReadingStats, StatusChange, YearRange};
