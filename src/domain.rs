//! Domain models for portfolio content.
//!
//! This module contains the core content types: blog posts, reading-list
//! books, and configuration.

/// Blog post domain model.
pub mod post;
pub use post::{Post, PostMetadata, PostStatus, Slug, SlugError};

/// Reading-list book domain model.
pub mod book;
pub use book::{Book, BookStatus, BookUpdate};

mod config;
pub use config::Config;
