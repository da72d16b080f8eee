/// The storage port and its filesystem and in-memory implementations.
pub mod store;
/// Markdown + YAML front-matter serialization for posts.
pub mod front_matter;
/// Aggregate JSON catalog serialization for the reading list.
pub mod catalog;

pub use front_matter::{FrontMatterError, MarkdownPost};
pub use store::{FsStore, MemStore, Store};
