use std::path::Path;

use clap::Parser;
use folio::{FsStore, PostArchive, PostMetadata, Slug};
use regex::RegexBuilder;
use tracing::instrument;

use super::terminal::{self, Colorize};

/// Command arguments for `folio posts`.
#[derive(Debug, Parser)]
pub struct Posts {
    #[command(subcommand)]
    command: PostsCommand,
}

#[derive(Debug, Parser)]
enum PostsCommand {
    /// List published posts, newest first
    List(List),

    /// Show a single post in full
    Show(Show),

    /// Search published posts
    Search(Search),

    /// List post categories
    Categories,

    /// List post tags
    Tags,
}

impl Posts {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let archive = PostArchive::new(FsStore::new(root.join(config.posts_dir)));

        match self.command {
            PostsCommand::List(command) => command.run(&archive),
            PostsCommand::Show(command) => command.run(&archive),
            PostsCommand::Search(command) => command.run(&archive),
            PostsCommand::Categories => {
                for category in archive.categories() {
                    println!("{category}");
                }
                Ok(())
            }
            PostsCommand::Tags => {
                for tag in archive.tags() {
                    println!("{tag}");
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Parser)]
struct List {
    /// Show only posts in the given category
    #[arg(long, short)]
    category: Option<String>,

    /// Show only featured posts
    #[arg(long, short)]
    featured: bool,
}

impl List {
    #[instrument(skip(archive))]
    fn run(self, archive: &PostArchive<FsStore>) -> anyhow::Result<()> {
        let mut posts = match &self.category {
            Some(category) => archive.by_category(category),
            None => archive.published(),
        };
        if self.featured {
            posts.retain(|post| post.featured);
        }

        if posts.is_empty() {
            println!("No posts found.");
            return Ok(());
        }

        for post in &posts {
            print_summary(post);
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Show {
    /// The slug of the post to show
    slug: Slug,
}

impl Show {
    #[instrument(skip(archive))]
    fn run(self, archive: &PostArchive<FsStore>) -> anyhow::Result<()> {
        let Some(post) = archive.post(&self.slug) else {
            anyhow::bail!("Post '{}' not found", self.slug);
        };

        let meta = &post.metadata;
        println!("{}", meta.title);
        println!(
            "{}",
            format!(
                "{} · {} · {}{}",
                meta.date,
                meta.category,
                meta.read_time,
                if meta.featured { " · featured" } else { "" }
            )
            .dim()
        );
        if !meta.tags.is_empty() {
            println!("{}", meta.tags.join(", ").info());
        }
        println!();
        println!("{}", post.body);
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Search {
    /// The text to search for
    query: String,

    /// Treat the query as a regular expression
    #[arg(long)]
    regex: bool,
}

impl Search {
    #[instrument(skip(archive))]
    fn run(self, archive: &PostArchive<FsStore>) -> anyhow::Result<()> {
        let posts = if self.regex {
            let pattern = RegexBuilder::new(&self.query)
                .case_insensitive(true)
                .build()?;
            archive
                .published()
                .into_iter()
                .filter(|post| {
                    pattern.is_match(&post.title)
                        || pattern.is_match(&post.excerpt)
                        || post.tags.iter().any(|tag| pattern.is_match(tag))
                })
                .collect()
        } else {
            archive.search(&self.query)
        };

        if posts.is_empty() {
            println!("No posts matched '{}'.", self.query);
            return Ok(());
        }

        for post in &posts {
            print_summary(post);
        }
        Ok(())
    }
}

fn print_summary(post: &PostMetadata) {
    let marker = if post.featured { "★ " } else { "  " };
    println!(
        "{}{}  {}  {}",
        marker.warning(),
        post.date,
        post.slug,
        format!("({})", post.category).dim()
    );
    println!("    {}", terminal::fit(&post.excerpt, 4).dim());
}
