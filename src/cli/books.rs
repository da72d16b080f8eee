use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use folio::{Book, BookStatus, Bookshelf, FsStore, StatusChange};
use regex::RegexBuilder;
use tracing::instrument;

use super::terminal::Colorize;

/// Parse a book status from a string, accepting the kebab-case names used
/// in the catalog.
///
/// This is a CLI boundary function; the domain type itself only
/// round-trips through serde.
fn parse_status(s: &str) -> Result<BookStatus, String> {
    match s.to_lowercase().as_str() {
        "read" => Ok(BookStatus::Read),
        "currently-reading" | "reading" => Ok(BookStatus::CurrentlyReading),
        "want-to-read" | "backlog" => Ok(BookStatus::WantToRead),
        other => Err(format!(
            "unknown status '{other}' (expected read, currently-reading or want-to-read)"
        )),
    }
}

/// Command arguments for `folio books`.
#[derive(Debug, Parser)]
pub struct Books {
    #[command(subcommand)]
    command: BooksCommand,
}

#[derive(Debug, Parser)]
enum BooksCommand {
    /// List books, currently reading first
    List(List),

    /// Search books
    Search(Search),

    /// Add a book to the catalog
    Add(Add),

    /// Move a book to a new status
    Status(Status),

    /// Show reading statistics
    Stats(Stats),

    /// Suggest books from the backlog
    Recommend(Recommend),
}

impl Books {
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let shelf = Bookshelf::new(FsStore::new(root.join(config.reading_dir)));

        match self.command {
            BooksCommand::List(command) => command.run(&shelf),
            BooksCommand::Search(command) => command.run(&shelf),
            BooksCommand::Add(command) => command.run(&shelf),
            BooksCommand::Status(command) => command.run(&shelf),
            BooksCommand::Stats(command) => command.run(&shelf),
            BooksCommand::Recommend(command) => command.run(&shelf),
        }
    }
}

#[derive(Debug, Parser)]
struct List {
    /// Show only books with the given status
    #[arg(long, short, value_parser = parse_status)]
    status: Option<BookStatus>,

    /// Show only books in the given category
    #[arg(long, short)]
    category: Option<String>,
}

impl List {
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let mut books = match self.status {
            Some(status) => shelf.by_status(status),
            None => shelf.all(),
        };
        if let Some(category) = &self.category {
            books.retain(|book| &book.category == category);
        }

        if books.is_empty() {
            println!("No books found.");
            return Ok(());
        }

        for book in &books {
            print_summary(book);
        }
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
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let books = if self.regex {
            let pattern = RegexBuilder::new(&self.query)
                .case_insensitive(true)
                .build()?;
            shelf
                .all()
                .into_iter()
                .filter(|book| {
                    pattern.is_match(&book.title)
                        || pattern.is_match(&book.author)
                        || pattern.is_match(&book.category)
                        || pattern.is_match(&book.personal_notes)
                        || book.tags.iter().any(|tag| pattern.is_match(tag))
                })
                .collect()
        } else {
            shelf.search(&self.query)
        };

        if books.is_empty() {
            println!("No books matched '{}'.", self.query);
            return Ok(());
        }

        for book in &books {
            print_summary(book);
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Add {
    /// The title of the book
    #[arg(long, short)]
    title: String,

    /// The author of the book
    #[arg(long, short)]
    author: String,

    /// The category to shelve the book under
    #[arg(long, short)]
    category: String,

    /// The year of publication
    #[arg(long, short)]
    year: i32,

    /// A short description
    #[arg(long, default_value = "")]
    description: String,

    /// Personal notes on the book
    #[arg(long, default_value = "")]
    notes: String,

    /// Initial status (defaults to want-to-read)
    #[arg(long, short, value_parser = parse_status)]
    status: Option<BookStatus>,

    /// Tags, comma-separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Who recommended the book
    #[arg(long)]
    recommended_by: Option<String>,
}

impl Add {
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let title = self.title.clone();
        let book = Book {
            title: self.title,
            author: self.author,
            category: self.category,
            description: self.description,
            personal_notes: self.notes,
            rating: None,
            year: self.year,
            status: self.status.unwrap_or(BookStatus::WantToRead),
            date_read: None,
            date_started: None,
            date_added: None,
            tags: self.tags,
            recommended_by: self.recommended_by,
            cover_image: None,
        };

        if !shelf.add(book) {
            anyhow::bail!("Failed to save the catalog");
        }

        println!("{}", format!("Added '{title}'").success());
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Status {
    /// The title of the book to move
    title: String,

    /// The new status
    #[arg(value_parser = parse_status)]
    status: BookStatus,

    /// Rating to record when marking as read
    #[arg(long)]
    rating: Option<f32>,

    /// The date the book was finished (defaults to today)
    #[arg(long)]
    date_read: Option<NaiveDate>,

    /// The date the book was started (defaults to today)
    #[arg(long)]
    date_started: Option<NaiveDate>,
}

impl Status {
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let change = StatusChange {
            rating: self.rating,
            date_read: self.date_read,
            date_started: self.date_started,
        };

        if !shelf.update_status(&self.title, self.status, &change) {
            anyhow::bail!("No book titled '{}'", self.title);
        }

        println!("{}", format!("Updated '{}'", self.title).success());
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Parser)]
struct Stats {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Stats {
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let stats = shelf.stats();

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            OutputFormat::Table => {
                println!("Reading statistics");
                println!();
                println!("Total books:        {}", stats.total);
                println!("Read:               {}", stats.read);
                println!("Currently reading:  {}", stats.currently_reading);
                println!("Want to read:       {}", stats.want_to_read);
                if stats.rated > 0 {
                    println!(
                        "Average rating:     {} (over {} rated)",
                        stats.average_rating, stats.rated
                    );
                }
                if let Some(range) = stats.year_range {
                    println!(
                        "Publication years:  {} to {}",
                        range.earliest, range.latest
                    );
                }
                if !stats.top_categories.is_empty() {
                    println!();
                    println!("Top categories:");
                    for category in &stats.top_categories {
                        let count = stats
                            .category_counts
                            .iter()
                            .find(|(name, _)| name == category)
                            .map_or(0, |(_, count)| *count);
                        println!("  {category}  {}", format!("({count})").dim());
                    }
                }
                if !stats.top_tags.is_empty() {
                    println!();
                    println!("Top tags: {}", stats.top_tags.join(", ").info());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
struct Recommend {
    /// Maximum number of suggestions
    #[arg(long, short, default_value_t = 5)]
    limit: usize,
}

impl Recommend {
    #[instrument(skip(shelf))]
    fn run(self, shelf: &Bookshelf<FsStore>) -> anyhow::Result<()> {
        let books = shelf.recommendations(self.limit);

        if books.is_empty() {
            println!("Nothing on the backlog.");
            return Ok(());
        }

        for book in &books {
            print_summary(book);
        }
        Ok(())
    }
}

fn print_summary(book: &Book) {
    let marker = match book.status {
        BookStatus::Read => "✓".success(),
        BookStatus::CurrentlyReading => "▸".info(),
        BookStatus::WantToRead => "·".dim(),
    };
    let rating = book
        .rating
        .map(|rating| format!("  {rating}/5"))
        .unwrap_or_default();
    println!(
        "{marker} {} — {}  {}{}",
        book.title,
        book.author,
        format!("({})", book.category).dim(),
        rating.warning()
    );
}

#[cfg(test)]
mod tests {
    use folio::Store;
    use tempfile::tempdir;

    use super::*;

    fn shelf_in(dir: &Path) -> Bookshelf<FsStore> {
        Bookshelf::new(FsStore::new(dir.to_path_buf()))
    }

    fn add_command(title: &str) -> Add {
        Add {
            title: title.to_string(),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            year: 2020,
            description: String::new(),
            notes: String::new(),
            status: None,
            tags: Vec::new(),
            recommended_by: None,
        }
    }

    #[test]
    fn parse_status_accepts_aliases() {
        assert_eq!(parse_status("READ").unwrap(), BookStatus::Read);
        assert_eq!(
            parse_status("reading").unwrap(),
            BookStatus::CurrentlyReading
        );
        assert_eq!(parse_status("backlog").unwrap(), BookStatus::WantToRead);
        assert!(parse_status("finished").is_err());
    }

    #[test]
    fn add_creates_the_catalog() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());

        add_command("First").run(&shelf).expect("add should succeed");

        assert!(tmp.path().join("books.json").exists());
        assert_eq!(shelf.all().len(), 1);
    }

    #[test]
    fn status_round_trips_through_the_catalog() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());
        add_command("First").run(&shelf).unwrap();

        let status = Status {
            title: "First".to_string(),
            status: BookStatus::Read,
            rating: Some(4.5),
            date_read: None,
            date_started: None,
        };
        status.run(&shelf).expect("status should succeed");

        let books = shelf.all();
        assert_eq!(books[0].status, BookStatus::Read);
        assert_eq!(books[0].rating, Some(4.5));
    }

    #[test]
    fn status_fails_for_an_unknown_title() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());

        let status = Status {
            title: "Absent".to_string(),
            status: BookStatus::Read,
            rating: None,
            date_read: None,
            date_started: None,
        };
        assert!(status.run(&shelf).is_err());
    }

    #[test]
    fn stats_runs_on_an_empty_shelf() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());

        let stats = Stats {
            output: OutputFormat::Json,
        };
        stats.run(&shelf).expect("stats should succeed");
    }

    #[test]
    fn list_and_recommend_run_over_a_populated_shelf() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());
        add_command("First").run(&shelf).unwrap();
        add_command("Second").run(&shelf).unwrap();

        let list = List {
            status: Some(BookStatus::WantToRead),
            category: None,
        };
        list.run(&shelf).expect("list should succeed");

        let recommend = Recommend { limit: 1 };
        recommend.run(&shelf).expect("recommend should succeed");
    }

    #[test]
    fn search_rejects_an_invalid_regex() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());

        let search = Search {
            query: "(unclosed".to_string(),
            regex: true,
        };
        assert!(search.run(&shelf).is_err());
    }

    #[test]
    fn catalog_lives_under_the_configured_directory() {
        let tmp = tempdir().unwrap();
        let shelf = shelf_in(tmp.path());
        add_command("First").run(&shelf).unwrap();

        let raw = FsStore::new(tmp.path().to_path_buf())
            .read("books.json")
            .unwrap();
        let document = String::from_utf8(raw).unwrap();
        assert!(document.contains("\"title\": \"First\""));

        let titles: Vec<_> = shelf_in(tmp.path())
            .all()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, vec!["First"]);
    }
}
