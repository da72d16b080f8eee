//! The reading-list repository.
//!
//! The whole collection lives in a single JSON catalog. Reads load the
//! document fresh on every operation; mutations rewrite it in full. There
//! is no locking: the list has exactly one author, and a concurrent writer
//! would silently win last.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::{
    domain::{Book, BookStatus, BookUpdate},
    storage::{catalog, Store},
};

/// The key of the catalog document within the shelf's store.
pub const CATALOG_KEY: &str = "books.json";

/// How many categories and tags the statistics rank.
const TOP_N: usize = 5;

/// How many favourite categories drive recommendations.
const FAVOURITE_CATEGORIES: usize = 3;

/// A reading list backed by a single-document [`Store`].
///
/// A missing or malformed catalog yields an empty collection with an error
/// log; the presentation layer never sees a hard failure from a read.
/// Mutations report success as a boolean and never roll back, since the
/// document is written all-or-nothing.
#[derive(Debug, Clone)]
pub struct Bookshelf<S> {
    store: S,
}

impl<S: Store> Bookshelf<S> {
    /// Creates a shelf over the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Every book, sorted for display.
    ///
    /// Primary key: status priority descending (currently-reading, then
    /// read, then want-to-read). Secondary key: the most relevant date for
    /// the book, descending, so the most recently dated book leads its
    /// tier. The sort is stable.
    #[must_use]
    pub fn all(&self) -> Vec<Book> {
        let mut books = self.load();
        books.sort_by(|a, b| {
            b.status
                .priority()
                .cmp(&a.status.priority())
                .then_with(|| b.sort_date().cmp(&a.sort_date()))
        });
        books
    }

    /// Books with the given status, inheriting the order of [`Self::all`].
    #[must_use]
    pub fn by_status(&self, status: BookStatus) -> Vec<Book> {
        self.all()
            .into_iter()
            .filter(|book| book.status == status)
            .collect()
    }

    /// Finished books, most recently read first.
    #[must_use]
    pub fn finished(&self) -> Vec<Book> {
        let mut books = self.by_status(BookStatus::Read);
        books.sort_by(|a, b| {
            b.date_read
                .unwrap_or(NaiveDate::MIN)
                .cmp(&a.date_read.unwrap_or(NaiveDate::MIN))
        });
        books
    }

    /// Books currently in progress.
    #[must_use]
    pub fn currently_reading(&self) -> Vec<Book> {
        self.by_status(BookStatus::CurrentlyReading)
    }

    /// The backlog.
    #[must_use]
    pub fn want_to_read(&self) -> Vec<Book> {
        self.by_status(BookStatus::WantToRead)
    }

    /// Books in the given category.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Book> {
        self.all()
            .into_iter()
            .filter(|book| book.category == category)
            .collect()
    }

    /// Distinct categories, alphabetical.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.load().into_iter().map(|book| book.category).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Distinct tags across the collection, alphabetical.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .load()
            .into_iter()
            .flat_map(|book| book.tags)
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Case-insensitive substring search over title, author, category,
    /// personal notes and tags.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Book> {
        let needle = query.to_lowercase();
        self.all()
            .into_iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
                    || book.category.to_lowercase().contains(&needle)
                    || book.personal_notes.to_lowercase().contains(&needle)
                    || book
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Appends a book and persists the whole catalog.
    ///
    /// Stamps `date_added` with today when the record carries none.
    /// Returns `false` if the write fails.
    pub fn add(&self, mut book: Book) -> bool {
        if book.date_added.is_none() {
            book.date_added = Some(today());
        }

        let mut books = self.load();
        books.push(book);
        self.persist(&books)
    }

    /// Merges partial fields into the first book with a matching title and
    /// persists.
    ///
    /// Returns `false` when no title matches or the write fails.
    pub fn update(&self, title: &str, update: BookUpdate) -> bool {
        let mut books = self.load();
        let Some(book) = books.iter_mut().find(|book| book.title == title) else {
            tracing::debug!("No book titled '{title}' to update");
            return false;
        };

        book.merge(update);
        self.persist(&books)
    }

    /// Moves a book to a new status, applying that status's field effects.
    ///
    /// Transitioning to read applies the supplied rating (if any) and
    /// stamps the read date; transitioning to currently-reading stamps the
    /// start date; transitioning to want-to-read stamps nothing and clears
    /// nothing. Dates default to today when not supplied.
    ///
    /// Returns `false` when no title matches or the write fails.
    pub fn update_status(&self, title: &str, status: BookStatus, change: &StatusChange) -> bool {
        let mut books = self.load();
        let Some(book) = books.iter_mut().find(|book| book.title == title) else {
            tracing::debug!("No book titled '{title}' to update");
            return false;
        };

        book.change_status(status, change, today());
        self.persist(&books)
    }

    /// Aggregate statistics over the collection.
    #[must_use]
    pub fn stats(&self) -> ReadingStats {
        let books = self.load();

        let total = books.len();
        let read = count_status(&books, BookStatus::Read);
        let currently_reading = count_status(&books, BookStatus::CurrentlyReading);
        let want_to_read = count_status(&books, BookStatus::WantToRead);

        let ratings: Vec<f64> = books
            .iter()
            .filter(|book| book.status == BookStatus::Read)
            .filter_map(|book| book.rating)
            .map(f64::from)
            .collect();
        let rated = ratings.len();
        let average_rating = if rated == 0 {
            0.0
        } else {
            round_to_tenth(ratings.iter().sum::<f64>() / usize_to_f64(rated))
        };

        let category_counts = frequency(books.iter().map(|book| book.category.as_str()));
        let top_categories = top_n(&category_counts, TOP_N);
        let top_tags = top_n(
            &frequency(books.iter().flat_map(|book| book.tags.iter().map(String::as_str))),
            TOP_N,
        );

        let read_years: Vec<i32> = books
            .iter()
            .filter(|book| book.status == BookStatus::Read)
            .map(|book| book.year)
            .collect();
        let year_range = match (read_years.iter().min(), read_years.iter().max()) {
            (Some(&earliest), Some(&latest)) => Some(YearRange { earliest, latest }),
            _ => None,
        };

        ReadingStats {
            total,
            read,
            currently_reading,
            want_to_read,
            average_rating,
            category_counts,
            top_categories,
            top_tags,
            year_range,
            rated,
        }
    }

    /// Up to `limit` want-to-read books, favourites first.
    ///
    /// With no read books the backlog is returned unmodified. Otherwise
    /// the three categories with the highest average rating among read and
    /// rated books are treated as favourites, and the backlog is
    /// stable-partitioned so favourite-category books lead. A heuristic,
    /// not a recommender.
    #[must_use]
    pub fn recommendations(&self, limit: usize) -> Vec<Book> {
        let want_to_read = self.want_to_read();
        let finished = self.finished();

        if finished.is_empty() {
            return want_to_read.into_iter().take(limit).collect();
        }

        let favourites = favourite_categories(&finished);

        let (favoured, rest): (Vec<Book>, Vec<Book>) = want_to_read
            .into_iter()
            .partition(|book| favourites.contains(&book.category));

        favoured.into_iter().chain(rest).take(limit).collect()
    }

    /// Reads the catalog, treating a missing or malformed document as
    /// empty.
    fn load(&self) -> Vec<Book> {
        let bytes = match self.store.read(CATALOG_KEY) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No catalog at {CATALOG_KEY}: {error}");
                return Vec::new();
            }
            Err(error) => {
                tracing::error!("Error loading books: {error}");
                return Vec::new();
            }
        };

        catalog::read(&bytes).unwrap_or_else(|error| {
            tracing::error!("Error parsing books: {error}");
            Vec::new()
        })
    }

    fn persist(&self, books: &[Book]) -> bool {
        match self.store.write(CATALOG_KEY, &catalog::write(books)) {
            Ok(()) => true,
            Err(error) => {
                tracing::error!("Error saving books: {error}");
                false
            }
        }
    }
}

/// Optional data accompanying a status change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusChange {
    /// Rating to apply when moving to read.
    pub rating: Option<f32>,
    /// Read date; defaults to today when moving to read.
    pub date_read: Option<NaiveDate>,
    /// Start date; defaults to today when moving to currently-reading.
    pub date_started: Option<NaiveDate>,
}

/// Aggregate statistics over the reading list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingStats {
    /// Number of books in the collection.
    pub total: usize,
    /// Number of books marked read.
    pub read: usize,
    /// Number of books in progress.
    pub currently_reading: usize,
    /// Number of books on the backlog.
    pub want_to_read: usize,
    /// Mean rating over read, rated books, rounded to one decimal.
    /// Zero when nothing is rated.
    pub average_rating: f64,
    /// Books per category, in first-encountered order.
    pub category_counts: Vec<(String, usize)>,
    /// The most common categories, ties broken by first encounter.
    pub top_categories: Vec<String>,
    /// The most common tags, ties broken by first encounter.
    pub top_tags: Vec<String>,
    /// Publication-year span of read books; `None` when nothing is read.
    pub year_range: Option<YearRange>,
    /// Number of read books carrying a rating.
    pub rated: usize,
}

/// Earliest and latest publication year among read books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    /// Smallest publication year.
    pub earliest: i32,
    /// Largest publication year.
    pub latest: i32,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn count_status(books: &[Book], status: BookStatus) -> usize {
    books.iter().filter(|book| book.status == status).count()
}

/// Counts occurrences, preserving first-encounter order of the keys.
fn frequency<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(key, _)| key == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts
}

/// The `n` most frequent keys; the sort is stable so ties keep
/// first-encounter order.
fn top_n(counts: &[(String, usize)], n: usize) -> Vec<String> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(key, _)| key).collect()
}

/// Categories with the highest average rating among read, rated books.
fn favourite_categories(finished: &[Book]) -> Vec<String> {
    let mut by_category: Vec<(String, Vec<f64>)> = Vec::new();
    for book in finished {
        let Some(rating) = book.rating else {
            continue;
        };
        match by_category
            .iter_mut()
            .find(|(category, _)| category == &book.category)
        {
            Some((_, ratings)) => ratings.push(f64::from(rating)),
            None => by_category.push((book.category.clone(), vec![f64::from(rating)])),
        }
    }

    let mut averages: Vec<(String, f64)> = by_category
        .into_iter()
        .map(|(category, ratings)| {
            let average = ratings.iter().sum::<f64>() / usize_to_f64(ratings.len());
            (category, average)
        })
        .collect();
    averages.sort_by(|a, b| b.1.total_cmp(&a.1));

    averages
        .into_iter()
        .take(FAVOURITE_CATEGORIES)
        .map(|(category, _)| category)
        .collect()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Collection sizes are far below 2^52.
#[allow(clippy::cast_precision_loss)]
fn usize_to_f64(value: usize) -> f64 {
    value as f64
}
