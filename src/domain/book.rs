use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reading state of a book.
///
/// This is an unordered label, not a progression: moving directly from
/// `want-to-read` to `read` is legal, as is moving back again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    /// Finished.
    Read,
    /// In progress.
    CurrentlyReading,
    /// On the backlog.
    WantToRead,
}

impl BookStatus {
    /// Fixed ranking used as the primary sort key for the shelf:
    /// currently-reading books first, then read, then want-to-read.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::CurrentlyReading => 3,
            Self::Read => 2,
            Self::WantToRead => 1,
        }
    }

    /// Field effects applied when a book moves to this status.
    pub(crate) const fn transition_effects(self) -> TransitionEffects {
        // No transition clears previously-set fields: a book moved back to
        // want-to-read keeps its rating and read date.
        match self {
            Self::Read => TransitionEffects {
                stamp_date_read: true,
                stamp_date_started: false,
                set_rating: true,
            },
            Self::CurrentlyReading => TransitionEffects {
                stamp_date_read: false,
                stamp_date_started: true,
                set_rating: false,
            },
            Self::WantToRead => TransitionEffects {
                stamp_date_read: false,
                stamp_date_started: false,
                set_rating: false,
            },
        }
    }
}

/// What a status change stamps on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TransitionEffects {
    /// Stamp `date_read` with the supplied date or today.
    pub(crate) stamp_date_read: bool,
    /// Stamp `date_started` with the supplied date or today.
    pub(crate) stamp_date_started: bool,
    /// Apply a supplied rating.
    pub(crate) set_rating: bool,
}

/// One reading-list entry.
///
/// The title is the de facto unique key within the collection. Serialized
/// field names are camelCase to match the on-disk `books.json` format;
/// absent dates are omitted while `rating` is written as an explicit
/// `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Title, used for lookups.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Single category tag.
    pub category: String,
    /// Blurb or synopsis.
    pub description: String,
    /// Free-text notes by the list's owner.
    pub personal_notes: String,
    /// Rating on a 0–5 scale. Only meaningful when the book has been read.
    pub rating: Option<f32>,
    /// Year of publication.
    pub year: i32,
    /// Reading state.
    pub status: BookStatus,
    /// When the book was finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_read: Option<NaiveDate>,
    /// When reading began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_started: Option<NaiveDate>,
    /// When the book was added to the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<NaiveDate>,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Who recommended the book, if anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_by: Option<String>,
    /// Optional cover image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Book {
    /// The most relevant date for sorting: read date, else start date, else
    /// the date the book was added, else an epoch default.
    #[must_use]
    pub fn sort_date(&self) -> NaiveDate {
        self.date_read
            .or(self.date_started)
            .or(self.date_added)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Applies a status change and its per-transition field effects.
    ///
    /// Dates are stamped with the supplied value, falling back to `today`.
    /// A supplied rating is only applied on transitions for which a rating
    /// is meaningful. No fields are ever cleared.
    pub(crate) fn change_status(
        &mut self,
        status: BookStatus,
        change: &crate::reading::StatusChange,
        today: NaiveDate,
    ) {
        let effects = status.transition_effects();
        self.status = status;

        if effects.set_rating {
            if let Some(rating) = change.rating {
                self.rating = Some(rating);
            }
        }
        if effects.stamp_date_read {
            self.date_read = Some(change.date_read.unwrap_or(today));
        }
        if effects.stamp_date_started {
            self.date_started = Some(change.date_started.unwrap_or(today));
        }
    }

    /// Merges the supplied partial fields into this record.
    pub(crate) fn merge(&mut self, update: BookUpdate) {
        let BookUpdate {
            author,
            category,
            description,
            personal_notes,
            rating,
            year,
            status,
            date_read,
            date_started,
            date_added,
            tags,
            recommended_by,
            cover_image,
        } = update;

        if let Some(author) = author {
            self.author = author;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(personal_notes) = personal_notes {
            self.personal_notes = personal_notes;
        }
        if let Some(rating) = rating {
            self.rating = Some(rating);
        }
        if let Some(year) = year {
            self.year = year;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(date_read) = date_read {
            self.date_read = Some(date_read);
        }
        if let Some(date_started) = date_started {
            self.date_started = Some(date_started);
        }
        if let Some(date_added) = date_added {
            self.date_added = Some(date_added);
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(recommended_by) = recommended_by {
            self.recommended_by = Some(recommended_by);
        }
        if let Some(cover_image) = cover_image {
            self.cover_image = Some(cover_image);
        }
    }
}

/// Partial update of a book record.
///
/// `None` fields are left untouched by [`crate::Bookshelf::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    /// Replacement author.
    pub author: Option<String>,
    /// Replacement category.
    pub category: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement notes.
    pub personal_notes: Option<String>,
    /// Replacement rating.
    pub rating: Option<f32>,
    /// Replacement publication year.
    pub year: Option<i32>,
    /// Replacement status. Applied as a plain field set, without the
    /// transition effects of [`crate::Bookshelf::update_status`].
    pub status: Option<BookStatus>,
    /// Replacement read date.
    pub date_read: Option<NaiveDate>,
    /// Replacement start date.
    pub date_started: Option<NaiveDate>,
    /// Replacement added date.
    pub date_added: Option<NaiveDate>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement attribution.
    pub recommended_by: Option<String>,
    /// Replacement cover image path.
    pub cover_image: Option<String>,
}
