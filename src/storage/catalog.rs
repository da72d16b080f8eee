//! Serialization for the aggregate book catalog.
//!
//! The entire reading list lives in one JSON document and is rewritten in
//! full, pretty-printed, on every mutation.

use crate::domain::Book;

/// Parses the catalog document into book records.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid JSON array of books.
pub fn read(bytes: &[u8]) -> Result<Vec<Book>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes the catalog, pretty-printed with a trailing newline.
///
/// # Panics
///
/// Panics if serialization fails, which cannot happen for [`Book`] records.
#[must_use]
pub fn write(books: &[Book]) -> Vec<u8> {
    let mut bytes = serde_json::to_vec_pretty(books).expect("book serialization is infallible");
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::BookStatus;

    #[test]
    fn reads_camel_case_fields() {
        let input = r#"[
  {
    "title": "The Pragmatic Programmer",
    "author": "Hunt & Thomas",
    "category": "Software",
    "description": "Journeyman to master.",
    "personalNotes": "Re-read every few years.",
    "rating": 5,
    "year": 1999,
    "status": "read",
    "dateRead": "2023-06-10",
    "tags": ["craft", "career"],
    "recommendedBy": "A colleague"
  }
]"#;

        let books = read(input.as_bytes()).unwrap();
        assert_eq!(books.len(), 1);

        let book = &books[0];
        assert_eq!(book.personal_notes, "Re-read every few years.");
        assert_eq!(book.status, BookStatus::Read);
        assert_eq!(book.date_read, NaiveDate::from_ymd_opt(2023, 6, 10));
        assert_eq!(book.date_started, None);
        assert_eq!(book.recommended_by.as_deref(), Some("A colleague"));
    }

    #[test]
    fn null_rating_round_trips() {
        let input = r#"[
  {
    "title": "Unrated",
    "author": "A",
    "category": "Fiction",
    "description": "",
    "personalNotes": "",
    "rating": null,
    "year": 2021,
    "status": "want-to-read",
    "tags": []
  }
]"#;

        let books = read(input.as_bytes()).unwrap();
        assert_eq!(books[0].rating, None);

        let out = String::from_utf8(write(&books)).unwrap();
        // rating stays explicit; absent dates stay absent
        assert!(out.contains("\"rating\": null"));
        assert!(!out.contains("dateRead"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn write_then_read_preserves_records() {
        let books = read(br#"[{"title":"T","author":"A","category":"C","description":"D","personalNotes":"N","rating":3.5,"year":2020,"status":"read","dateRead":"2024-02-01","tags":["x"]}]"#).unwrap();
        let reloaded = read(&write(&books)).unwrap();
        assert_eq!(books, reloaded);
    }

    #[test]
    fn malformed_document_fails() {
        assert!(read(b"not json").is_err());
        assert!(read(b"{\"title\": \"object, not array\"}").is_err());
    }
}
