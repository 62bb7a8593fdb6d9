//! JSON interchange format: an array of
//! `{ title, clippings: [{ metadata, content, note, createdAt }], count }`.

use crate::models::{Book, Clipping, Library};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("invalid format: {0}")]
    InvalidJson(String),
}

#[derive(Serialize)]
struct BookOut<'a> {
    title: &'a str,
    clippings: Vec<ClippingOut<'a>>,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClippingOut<'a> {
    metadata: &'a str,
    content: &'a str,
    note: Option<&'a str>,
    created_at: &'a DateTime<Utc>,
}

// `notes` and `timestamp` are the names used by exports from the browser viewer.
#[derive(Deserialize)]
struct BookIn {
    title: String,
    #[serde(alias = "notes")]
    clippings: Vec<ClippingIn>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Deserialize)]
struct ClippingIn {
    metadata: String,
    content: String,
    #[serde(default)]
    note: Option<String>,
    #[serde(rename = "createdAt", alias = "timestamp")]
    created_at: DateTime<Utc>,
}

pub fn export_json(library: &Library) -> String {
    let books: Vec<BookOut> = library
        .books
        .iter()
        .map(|book| BookOut {
            title: &book.title,
            clippings: book
                .clippings
                .iter()
                .map(|c| ClippingOut {
                    metadata: &c.metadata,
                    content: &c.content,
                    note: c.note.as_deref(),
                    created_at: &c.created_at,
                })
                .collect(),
            count: book.count(),
        })
        .collect();

    // Only borrowed strings, numbers and timestamps: serialization cannot fail.
    serde_json::to_string_pretty(&books).expect("library serializes to JSON")
}

pub fn import_json(text: &str) -> Result<Library, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    if !value.is_array() {
        return Err(ImportError::InvalidJson(
            "expected an array of books".to_string(),
        ));
    }

    let records: Vec<BookIn> =
        serde_json::from_value(value).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut books = Vec::with_capacity(records.len());

    for record in records {
        let title = record.title.trim().to_string();
        if title.is_empty() {
            return Err(ImportError::InvalidJson("book with empty title".to_string()));
        }
        if !seen.insert(title.clone()) {
            return Err(ImportError::InvalidJson(format!(
                "duplicate book title: {}",
                title
            )));
        }
        if let Some(count) = record.count {
            if count != record.clippings.len() {
                return Err(ImportError::InvalidJson(format!(
                    "'{}' declares {} clippings but lists {}",
                    title,
                    count,
                    record.clippings.len()
                )));
            }
        }

        let clippings = record
            .clippings
            .into_iter()
            .map(|c| Clipping {
                metadata: c.metadata,
                content: c.content,
                note: c.note,
                created_at: c.created_at,
            })
            .collect();

        books.push(Book { title, clippings });
    }

    info!(books = books.len(), "imported library from JSON");
    Ok(Library::new(books))
}
