use chrono::{DateTime, Utc};

pub const NOTE_MARKER: &str = "Your Note";

/// One `==========`-delimited record, before notes are linked to highlights.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub title: String,
    pub metadata: String,
    pub content: String,
    pub is_note: bool,
}

impl RawEntry {
    pub fn new(title: String, metadata: String, content: String) -> Self {
        let is_note = metadata.contains(NOTE_MARKER);
        RawEntry {
            title,
            metadata,
            content,
            is_note,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clipping {
    pub metadata: String,
    pub content: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub clippings: Vec<Clipping>,
}

impl Book {
    pub fn count(&self) -> usize {
        self.clippings.len()
    }
}

/// Books in the order their titles first appeared in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    pub books: Vec<Book>,
}

impl Library {
    pub fn new(books: Vec<Book>) -> Self {
        Library { books }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn book(&self, title: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.title == title)
    }

    pub fn book_mut(&mut self, title: &str) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.title == title)
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.books.iter().position(|b| b.title == title)
    }

    pub fn first(&self) -> Option<&Book> {
        self.books.first()
    }
}
