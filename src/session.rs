//! Viewer state: the loaded library plus which clipping is on screen.

use crate::json::{self, ImportError};
use crate::library::{self, LibraryError, Selection};
use crate::models::{Book, Clipping, Library};
use crate::parser::{self, ENTRY_DELIMITER};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    library: Library,
    selected: Option<String>,
    index: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Replaces the library with freshly parsed clippings text.
    pub fn load_text(&mut self, text: &str) {
        let library = parser::parse(text);
        info!(books = library.len(), "parsed clippings");
        self.replace(library);
    }

    /// Replaces the library with an exported JSON file. On error nothing changes.
    pub fn load_json(&mut self, text: &str) -> Result<(), ImportError> {
        let library = json::import_json(text)?;
        self.replace(library);
        Ok(())
    }

    /// Loads `.json` files as exports and anything else as clippings text.
    pub fn load_file(&mut self, path: &Path, text: &str) -> Result<(), ImportError> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            self.load_json(text)
        } else {
            self.load_text(text);
            Ok(())
        }
    }

    /// Parses pasted text once it looks like clippings. Returns whether it did.
    pub fn paste_text(&mut self, text: &str) -> bool {
        if !text.contains(ENTRY_DELIMITER) {
            return false;
        }
        self.load_text(text);
        true
    }

    pub fn select_book(&mut self, title: &str) -> Result<(), LibraryError> {
        if self.library.book(title).is_none() {
            return Err(LibraryError::BookNotFound(title.to_string()));
        }
        self.selected = Some(title.to_string());
        self.index = 0;
        Ok(())
    }

    /// Selects an exact clipping, failing instead of clamping. Index 0 of an
    /// empty book is accepted so the book itself can be deleted.
    pub fn select_clipping(&mut self, title: &str, index: usize) -> Result<(), LibraryError> {
        let book = self
            .library
            .book(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
        if index >= book.count().max(1) {
            return Err(LibraryError::IndexOutOfRange {
                title: title.to_string(),
                index,
                count: book.count(),
            });
        }
        self.selected = Some(title.to_string());
        self.index = index;
        Ok(())
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.selected
            .as_deref()
            .and_then(|title| self.library.book(title))
    }

    pub fn current(&self) -> Option<&Clipping> {
        self.current_book()
            .and_then(|book| book.clippings.get(self.index))
    }

    /// One-based position and total, as in "Clipping 2 of 7".
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_book().map(|book| (self.index + 1, book.count()))
    }

    pub fn next(&mut self) {
        let count = self.current_book().map(Book::count).unwrap_or(0);
        self.index = library::next_index(self.index, count);
    }

    pub fn prev(&mut self) {
        self.index = library::prev_index(self.index);
    }

    /// Jumps to `index`, clamped to the selected book.
    pub fn go_to(&mut self, index: usize) {
        let count = self.current_book().map(Book::count).unwrap_or(0);
        self.index = index.min(count.saturating_sub(1));
    }

    pub fn delete_current(&mut self) -> Result<(), LibraryError> {
        let Some(title) = self.selected.clone() else {
            return Ok(());
        };

        match library::delete_clipping(&mut self.library, &title, self.index)? {
            Some(Selection { title, index }) => {
                self.selected = Some(title);
                self.index = index;
            }
            None => {
                self.selected = None;
                self.index = 0;
            }
        }
        Ok(())
    }

    pub fn set_current_note(&mut self, text: &str) -> Result<(), LibraryError> {
        let Some(title) = self.selected.as_deref() else {
            return Ok(());
        };
        library::set_note(&mut self.library, title, self.index, text)
    }

    pub fn export_json(&self) -> String {
        json::export_json(&self.library)
    }

    fn replace(&mut self, library: Library) {
        self.selected = library.first().map(|b| b.title.clone());
        self.index = 0;
        self.library = library;
    }
}
