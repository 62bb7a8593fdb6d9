use crate::models::{Book, Library};
use tracing::info;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum LibraryError {
    #[error("book not found: {0}")]
    BookNotFound(String),
    #[error("clipping {index} out of range for '{title}' ({count} clippings)")]
    IndexOutOfRange {
        title: String,
        index: usize,
        count: usize,
    },
}

/// The book and clipping a viewer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub title: String,
    pub index: usize,
}

impl Selection {
    pub fn new(title: impl Into<String>, index: usize) -> Self {
        Selection {
            title: title.into(),
            index,
        }
    }
}

/// Removes one clipping, dropping the book once it has none left, and returns
/// what should be selected afterwards. A book that is already empty (a title
/// seen only through dropped notes) is removed whatever the index.
pub fn delete_clipping(
    library: &mut Library,
    title: &str,
    index: usize,
) -> Result<Option<Selection>, LibraryError> {
    let position = library
        .position(title)
        .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;

    let book = &mut library.books[position];
    if book.count() > 0 {
        check_index(book, index)?;
        book.clippings.remove(index);
        info!(title, index, remaining = book.count(), "deleted clipping");
    }

    if book.count() > 0 {
        let last = book.count() - 1;
        return Ok(Some(Selection::new(title, index.min(last))));
    }

    library.books.remove(position);
    info!(title, "removed book with no clippings left");

    // The following book slides into the removed slot; wrap to the front
    // when the last book was removed.
    let next = library
        .books
        .get(position)
        .or_else(|| library.first())
        .map(|b| Selection::new(b.title.clone(), 0));

    Ok(next)
}

/// Sets or clears a clipping's note. Blank text clears it.
pub fn set_note(
    library: &mut Library,
    title: &str,
    index: usize,
    text: &str,
) -> Result<(), LibraryError> {
    let book = library
        .book_mut(title)
        .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
    check_index(book, index)?;

    let trimmed = text.trim();
    book.clippings[index].note = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    };

    Ok(())
}

pub fn next_index(index: usize, count: usize) -> usize {
    if index + 1 < count {
        index + 1
    } else {
        index.min(count.saturating_sub(1))
    }
}

pub fn prev_index(index: usize) -> usize {
    index.saturating_sub(1)
}

fn check_index(book: &Book, index: usize) -> Result<(), LibraryError> {
    if index >= book.count() {
        return Err(LibraryError::IndexOutOfRange {
            title: book.title.clone(),
            index,
            count: book.count(),
        });
    }
    Ok(())
}
