use crate::models::{Book, Clipping, Library, RawEntry};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const ENTRY_DELIMITER: &str = "==========";
pub const CLIPPINGS_FILE_NAME: &str = "My Clippings.txt";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a "My Clippings.txt" export. Never fails: segments that cannot be
/// read as an entry are skipped, as are notes with no highlight to attach to.
pub fn parse(text: &str) -> Library {
    parse_at(text, Utc::now())
}

pub fn parse_at(text: &str, now: DateTime<Utc>) -> Library {
    let entries = split_entries(text);
    link_notes(&entries, now)
}

pub fn split_entries(text: &str) -> Vec<RawEntry> {
    // Kindle writes a BOM before the first title; str::trim leaves it in place.
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    text.split(ENTRY_DELIMITER)
        .filter(|segment| !segment.trim().is_empty())
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(segment: &str) -> Option<RawEntry> {
    let lines: Vec<&str> = segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    // title, metadata, and at least one line of content
    if lines.len() < 3 {
        debug!(lines = lines.len(), "skipping incomplete clippings entry");
        return None;
    }

    Some(RawEntry::new(
        lines[0].to_string(),
        lines[1].to_string(),
        lines[2..].join("\n"),
    ))
}

fn link_notes(entries: &[RawEntry], now: DateTime<Utc>) -> Library {
    let mut by_title: IndexMap<&str, Vec<Clipping>> = IndexMap::new();
    let mut previous: Option<&RawEntry> = None;

    for entry in entries {
        let clippings = by_title.entry(entry.title.as_str()).or_default();

        if entry.is_note {
            // Adjacency is judged on whole-file order, not per-book order.
            let follows_highlight =
                previous.is_some_and(|p| p.title == entry.title && !p.is_note);

            match clippings.last_mut() {
                Some(last) if follows_highlight => last.note = Some(entry.content.clone()),
                _ => debug!(title = %entry.title, "dropping note with no preceding highlight"),
            }
        } else {
            clippings.push(Clipping {
                metadata: entry.metadata.clone(),
                content: entry.content.clone(),
                note: None,
                created_at: now,
            });
        }

        previous = Some(entry);
    }

    // Titles seen only through dropped notes stay in as empty books.
    let books = by_title
        .into_iter()
        .map(|(title, clippings)| Book {
            title: title.to_string(),
            clippings,
        })
        .collect();

    Library::new(books)
}

pub fn find_clippings_files(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .file_name()
                .map(|n| n.to_string_lossy() == CLIPPINGS_FILE_NAME)
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    found.sort();
    found
}
