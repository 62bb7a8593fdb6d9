pub mod config;
pub mod json;
pub mod library;
pub mod models;
pub mod parser;
pub mod session;

pub use json::{export_json, import_json, ImportError};
pub use library::{delete_clipping, set_note, LibraryError, Selection};
pub use models::{Book, Clipping, Library, RawEntry};
pub use parser::parse;
pub use session::Session;
