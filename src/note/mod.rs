//! Daily work notes: the data model, both codecs, and the file-backed store.
//!
//! One markdown file per (date, workplace) pair. The filename codec maps the
//! pair to a name, the markdown codec maps note contents to the canonical
//! file layout, and [`NoteStore`] ties both to a notes directory.

pub mod filename;
pub mod markdown;
pub mod model;
pub mod store;

pub use model::{Note, WorkItem};
pub use store::NoteStore;
