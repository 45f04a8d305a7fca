// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # worklog
//!
//! A daily work-log manager: one markdown note per day and workplace, with
//! pending and completed work items tracked as checklists.
//!
//! ## Architecture
//!
//! - **Note core** (`note`): data model, markdown codec, filename codec, and
//!   the directory-backed note store
//! - **Config** (`config`): TOML configuration with per-field defaults
//! - **Summarizer** (`summarizer`): HTTP client for the OpenCode server that
//!   turns completed items into a short AI summary
//! - **Prompts** (`prompt`): interactive stdin prompts for the CLI workflows
//!
//! ## Library usage
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use worklog::note::NoteStore;
//!
//! let store = NoteStore::new("/path/to/notes".into(), "Work");
//! let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//! let mut note = store
//!     .find_for_date(date)
//!     .unwrap()
//!     .unwrap_or_else(|| store.create_for_date(date));
//! note.add_pending_item("write the quarterly report").unwrap();
//! store.write(&mut note).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod note;
pub mod prompt;
pub mod summarizer;
