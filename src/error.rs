//! Rich diagnostic error types for the worklog note core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the worklog core.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum WorklogError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Note model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum NoteError {
    #[error("work item text cannot be empty")]
    #[diagnostic(
        code(worklog::note::empty_item),
        help(
            "Provide non-empty text for the work item. Leading and trailing \
             whitespace is stripped before validation, so whitespace-only \
             text is rejected too."
        )
    )]
    EmptyItemText,

    #[error("pending item index {index} out of range: note has {pending_len} pending item(s)")]
    #[diagnostic(
        code(worklog::note::index_out_of_range),
        help(
            "Indices are zero-based positions in the pending list. \
             Completing or removing an item shifts every index after it, \
             so apply batches of indices in descending order."
        )
    )]
    IndexOutOfRange { index: usize, pending_len: usize },
}

// ---------------------------------------------------------------------------
// Markdown codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    #[error("unterminated frontmatter: no closing `---` line")]
    #[diagnostic(
        code(worklog::codec::unterminated_frontmatter),
        help(
            "A work note opens with a `---` frontmatter block that must be \
             closed by a second `---` line before the note body."
        )
    )]
    UnterminatedFrontmatter,

    #[error("frontmatter has no `date:` field")]
    #[diagnostic(
        code(worklog::codec::missing_date),
        help(
            "Every work note records its day in the frontmatter as \
             `date: YYYY-MM-DD`. Without it the note cannot be placed \
             in the log."
        )
    )]
    MissingDate,

    #[error("invalid date in frontmatter: {value}")]
    #[diagnostic(
        code(worklog::codec::invalid_date),
        help("Note dates use the calendar format YYYY-MM-DD, e.g. 2024-06-10.")
    )]
    InvalidDate { value: String },
}

// ---------------------------------------------------------------------------
// Note store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {path}")]
    #[diagnostic(
        code(worklog::store::io),
        help(
            "A filesystem operation on the notes directory failed. Check that \
             the directory exists, has correct permissions, and that the disk \
             is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed note file: {path}")]
    #[diagnostic(
        code(worklog::store::malformed),
        help(
            "The file matches the work-note naming scheme but its contents did \
             not parse. Fix the file by hand or move it out of the notes \
             directory."
        )
    )]
    Malformed {
        path: String,
        #[source]
        source: CodecError,
    },
}

/// Convenience alias for functions returning worklog results.
pub type WorklogResult<T> = std::result::Result<T, WorklogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_error_converts_to_worklog_error() {
        let err = NoteError::IndexOutOfRange {
            index: 5,
            pending_len: 2,
        };
        let top: WorklogError = err.into();
        assert!(matches!(
            top,
            WorklogError::Note(NoteError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn codec_error_converts_to_worklog_error() {
        let err = CodecError::MissingDate;
        let top: WorklogError = err.into();
        assert!(matches!(top, WorklogError::Codec(CodecError::MissingDate)));
    }

    #[test]
    fn store_error_preserves_codec_source() {
        let err = StoreError::Malformed {
            path: "/notes/2024-06-10-Work.md".into(),
            source: CodecError::UnterminatedFrontmatter,
        };
        let msg = format!("{err}");
        assert!(msg.contains("2024-06-10-Work.md"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = NoteError::IndexOutOfRange {
            index: 7,
            pending_len: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }
}
