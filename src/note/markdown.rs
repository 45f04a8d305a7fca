//! Markdown codec: the canonical persisted form of a note.
//!
//! [`serialize`] produces the exact on-disk layout (frontmatter, title,
//! inline summary fields, two checklist sections) byte for byte, so external
//! tools that already read these files keep working. [`parse`] is the
//! inverse: a line-oriented pass that is strict about frontmatter structure
//! and tolerant of stray lines inside the body, per the round-trip law
//! `parse(serialize(n)) == n`.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CodecError;
use crate::note::model::{Note, WorkItem};

// ---------------------------------------------------------------------------
// Serialize
// ---------------------------------------------------------------------------

/// Render a note in its canonical markdown layout.
pub fn serialize(note: &Note) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("id: {}\n", note.id));
    out.push_str("aliases: []\n");
    out.push_str("tags:\n");
    for tag in &note.tags {
        out.push_str(&format!("  - {tag}\n"));
    }
    out.push_str(&format!("date: {}\n", note.date.format("%Y-%m-%d")));
    out.push_str("---\n\n");

    out.push_str(&format!("# {}\n\n", note.title));

    out.push_str(&format!("summary::{}\n\n", inline_value(&note.summary)));
    out.push_str(&format!(
        "yesterday's summary::{}\n\n",
        inline_value(&note.yesterday_summary)
    ));

    out.push_str("## Pending Work\n\n");
    for item in &note.pending_work {
        out.push_str(&format!("- [ ] {}\n", item.text));
    }
    out.push('\n');

    out.push_str("## Work Completed\n\n");
    for item in &note.completed_work {
        out.push_str(&format!("- [x] {}\n", item.text));
    }
    out.push('\n');

    out
}

/// An empty inline field renders as the bare marker, with no trailing space.
fn inline_value(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!(" {value}")
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Which part of the note body the line walker is currently inside.
#[derive(PartialEq)]
enum Section {
    None,
    Pending,
    Completed,
    Other,
}

/// Parse note markdown back into a [`Note`].
///
/// Structure errors (an unterminated frontmatter block, a missing or
/// unparseable `date:`) fail the parse. Everything else is tolerant: unknown
/// frontmatter keys, stray lines inside checklist sections, and absent
/// fields are skipped or default to empty. A note without an `id:` gets a
/// freshly generated one. The returned note has no file path; the store
/// assigns it.
pub fn parse(text: &str) -> Result<Note, CodecError> {
    let mut lines = text.lines().peekable();

    let mut id = String::new();
    let mut tags: Vec<String> = Vec::new();
    let mut date: Option<NaiveDate> = None;

    if lines.peek() == Some(&"---") {
        lines.next();
        let mut terminated = false;
        let mut in_tags = false;
        for line in lines.by_ref() {
            if line.trim_end() == "---" {
                terminated = true;
                break;
            }
            if let Some(value) = line.strip_prefix("id:") {
                id = value.trim().to_string();
                in_tags = false;
            } else if line.trim_end() == "tags:" {
                in_tags = true;
            } else if let Some(value) = line.strip_prefix("date:") {
                let value = value.trim();
                date = Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    CodecError::InvalidDate {
                        value: value.to_string(),
                    }
                })?);
                in_tags = false;
            } else if in_tags {
                if let Some(tag) = line.trim_start().strip_prefix("- ") {
                    tags.push(tag.trim().to_string());
                } else if !line.starts_with(' ') {
                    in_tags = false;
                }
            }
        }
        if !terminated {
            return Err(CodecError::UnterminatedFrontmatter);
        }
    }

    let date = date.ok_or(CodecError::MissingDate)?;
    if id.is_empty() {
        id = Uuid::new_v4().to_string();
    }

    let mut title = String::new();
    let mut saw_title = false;
    let mut summary = String::new();
    let mut yesterday_summary = String::new();
    let mut pending_work: Vec<WorkItem> = Vec::new();
    let mut completed_work: Vec<WorkItem> = Vec::new();
    let mut section = Section::None;

    for line in lines {
        if let Some(heading) = line.strip_prefix("## ") {
            section = match heading.trim() {
                "Pending Work" => Section::Pending,
                "Work Completed" => Section::Completed,
                _ => Section::Other,
            };
            continue;
        }
        if !saw_title {
            if let Some(t) = line.strip_prefix("# ") {
                title = t.trim().to_string();
                saw_title = true;
                continue;
            }
        }
        if let Some(value) = line.strip_prefix("yesterday's summary::") {
            yesterday_summary = value.trim().to_string();
            continue;
        }
        if let Some(value) = line.strip_prefix("summary::") {
            summary = value.trim().to_string();
            continue;
        }
        match section {
            Section::Pending => {
                if let Some(text) = unchecked_item(line) {
                    pending_work.push(WorkItem {
                        text: text.to_string(),
                        completed: false,
                    });
                }
            }
            Section::Completed => {
                if let Some(text) = checked_item(line) {
                    completed_work.push(WorkItem {
                        text: text.to_string(),
                        completed: true,
                    });
                }
            }
            Section::None | Section::Other => {}
        }
    }

    Ok(Note {
        id,
        date,
        title,
        tags,
        summary,
        yesterday_summary,
        pending_work,
        completed_work,
        file_path: None,
    })
}

fn unchecked_item(line: &str) -> Option<&str> {
    line.strip_prefix("- [ ] ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn checked_item(line: &str) -> Option<&str> {
    line.strip_prefix("- [x] ")
        .or_else(|| line.strip_prefix("- [X] "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
