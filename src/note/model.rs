//! The in-memory note model and its mutation operations.
//!
//! A [`Note`] is one day's work log for a single workplace: frontmatter
//! identity, two summary fields, and two ordered work-item lists. All
//! mutations happen in place and do not persist; the store decides when a
//! note is written back to disk.

use std::path::PathBuf;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::NoteError;

/// A single unit of work tracked in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Item text, stored verbatim (it may itself contain `[` or `]`).
    pub text: String,
    /// Mirrors which list the item lives in.
    pub completed: bool,
}

/// One day's work-log note.
///
/// Everything in `pending_work` has `completed == false` and everything in
/// `completed_work` has `completed == true`; both lists keep insertion order.
/// `file_path` stays `None` until the note is first associated with a
/// concrete file and is never re-pointed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Stable identifier, assigned at creation.
    pub id: String,
    /// The day this note covers. Unique per workplace.
    pub date: NaiveDate,
    /// Display title, derived from the date.
    pub title: String,
    /// Frontmatter tags, in order.
    pub tags: Vec<String>,
    /// Summary of this day's work. Empty means not yet written.
    pub summary: String,
    /// Summary carried over from the previous day's note.
    pub yesterday_summary: String,
    /// Work not yet done, in insertion order.
    pub pending_work: Vec<WorkItem>,
    /// Work done, in completion order.
    pub completed_work: Vec<WorkItem>,
    /// On-disk location, once known.
    pub file_path: Option<PathBuf>,
}

impl Note {
    /// Create a fresh note for a day at a workplace.
    ///
    /// The note gets a generated id, a title derived from the date, the
    /// default tag set, empty summaries, and empty work lists. No file path
    /// is assigned; that happens when a store first persists the note.
    pub fn new(date: NaiveDate, workplace: &str) -> Self {
        Note {
            id: Uuid::new_v4().to_string(),
            date,
            title: default_title(date),
            tags: default_tags(workplace),
            summary: String::new(),
            yesterday_summary: String::new(),
            pending_work: Vec::new(),
            completed_work: Vec::new(),
            file_path: None,
        }
    }

    /// Append a pending work item.
    ///
    /// The text is trimmed first; text that is empty after trimming is
    /// rejected. Does not persist.
    pub fn add_pending_item(&mut self, text: &str) -> Result<(), NoteError> {
        let text = validate_item_text(text)?;
        self.pending_work.push(WorkItem {
            text,
            completed: false,
        });
        Ok(())
    }

    /// Append an already-completed work item, with the same validation as
    /// [`Note::add_pending_item`].
    pub fn add_completed_item(&mut self, text: &str) -> Result<(), NoteError> {
        let text = validate_item_text(text)?;
        self.completed_work.push(WorkItem {
            text,
            completed: true,
        });
        Ok(())
    }

    /// Move the pending item at `index` to the end of the completed list.
    ///
    /// Removing the item shifts every later pending index down by one, so
    /// callers marking several items in one batch must apply their indices
    /// in descending order. [`Note::complete_items`] does that for you.
    pub fn mark_item_completed(&mut self, index: usize) -> Result<(), NoteError> {
        if index >= self.pending_work.len() {
            return Err(NoteError::IndexOutOfRange {
                index,
                pending_len: self.pending_work.len(),
            });
        }
        let mut item = self.pending_work.remove(index);
        item.completed = true;
        self.completed_work.push(item);
        Ok(())
    }

    /// Mark a batch of distinct pending indices completed.
    ///
    /// Indices refer to positions in the pending list as it was when the
    /// caller collected them; they are applied in descending order so that
    /// earlier removals cannot shift later ones.
    pub fn complete_items(&mut self, indices: &[usize]) -> Result<(), NoteError> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        for &index in &sorted {
            self.mark_item_completed(index)?;
        }
        Ok(())
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending_work.is_empty()
    }

    pub fn has_completed_work(&self) -> bool {
        !self.completed_work.is_empty()
    }
}

fn validate_item_text(text: &str) -> Result<String, NoteError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NoteError::EmptyItemText);
    }
    Ok(text.to_string())
}

/// Human-readable title for a day, e.g. `Monday, June 10, 2024`.
pub fn default_title(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn default_tags(workplace: &str) -> Vec<String> {
    let mut tags = vec!["worklog".to_string()];
    let slug = workplace_slug(workplace);
    if !slug.is_empty() {
        tags.push(slug);
    }
    tags
}

/// Lowercase tag form of a workplace name, safe for frontmatter tag lists.
fn workplace_slug(workplace: &str) -> String {
    workplace
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn texts(items: &[WorkItem]) -> Vec<&str> {
        items.iter().map(|i| i.text.as_str()).collect()
    }

    #[test]
    fn new_note_has_defaults_and_no_path() {
        let note = Note::new(date(2024, 6, 10), "Work");
        assert!(!note.id.is_empty());
        assert_eq!(note.title, "Monday, June 10, 2024");
        assert_eq!(note.tags, vec!["worklog", "work"]);
        assert!(note.summary.is_empty());
        assert!(note.yesterday_summary.is_empty());
        assert!(!note.has_pending_work());
        assert!(!note.has_completed_work());
        assert_eq!(note.file_path, None);
    }

    #[test]
    fn notes_get_distinct_ids() {
        let a = Note::new(date(2024, 6, 10), "Work");
        let b = Note::new(date(2024, 6, 10), "Work");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn add_pending_trims_and_preserves_order() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        note.add_pending_item("  write docs  ").unwrap();
        note.add_pending_item("ship release").unwrap();
        assert_eq!(texts(&note.pending_work), ["write docs", "ship release"]);
        assert!(note.pending_work.iter().all(|i| !i.completed));
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        assert!(matches!(
            note.add_pending_item("   "),
            Err(NoteError::EmptyItemText)
        ));
        assert!(matches!(
            note.add_completed_item(""),
            Err(NoteError::EmptyItemText)
        ));
        assert!(!note.has_pending_work());
    }

    #[test]
    fn add_completed_sets_flag() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        note.add_completed_item("fix login bug").unwrap();
        assert_eq!(texts(&note.completed_work), ["fix login bug"]);
        assert!(note.completed_work[0].completed);
    }

    #[test]
    fn mark_completed_moves_item_to_end_of_completed() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        for text in ["a", "b", "c"] {
            note.add_pending_item(text).unwrap();
        }
        note.add_completed_item("earlier").unwrap();

        note.mark_item_completed(1).unwrap();

        assert_eq!(texts(&note.pending_work), ["a", "c"]);
        assert_eq!(texts(&note.completed_work), ["earlier", "b"]);
        assert!(note.completed_work.last().unwrap().completed);
    }

    #[test]
    fn mark_completed_rejects_bad_index() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        note.add_pending_item("only one").unwrap();
        let err = note.mark_item_completed(1).unwrap_err();
        assert!(matches!(
            err,
            NoteError::IndexOutOfRange {
                index: 1,
                pending_len: 1
            }
        ));
    }

    #[test]
    fn batch_completion_applies_descending() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        for text in ["a", "b", "c"] {
            note.add_pending_item(text).unwrap();
        }

        // Indices collected in ascending order; complete_items sorts them.
        note.complete_items(&[0, 2]).unwrap();

        assert_eq!(texts(&note.pending_work), ["b"]);
        assert_eq!(texts(&note.completed_work), ["c", "a"]);
    }

    #[test]
    fn ascending_application_is_a_misuse() {
        // Marking {0, 2} by hand in ascending order shifts index 2 out of
        // range after the first removal. The batch operation exists to make
        // this mistake impossible.
        let mut note = Note::new(date(2024, 6, 10), "Work");
        for text in ["a", "b", "c"] {
            note.add_pending_item(text).unwrap();
        }

        note.mark_item_completed(0).unwrap();
        let err = note.mark_item_completed(2).unwrap_err();
        assert!(matches!(
            err,
            NoteError::IndexOutOfRange {
                index: 2,
                pending_len: 2
            }
        ));
    }

    #[test]
    fn day_cycle_scenario() {
        let mut note = Note::new(date(2024, 6, 10), "Work");
        note.add_pending_item("review PR").unwrap();
        note.add_pending_item("deploy service").unwrap();
        assert_eq!(texts(&note.pending_work), ["review PR", "deploy service"]);

        note.mark_item_completed(0).unwrap();
        assert_eq!(texts(&note.pending_work), ["deploy service"]);
        assert_eq!(texts(&note.completed_work), ["review PR"]);
    }

    #[test]
    fn workplace_slug_is_tag_safe() {
        assert_eq!(workplace_slug("Work"), "work");
        assert_eq!(workplace_slug("Client A"), "client-a");
        assert_eq!(workplace_slug("ACME Corp."), "acme-corp");
    }
}
