//! File-backed note store: locate, load, create, and persist notes.
//!
//! A store owns one notes directory and one workplace name. Filenames are
//! the sole index (there is no manifest), so every lookup goes through the
//! filename codec. Writes are whole-file rewrites staged through a temp file
//! in the same directory and renamed over the target.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::note::filename::{decode_filename, filename_for};
use crate::note::markdown;
use crate::note::model::Note;

/// Locates and persists work notes for one (directory, workplace) pair.
pub struct NoteStore {
    notes_dir: PathBuf,
    workplace: String,
}

impl NoteStore {
    pub fn new(notes_dir: PathBuf, workplace: &str) -> Self {
        Self {
            notes_dir,
            workplace: workplace.to_string(),
        }
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn workplace(&self) -> &str {
        &self.workplace
    }

    /// Expected path of the note for `date` at this store's workplace.
    pub fn path_for_date(&self, date: NaiveDate) -> PathBuf {
        self.notes_dir.join(filename_for(date, &self.workplace))
    }

    /// Create the notes directory if it does not exist. Idempotent.
    pub fn ensure_notes_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.notes_dir).map_err(|e| StoreError::Io {
            path: self.notes_dir.display().to_string(),
            source: e,
        })
    }

    /// Load the note for `date`, or `None` if no file exists for it.
    ///
    /// Absence is a normal outcome, not an error; a file that exists but
    /// does not parse is an error.
    pub fn find_for_date(&self, date: NaiveDate) -> Result<Option<Note>, StoreError> {
        let path = self.path_for_date(date);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.load(&path)?))
    }

    /// Load the newest note dated strictly before `date` at this workplace.
    ///
    /// Scans the directory, skipping subdirectories, hidden files, names
    /// that do not decode, and other workplaces' notes. A candidate that
    /// matches the naming scheme but fails to parse fails the whole lookup
    /// rather than being skipped.
    pub fn find_most_recent_before(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Note>, StoreError> {
        let entries = std::fs::read_dir(&self.notes_dir).map_err(|e| StoreError::Io {
            path: self.notes_dir.display().to_string(),
            source: e,
        })?;

        let mut best: Option<(NaiveDate, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Some(decoded) = decode_filename(name) else {
                continue;
            };
            if decoded.workplace != self.workplace || decoded.date >= date {
                continue;
            }
            if best.as_ref().is_none_or(|(d, _)| decoded.date > *d) {
                best = Some((decoded.date, path));
            }
        }

        match best {
            Some((_, path)) => Ok(Some(self.load(&path)?)),
            None => Ok(None),
        }
    }

    /// Read and parse a note file, assigning its path.
    pub fn load(&self, path: &Path) -> Result<Note, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut note = markdown::parse(&content).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            source: e,
        })?;
        note.file_path = Some(path.to_path_buf());
        Ok(note)
    }

    /// Build a fresh note for `date` with its file path already assigned.
    pub fn create_for_date(&self, date: NaiveDate) -> Note {
        let mut note = Note::new(date, &self.workplace);
        note.file_path = Some(self.path_for_date(date));
        note
    }

    /// Persist a note, deriving and assigning its path first if unset.
    ///
    /// The content is staged in a temp file next to the target and renamed
    /// into place, so a crash mid-write cannot truncate an existing note.
    pub fn write(&self, note: &mut Note) -> Result<(), StoreError> {
        let path = match &note.file_path {
            Some(p) => p.clone(),
            None => self.path_for_date(note.date),
        };
        let dir = path.parent().unwrap_or(&self.notes_dir);

        let content = markdown::serialize(note);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        tmp.write_all(content.as_bytes()).map_err(|e| StoreError::Io {
            path: tmp.path().display().to_string(),
            source: e,
        })?;
        tmp.persist(&path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e.error,
        })?;
        tracing::debug!(path = %path.display(), "note written");

        if note.file_path.is_none() {
            note.file_path = Some(path);
        }
        Ok(())
    }

    /// Set a note's summary and persist it.
    pub fn update_summary(&self, note: &mut Note, summary: &str) -> Result<(), StoreError> {
        note.summary = summary.to_string();
        self.write(note)
    }

    /// Set a note's carried-over summary and persist it.
    pub fn update_yesterday_summary(
        &self,
        note: &mut Note,
        summary: &str,
    ) -> Result<(), StoreError> {
        note.yesterday_summary = summary.to_string();
        self.write(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_in(dir: &Path) -> NoteStore {
        NoteStore::new(dir.to_path_buf(), "Work")
    }

    fn seed_note(store: &NoteStore, d: NaiveDate, pending: &[&str]) {
        let mut note = store.create_for_date(d);
        for text in pending {
            note.add_pending_item(text).unwrap();
        }
        store.write(&mut note).unwrap();
    }

    #[test]
    fn find_for_date_absent_is_not_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());
        assert!(store.find_for_date(date(2024, 6, 10)).unwrap().is_none());
    }

    #[test]
    fn create_write_reload_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());

        let mut note = store.create_for_date(date(2024, 6, 10));
        assert_eq!(note.file_path, Some(tmp.path().join("2024-06-10-Work.md")));
        note.add_pending_item("deploy service").unwrap();
        note.add_completed_item("review PR").unwrap();
        store.write(&mut note).unwrap();

        let loaded = store.find_for_date(date(2024, 6, 10)).unwrap().unwrap();
        assert_eq!(loaded, note);

        let on_disk = std::fs::read_to_string(note.file_path.as_ref().unwrap()).unwrap();
        assert_eq!(on_disk, markdown::serialize(&note));
    }

    #[test]
    fn write_derives_path_when_unset() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());

        let mut note = Note::new(date(2024, 6, 10), "Work");
        assert_eq!(note.file_path, None);
        store.write(&mut note).unwrap();

        assert_eq!(note.file_path, Some(tmp.path().join("2024-06-10-Work.md")));
        assert!(note.file_path.as_ref().unwrap().exists());
    }

    #[test]
    fn most_recent_before_picks_greatest_earlier_date() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());
        for d in [date(2024, 1, 1), date(2024, 1, 3), date(2024, 1, 5)] {
            seed_note(&store, d, &["task"]);
        }

        let found = store
            .find_most_recent_before(date(2024, 1, 4))
            .unwrap()
            .unwrap();
        assert_eq!(found.date, date(2024, 1, 3));

        let latest = store
            .find_most_recent_before(date(2024, 1, 6))
            .unwrap()
            .unwrap();
        assert_eq!(latest.date, date(2024, 1, 5));

        assert!(store
            .find_most_recent_before(date(2024, 1, 1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn scan_skips_noise_and_other_workplaces() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());
        seed_note(&store, date(2024, 1, 2), &["ours"]);

        // Noise the scan must step over.
        std::fs::write(tmp.path().join("readme.md"), "not a note").unwrap();
        std::fs::write(tmp.path().join(".2024-01-04-Work.md"), "hidden").unwrap();
        std::fs::create_dir(tmp.path().join("archive")).unwrap();

        // A later note for a different workplace must not win.
        let other = NoteStore::new(tmp.path().to_path_buf(), "Client A");
        seed_note(&other, date(2024, 1, 4), &["theirs"]);

        let found = store
            .find_most_recent_before(date(2024, 1, 10))
            .unwrap()
            .unwrap();
        assert_eq!(found.date, date(2024, 1, 2));
        assert_eq!(found.pending_work[0].text, "ours");
    }

    #[test]
    fn malformed_candidate_fails_the_lookup() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(tmp.path().join("2024-01-02-Work.md"), "garbage, no frontmatter").unwrap();

        let err = store.find_most_recent_before(date(2024, 1, 3)).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));

        let err = store.find_for_date(date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(&tmp.path().join("does-not-exist"));
        let err = store.find_most_recent_before(date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn update_summary_persists() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(tmp.path());

        let mut note = store.create_for_date(date(2024, 6, 10));
        store.write(&mut note).unwrap();
        store.update_summary(&mut note, "shipped the release").unwrap();
        store
            .update_yesterday_summary(&mut note, "planned the release")
            .unwrap();

        let loaded = store.find_for_date(date(2024, 6, 10)).unwrap().unwrap();
        assert_eq!(loaded.summary, "shipped the release");
        assert_eq!(loaded.yesterday_summary, "planned the release");
    }

    #[test]
    fn ensure_notes_dir_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = store_in(&tmp.path().join("nested").join("notes"));
        store.ensure_notes_dir().unwrap();
        store.ensure_notes_dir().unwrap();
        assert!(store.notes_dir().is_dir());
    }
}
