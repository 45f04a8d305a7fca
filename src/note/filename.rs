//! Filename codec for work notes.
//!
//! A note's location is fully determined by its date and workplace:
//! `YYYY-MM-DD-<workplace>.md`. The fixed-width date prefix makes a
//! lexicographic directory listing match chronological order, and the
//! verbatim workplace suffix keeps one file per (date, workplace) pair.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static RE_NOTE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)\.md$").unwrap());

/// A filename successfully decoded back into its key parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFilename {
    pub date: NaiveDate,
    pub workplace: String,
}

/// Build the canonical filename for a (date, workplace) pair.
pub fn filename_for(date: NaiveDate, workplace: &str) -> String {
    format!("{}-{}.md", date.format("%Y-%m-%d"), workplace)
}

/// Decode a filename into its date and workplace.
///
/// Returns `None` for anything that does not match the note naming scheme,
/// including syntactically well-formed names with impossible calendar dates.
/// Directory scans use this to skip unrelated files without failing.
pub fn decode_filename(name: &str) -> Option<DecodedFilename> {
    let caps = RE_NOTE_FILENAME.captures(name)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(DecodedFilename {
        date,
        workplace: caps[4].to_string(),
    })
}

/// Decode just the date portion of a note filename.
pub fn decode_date(name: &str) -> Option<NaiveDate> {
    decode_filename(name).map(|d| d.date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn encode_uses_iso_date_prefix() {
        assert_eq!(
            filename_for(date(2024, 6, 10), "Work"),
            "2024-06-10-Work.md"
        );
        assert_eq!(filename_for(date(2024, 1, 2), "Work"), "2024-01-02-Work.md");
    }

    #[test]
    fn decode_inverts_encode() {
        let d = date(2024, 6, 10);
        for workplace in ["Work", "Client A", "Client-A", "side.project"] {
            let name = filename_for(d, workplace);
            let decoded = decode_filename(&name).unwrap();
            assert_eq!(decoded.date, d);
            assert_eq!(decoded.workplace, workplace);
        }
    }

    #[test]
    fn decode_rejects_unrelated_names() {
        for name in [
            "readme.md",
            "2024-06-10.md",
            "2024-6-1-Work.md",
            "2024-06-10-Work.txt",
            "notes-2024-06-10-Work.md",
            "",
        ] {
            assert_eq!(decode_filename(name), None, "expected reject: {name:?}");
        }
    }

    #[test]
    fn decode_rejects_impossible_dates() {
        assert_eq!(decode_date("2024-13-01-Work.md"), None);
        assert_eq!(decode_date("2024-02-30-Work.md"), None);
        assert_eq!(decode_date("2024-00-10-Work.md"), None);
    }

    #[test]
    fn lexicographic_order_matches_chronological() {
        let mut names: Vec<String> = [
            date(2024, 1, 5),
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 11, 2),
        ]
        .iter()
        .map(|d| filename_for(*d, "Work"))
        .collect();

        let mut by_name = names.clone();
        by_name.sort();
        names.sort_by_key(|n| decode_date(n).unwrap());
        assert_eq!(by_name, names);
    }
}
