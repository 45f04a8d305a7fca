//! Interactive stdin prompts and plain-text display helpers for the CLI.
//!
//! Prompts print to stdout and read one line from stdin. EOF is treated as
//! declining, so a closed stdin never wedges a command mid-flow.

use std::io::Write;

use crate::note::WorkItem;

/// Interactive prompts backed by stdin/stdout.
pub struct Prompter;

impl Prompter {
    /// Ask a yes/no question. Only `y`/`yes` (case-insensitive) counts as
    /// yes; anything else, including EOF, is a no.
    pub fn confirm(&self, message: &str) -> std::io::Result<bool> {
        print!("{message} [y/N]: ");
        std::io::stdout().flush().ok();

        Ok(read_line()?.is_some_and(|answer| {
            let answer = answer.to_lowercase();
            answer == "y" || answer == "yes"
        }))
    }

    /// Walk the pending items one by one, asking which were completed.
    ///
    /// Returns the selected indices in ascending order, as collected. Callers
    /// apply them through [`Note::complete_items`], which handles the
    /// descending-order application itself.
    ///
    /// [`Note::complete_items`]: crate::note::Note::complete_items
    pub fn select_pending_items(&self, items: &[WorkItem]) -> std::io::Result<Vec<usize>> {
        let mut selected = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if self.confirm(&format!("Did you complete: \"{}\"", item.text))? {
                selected.push(i);
            }
        }
        Ok(selected)
    }

    /// Prompt for the next task line in an entry loop. `None` means EOF.
    pub fn prompt_for_task(&self, number: usize) -> std::io::Result<Option<String>> {
        print!("Task {number}: ");
        std::io::stdout().flush().ok();
        read_line()
    }

    /// Pick one entry from a list by number. `None` means EOF or an empty
    /// answer; invalid numbers re-prompt.
    pub fn select_from_list(&self, label: &str, items: &[String]) -> std::io::Result<Option<usize>> {
        println!("{label}:");
        for (i, item) in items.iter().enumerate() {
            println!("  {}. {item}", i + 1);
        }
        loop {
            print!("Choose [1-{}]: ", items.len());
            std::io::stdout().flush().ok();

            let Some(answer) = read_line()? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(index) = parse_choice(&answer, items.len()) {
                return Ok(Some(index));
            }
            println!("Enter a number between 1 and {}.", items.len());
        }
    }

    /// Show both item lists, numbered from 1.
    pub fn display_work_items(&self, pending: &[WorkItem], completed: &[WorkItem]) {
        println!("\n--- Pending Work ---");
        if pending.is_empty() {
            println!("  No pending items");
        } else {
            for (i, item) in pending.iter().enumerate() {
                println!("  {}. [ ] {}", i + 1, item.text);
            }
        }

        println!("\n--- Completed Work ---");
        if completed.is_empty() {
            println!("  No completed items");
        } else {
            for (i, item) in completed.iter().enumerate() {
                println!("  {}. [x] {}", i + 1, item.text);
            }
        }
        println!();
    }

    /// Show only the pending list.
    pub fn display_pending_only(&self, pending: &[WorkItem]) {
        println!("\n--- Pending Work ---");
        if pending.is_empty() {
            println!("  No pending items");
        } else {
            for (i, item) in pending.iter().enumerate() {
                println!("  {}. [ ] {}", i + 1, item.text);
            }
        }
        println!();
    }

    /// Show a titled block of free text, e.g. an AI-generated summary.
    pub fn display_summary_box(&self, title: &str, body: &str) {
        println!("\n--- {title} ---");
        println!("{body}");
        println!();
    }
}

/// Read one trimmed line from stdin. `None` means EOF.
fn read_line() -> std::io::Result<Option<String>> {
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(line.trim().to_string())),
        Err(e) => Err(e),
    }
}

fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.parse().ok()?;
    if (1..=len).contains(&n) {
        Some(n - 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parsing_is_one_based_and_bounded() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice("3", 3), Some(2));
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
        assert_eq!(parse_choice("", 3), None);
    }
}
