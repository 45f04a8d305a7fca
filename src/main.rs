//! worklog CLI: daily work-log notes manager.

use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use worklog::config::Config;
use worklog::note::{Note, NoteStore, WorkItem};
use worklog::prompt::Prompter;
use worklog::summarizer::SummarizerClient;

#[derive(Parser)]
#[command(name = "worklog", version, about = "Daily work-log notes manager")]
struct Cli {
    /// Workplace name (overrides the configured default).
    #[arg(long, global = true)]
    workplace: Option<String>,

    /// Notes directory (overrides the configured location).
    #[arg(long, global = true)]
    notes_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the day: review the previous note, then create today's.
    Start,

    /// Add a new pending work item to today's note.
    Add {
        /// Task description (words are joined with spaces).
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Add multiple work items interactively.
    AddMany,

    /// Mark pending items in today's note as completed.
    Done,

    /// List today's work items.
    List {
        /// Show only pending tasks.
        #[arg(short, long)]
        pending: bool,
    },

    /// Review pending items from the most recent previous note.
    Review,

    /// Get an AI summary of today's completed work.
    Summarize,

    /// Show the effective configuration.
    Config {
        /// Write a default config file if none exists yet.
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default().into_diagnostic()?;
    let prompter = Prompter;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Start => {
            // Multi-workplace setups pick interactively unless the flag
            // already chose one.
            let workplace = match &cli.workplace {
                Some(w) => w.clone(),
                None if config.workplaces.len() > 1 => {
                    match prompter
                        .select_from_list("Select workplace", &config.workplaces)
                        .into_diagnostic()?
                    {
                        Some(index) => config.workplaces[index].clone(),
                        None => config.workplace.clone(),
                    }
                }
                None => config.workplace.clone(),
            };
            let notes_dir = match &cli.notes_dir {
                Some(dir) => dir.clone(),
                None => config.notes_path().into_diagnostic()?,
            };
            let store = NoteStore::new(notes_dir, &workplace);
            store.ensure_notes_dir().into_diagnostic()?;

            if let Some(existing) = store.find_for_date(today).into_diagnostic()? {
                println!("Today's note already exists.");
                prompter.display_work_items(&existing.pending_work, &existing.completed_work);
                return Ok(());
            }

            let mut today_note = store.create_for_date(today);

            if let Some(mut previous) = store.find_most_recent_before(today).into_diagnostic()? {
                println!(
                    "Reviewing note: {} (Date: {})",
                    note_basename(&previous),
                    previous.date.format("%Y-%m-%d")
                );

                if previous.has_pending_work() {
                    println!("\nReview pending items:\n");
                    let selected = prompter
                        .select_pending_items(&previous.pending_work)
                        .into_diagnostic()?;
                    if !selected.is_empty() {
                        previous.complete_items(&selected).into_diagnostic()?;
                        store.write(&mut previous).into_diagnostic()?;
                        println!("Marked {} item(s) as completed.", selected.len());
                    }

                    if previous.has_pending_work() {
                        let carry = prompter
                            .confirm(&format!(
                                "Carry over {} unfinished item(s) to today",
                                previous.pending_work.len()
                            ))
                            .into_diagnostic()?;
                        if carry {
                            for item in &previous.pending_work {
                                today_note.add_pending_item(&item.text).into_diagnostic()?;
                            }
                        }
                    }
                }

                if previous.has_completed_work() {
                    println!("Generating AI summary of yesterday's work...");
                    if let Some(summary) =
                        summarize_completed(&config, &previous.completed_work)
                    {
                        store
                            .update_summary(&mut previous, &summary)
                            .into_diagnostic()?;
                        today_note.yesterday_summary = summary;
                    }
                }
            } else {
                println!("No previous notes found.");
            }

            store.write(&mut today_note).into_diagnostic()?;
            println!("\nCreated today's note: {}", note_basename(&today_note));
            prompter.display_work_items(&today_note.pending_work, &today_note.completed_work);
        }

        Commands::Add { text } => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            store.ensure_notes_dir().into_diagnostic()?;
            let task = text.join(" ");

            let mut note = match store.find_for_date(today).into_diagnostic()? {
                Some(note) => note,
                None => {
                    println!("Creating today's note...");
                    store.create_for_date(today)
                }
            };

            note.add_pending_item(&task).into_diagnostic()?;
            store.write(&mut note).into_diagnostic()?;

            println!("\nTask added successfully!");
            println!("  {}. [ ] {task}", note.pending_work.len());
            println!("\nYou now have {} pending task(s)", note.pending_work.len());
        }

        Commands::AddMany => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            store.ensure_notes_dir().into_diagnostic()?;

            let mut note = match store.find_for_date(today).into_diagnostic()? {
                Some(note) => note,
                None => {
                    println!("Creating today's note...");
                    store.create_for_date(today)
                }
            };

            println!("\nAdd Multiple Tasks");
            println!("Enter each task and press Enter. Press Ctrl+D when done.\n");

            let mut added: Vec<String> = Vec::new();
            loop {
                let Some(task) = prompter
                    .prompt_for_task(added.len() + 1)
                    .into_diagnostic()?
                else {
                    break;
                };
                if task.is_empty() {
                    println!("  (empty input skipped)");
                    continue;
                }
                note.add_pending_item(&task).into_diagnostic()?;
                println!("  Added: {task}");
                added.push(task);
            }

            if added.is_empty() {
                println!("\nNo tasks added.");
                return Ok(());
            }

            store.write(&mut note).into_diagnostic()?;
            println!("\nAdded {} task(s) to today's worklog", added.len());
            println!("\nTasks added:");
            for (i, task) in added.iter().enumerate() {
                println!("  {}. [ ] {task}", i + 1);
            }
        }

        Commands::Done => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            let Some(mut note) = store.find_for_date(today).into_diagnostic()? else {
                println!("No note found for today. Use 'worklog start' to create one.");
                return Ok(());
            };

            if !note.has_pending_work() {
                println!("No pending items — you're all caught up!");
                return Ok(());
            }

            println!("\nMark Tasks as Done");
            println!("Select which tasks you've completed\n");

            let selected = prompter
                .select_pending_items(&note.pending_work)
                .into_diagnostic()?;
            if selected.is_empty() {
                println!("No items marked as completed.");
                return Ok(());
            }

            note.complete_items(&selected).into_diagnostic()?;
            store.write(&mut note).into_diagnostic()?;

            println!("\nMarked {} item(s) as completed!", selected.len());
            prompter.display_work_items(&note.pending_work, &note.completed_work);
        }

        Commands::List { pending } => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            let Some(note) = store.find_for_date(today).into_diagnostic()? else {
                println!("No note found for today. Use 'worklog start' to create one.");
                return Ok(());
            };

            println!(
                "{}  {} pending · {} done",
                today.format("%a, %b %-d"),
                note.pending_work.len(),
                note.completed_work.len()
            );

            if !pending && !note.yesterday_summary.is_empty() {
                println!("Yesterday: {}", note.yesterday_summary);
            }

            if pending {
                prompter.display_pending_only(&note.pending_work);
            } else {
                prompter.display_work_items(&note.pending_work, &note.completed_work);
            }

            println!("Use 'worklog add \"task\"' to add items");
        }

        Commands::Review => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            let Some(mut note) = store.find_most_recent_before(today).into_diagnostic()? else {
                println!("No previous notes found.");
                return Ok(());
            };

            println!(
                "Reviewing note: {} (Date: {})\n",
                note_basename(&note),
                note.date.format("%Y-%m-%d")
            );

            if !note.has_pending_work() {
                println!("No pending items to review.");
                prompter.display_work_items(&note.pending_work, &note.completed_work);
                return Ok(());
            }

            println!("Review pending items:\n");
            let selected = prompter
                .select_pending_items(&note.pending_work)
                .into_diagnostic()?;
            if selected.is_empty() {
                println!("No items marked as completed.");
                return Ok(());
            }

            note.complete_items(&selected).into_diagnostic()?;
            store.write(&mut note).into_diagnostic()?;

            println!("Marked {} item(s) as completed.", selected.len());
            prompter.display_work_items(&note.pending_work, &note.completed_work);
        }

        Commands::Summarize => {
            let store = open_store(&cli.workplace, &cli.notes_dir, &config)?;
            let Some(note) = store.find_for_date(today).into_diagnostic()? else {
                println!("No note found for today. Use 'worklog start' to create one.");
                return Ok(());
            };

            if !note.has_completed_work() {
                println!("No completed work items to summarize.");
                println!("Use 'worklog done' to mark items as completed first.");
                return Ok(());
            }

            println!("\nWork Summary");
            println!("{}\n", today.format("%A, %B %-d, %Y"));
            println!("Completed Work");
            for (i, item) in note.completed_work.iter().enumerate() {
                println!("  {}. [x] {}", i + 1, item.text);
            }
            println!("\nGenerating AI summary...");

            let client = SummarizerClient::new(&config);
            client.check_connection().into_diagnostic()?;
            let summary = client
                .summarize_work_items(&note.completed_work)
                .into_diagnostic()?;
            prompter.display_summary_box("AI-Generated Summary", &summary);
        }

        Commands::Config { init } => {
            let path = Config::config_file().into_diagnostic()?;
            if init {
                if path.exists() {
                    println!("Config file already exists: {}", path.display());
                } else {
                    config.save(&path).into_diagnostic()?;
                    println!("Wrote default config: {}", path.display());
                }
            }
            let rendered = toml::to_string_pretty(&config).into_diagnostic()?;
            print!("{rendered}");
        }
    }

    Ok(())
}

/// Note store for this invocation, honoring the CLI overrides.
fn open_store(
    workplace_flag: &Option<String>,
    notes_dir_flag: &Option<PathBuf>,
    config: &Config,
) -> Result<NoteStore> {
    let notes_dir = match notes_dir_flag {
        Some(dir) => dir.clone(),
        None => config.notes_path().into_diagnostic()?,
    };
    let workplace = workplace_flag
        .clone()
        .unwrap_or_else(|| config.workplace.clone());
    Ok(NoteStore::new(notes_dir, &workplace))
}

/// Ask the OpenCode server for a summary of completed items. Unreachable or
/// failing servers degrade to `None` with a warning; summaries never block
/// note creation.
fn summarize_completed(config: &Config, items: &[WorkItem]) -> Option<String> {
    let client = SummarizerClient::new(config);
    if let Err(e) = client.check_connection() {
        tracing::warn!(error = %e, "skipping AI summary: OpenCode server unreachable");
        return None;
    }
    match client.summarize_work_items(items) {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!(error = %e, "skipping AI summary: request failed");
            None
        }
    }
}

/// File name of the note, for display.
fn note_basename(note: &Note) -> String {
    note.file_path
        .as_deref()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
