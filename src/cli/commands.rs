use std::fmt::Write as _;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::config::AppConfig;
use crate::store::{fetch_or_seed, Note, NoteStore};

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Print at most this many notes
    #[arg(long)]
    pub limit: Option<usize>,
    /// Also print each note's content, indented under its title
    #[arg(long)]
    pub content: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Title for the note (prompted if omitted)
    #[arg()]
    pub title: Option<String>,
    /// Provide the note body inline. If omitted, reads from stdin.
    #[arg(long)]
    pub body: Option<String>,
}

pub fn run_tui<S: NoteStore>(app: &mut App<S>) -> Result<()> {
    app.run()
}

pub fn list_notes(config: &AppConfig, store: &dyn NoteStore, args: ListArgs) -> Result<()> {
    let notes = fetch_or_seed(store, &config.default_title, config.store.seed_attempts)
        .context("listing notes")?;
    print!("{}", format_note_list(&notes, &args));
    Ok(())
}

fn format_note_list(notes: &[Note], args: &ListArgs) -> String {
    let limit = args.limit.unwrap_or(usize::MAX);
    let mut out = String::new();
    for note in notes.iter().take(limit) {
        let _ = writeln!(&mut out, "{}\t{}", note.id, note.title.trim_end());
        if args.content {
            for line in note.content.trim_end().lines() {
                let _ = writeln!(&mut out, "    {line}");
            }
        }
    }
    out
}

pub fn new_note(config: &AppConfig, store: &dyn NoteStore, args: NewArgs) -> Result<()> {
    let title = match args.title {
        Some(t) => t,
        None => prompt("Title")?,
    };
    let title = resolve_title(&title, &config.default_title);
    let body = if let Some(body) = args.body {
        body
    } else {
        read_stdin()?.unwrap_or_default()
    };
    create_note(store, &title, &body)?;
    println!("Created note '{}'", title.trim_end());
    Ok(())
}

fn resolve_title(raw: &str, default_title: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default_title.to_string()
    } else {
        trimmed.to_string()
    }
}

fn create_note(store: &dyn NoteStore, title: &str, body: &str) -> Result<()> {
    store
        .create(title, body)
        .with_context(|| format!("creating note '{title}'"))?;
    tracing::info!(title, "note created from command line");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    use std::io::Write;
    let mut stdout = io::stdout();
    write!(stdout, "{}: ", label)?;
    stdout.flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end().to_owned())
}

fn read_stdin() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(Some(buf))
}
