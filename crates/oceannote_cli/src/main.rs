//! Command-line front end for the note core.
//!
//! # Responsibility
//! - Drive one `NoteSession` per invocation against a file or SQLite sink.
//! - Keep output plain and deterministic for scripting and smoke checks.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use oceannote_core::{
    core_version, default_log_level, init_logging, BlobSink, FileBlobSink, NoteId, NotePatch,
    NoteSession, NotesConfig, SqliteBlobSink,
};
use std::path::PathBuf;

/// Ocean Notes: a small local note store.
#[derive(Parser, Debug)]
#[command(name = "oceannote", version, about, long_about = None)]
struct Cli {
    /// SQLite database holding the notes blob
    #[arg(long, value_name = "PATH", conflicts_with = "file")]
    db: Option<PathBuf>,

    /// JSON file holding the notes blob
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// JSON file with config overrides
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List notes, most recently updated first
    List {
        /// Case-insensitive substring filter
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Create a note
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Print one note
    Show { id: String },
    /// Change a note's title and/or content
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: String },
    /// Print the core version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if let Command::Version = cli.command {
        println!("oceannote_core version={}", core_version());
        return Ok(());
    }

    let config = load_config(cli.config.as_ref())?;
    let sink = open_sink(&cli, &config)?;
    let mut session = NoteSession::open(sink, config);
    run(&mut session, cli.command)?;
    if let Some(outcome) = session.close() {
        if !outcome.is_written() {
            bail!("failed to persist notes ({outcome:?})");
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<NotesConfig> {
    let Some(path) = path else {
        return Ok(NotesConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    NotesConfig::from_json_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn open_sink(cli: &Cli, config: &NotesConfig) -> Result<Box<dyn BlobSink>> {
    if let Some(db) = cli.db.as_ref() {
        let sink = SqliteBlobSink::open(db, config.storage_key.as_str())
            .with_context(|| format!("failed to open database {}", db.display()))?;
        return Ok(Box::new(sink));
    }
    let path = match cli.file.as_ref() {
        Some(path) => path.clone(),
        None => PathBuf::from(format!("{}.json", config.storage_key)),
    };
    Ok(Box::new(FileBlobSink::new(path)))
}

fn run<C, S, T>(session: &mut NoteSession<C, S, T>, command: Command) -> Result<()>
where
    C: oceannote_core::Clock,
    S: BlobSink,
    T: oceannote_core::Scheduler,
{
    match command {
        Command::List { query } => {
            session.set_query(query.unwrap_or_default());
            println!("{}", session.count_label());
            for row in session.rows() {
                println!("{}\t{}\t{}", row.id, row.title, row.preview);
            }
        }
        Command::New { title, content } => {
            let note = session.create_note();
            let patch = NotePatch { title, content };
            if !patch.is_empty() {
                session.update_note(&note.id, patch);
            }
            println!("{}", note.id);
        }
        Command::Show { id } => {
            let Some(note) = session.store().get(&NoteId::from(id.as_str())) else {
                bail!("note not found: {id}");
            };
            println!("{}\n\n{}", note.display_title(), note.content);
        }
        Command::Edit { id, title, content } => {
            let patch = NotePatch { title, content };
            if patch.is_empty() {
                bail!("nothing to edit: pass --title and/or --content");
            }
            if session.update_note(&NoteId::from(id.as_str()), patch).is_none() {
                bail!("note not found: {id}");
            }
        }
        Command::Delete { id } => {
            if !session.delete_note(&NoteId::from(id.as_str())) {
                bail!("note not found: {id}");
            }
        }
        Command::Version => {}
    }
    Ok(())
}
