//! filedeck - staged file operations from the command line.
//!
//! Usage:
//!   fdeck ls [PATH]                 List a directory
//!   fdeck cp SOURCE... DEST         Copy into DEST, never overwriting
//!   fdeck mv SOURCE... DEST         Move into DEST (same volume)
//!   fdeck rm PATH...                Delete recursively
//!   fdeck rename PATH NEW_NAME      Rename in place
//!   fdeck mkdir PARENT NAME         Create a folder
//!   fdeck settings [--save]         Show or write the settings file

mod logging;
mod settings;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use filedeck_core::{FileEntry, ListingConfig, SortKey};
use filedeck_ops::{EngineEvent, FileOperationEngine, OperationComplete};
use filedeck_scan::EntityScanner;

use crate::settings::UserSettings;

#[derive(Parser)]
#[command(
    name = "filedeck",
    version,
    about = "Staged copy, move and delete for local files",
    long_about = "filedeck lists directories and runs copy, move and delete batches \
                  on a background worker. Copies never overwrite: a taken name \
                  becomes `name (1).ext`."
)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Include hidden entries (overrides settings)
    #[arg(short = 'a', long, global = true)]
    hidden: bool,

    /// Sort key: name, size, date or type (overrides settings)
    #[arg(short, long, global = true)]
    sort: Option<SortKey>,

    /// List files before directories
    #[arg(long, global = true)]
    files_first: bool,

    /// Glob pattern to ignore (repeatable, added to settings)
    #[arg(short = 'I', long = "ignore", global = true)]
    ignore: Vec<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also measure the whole subtree
        #[arg(long)]
        du: bool,
    },

    /// Copy entries into a directory
    Cp {
        /// Entries to copy
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Destination directory (created if missing)
        dest: PathBuf,
    },

    /// Move entries into a directory
    Mv {
        /// Entries to move
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Destination directory
        dest: PathBuf,
    },

    /// Delete entries recursively
    Rm {
        /// Entries to delete
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rename an entry in place
    Rename {
        /// Entry to rename
        path: PathBuf,

        /// New file name (no separators)
        new_name: String,
    },

    /// Create a folder
    Mkdir {
        /// Parent directory
        parent: PathBuf,

        /// Folder name
        name: String,
    },

    /// Show the effective settings
    Settings {
        /// Write them to the settings file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut settings = UserSettings::load();
    if cli.hidden {
        settings.show_hidden = true;
    }
    if let Some(sort) = cli.sort {
        settings.sort_key = sort;
    }
    if cli.files_first {
        settings.directories_first = false;
    }
    settings.ignore_patterns.extend(cli.ignore.iter().cloned());
    let config = settings.to_listing_config()?;

    match cli.command {
        Command::Ls { path, du } => run_ls(&config, &path, du, cli.json),
        Command::Cp { sources, dest } => run_copy(&config, &sources, &dest, cli.json).await,
        Command::Mv { sources, dest } => run_move(&config, &sources, &dest, cli.json).await,
        Command::Rm { paths } => run_delete(&config, &paths, cli.json).await,
        Command::Rename { path, new_name } => run_rename(&config, &path, &new_name),
        Command::Mkdir { parent, name } => run_mkdir(&config, &parent, &name),
        Command::Settings { save } => run_settings(&settings, save),
    }
}

/// List one directory in the configured order.
fn run_ls(config: &ListingConfig, path: &Path, du: bool, json: bool) -> Result<()> {
    let scanner = EntityScanner::from_config(config)?;
    let entries = scanner
        .list_directory(path, config.sort_key, config.directories_first)
        .with_context(|| format!("Cannot list {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{} {:>12}  {}  {}{}",
            if entry.is_dir { 'd' } else { '-' },
            describe_size(entry),
            format_time(entry),
            entry.name,
            if entry.is_dir { "/" } else { "" }
        );
    }

    println!();
    println!(" {} entries (sorted by {})", entries.len(), config.sort_key);
    if du {
        let totals = scanner.measure_tree(path);
        println!(
            " {} in {} files, {} directories",
            format_size(totals.bytes),
            totals.files,
            totals.dirs
        );
    }

    Ok(())
}

async fn run_copy(
    config: &ListingConfig,
    sources: &[PathBuf],
    dest: &Path,
    json: bool,
) -> Result<()> {
    let entries = scan_all(config, sources)?;
    let dest = std::path::absolute(dest)?;
    let (engine, events) = FileOperationEngine::new(config)?;

    engine.stage_for_copy(&entries);
    if !engine.paste_to(&dest) {
        bail!("Nothing to copy");
    }
    report(&drive(events, json).await?, json)
}

async fn run_move(
    config: &ListingConfig,
    sources: &[PathBuf],
    dest: &Path,
    json: bool,
) -> Result<()> {
    let entries = scan_all(config, sources)?;
    let dest = std::path::absolute(dest)?;
    let (engine, events) = FileOperationEngine::new(config)?;

    if !engine.begin_move(&entries) {
        bail!("A move is already staged");
    }
    if !engine.can_move_into(&dest) {
        engine.cancel_move();
        bail!("Cannot move a directory into itself: {}", dest.display());
    }
    if !engine.complete_move(&dest) {
        bail!("Move was not accepted");
    }
    report(&drive(events, json).await?, json)
}

async fn run_delete(config: &ListingConfig, paths: &[PathBuf], json: bool) -> Result<()> {
    let entries = scan_all(config, paths)?;
    let (engine, events) = FileOperationEngine::new(config)?;

    engine.delete_entries(&entries);
    report(&drive(events, json).await?, json)
}

fn run_rename(config: &ListingConfig, path: &Path, new_name: &str) -> Result<()> {
    let entry = EntityScanner::from_config(config)?
        .scan_one(path)
        .with_context(|| format!("Cannot rename {}", path.display()))?;
    let (engine, _events) = FileOperationEngine::new(config)?;

    let renamed = engine
        .try_rename(&entry, new_name)
        .with_context(|| format!("Cannot rename {}", path.display()))?;
    println!("{}", renamed.display());
    Ok(())
}

fn run_mkdir(config: &ListingConfig, parent: &Path, name: &str) -> Result<()> {
    let (engine, _events) = FileOperationEngine::new(config)?;
    if !engine.create_folder(parent, name) {
        bail!("Cannot create {}", parent.join(name).display());
    }
    println!("{}", parent.join(name).display());
    Ok(())
}

fn run_settings(settings: &UserSettings, save: bool) -> Result<()> {
    if save {
        let path = settings.save()?;
        eprintln!("Saved to {}", path.display());
    } else if let Some(path) = UserSettings::config_path() {
        eprintln!("# {}", path.display());
    }
    print!("{}", settings.to_toml()?);
    Ok(())
}

/// Snapshot each command-line path. Any missing path aborts before work starts.
fn scan_all(config: &ListingConfig, paths: &[PathBuf]) -> Result<Vec<FileEntry>> {
    let scanner = EntityScanner::from_config(config)?;
    paths
        .iter()
        .map(|path| {
            scanner
                .scan_one(path)
                .with_context(|| format!("Cannot stage {}", path.display()))
        })
        .collect()
}

/// Wait for the engine to finish its job, echoing progress to stderr.
async fn drive(
    mut events: UnboundedReceiver<EngineEvent>,
    quiet: bool,
) -> Result<OperationComplete> {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Progress(progress) => {
                if !quiet {
                    let current = progress
                        .current_file
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default();
                    eprintln!(
                        "[{:>3}/{}] {:>5.1}%  {}",
                        progress.files_completed,
                        progress.files_total,
                        progress.percentage(),
                        current
                    );
                }
            }
            EngineEvent::PathChanged(path) => debug!(path = %path.display(), "changed"),
            EngineEvent::Finished(complete) => return Ok(complete),
        }
    }
    Err(eyre!("Operation worker stopped before finishing"))
}

fn report(complete: &OperationComplete, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(complete)?);
    } else {
        println!("{}", complete.summary());
        if complete.bytes_processed > 0 {
            println!(" {} processed", format_size(complete.bytes_processed));
        }
        for error in &complete.errors {
            eprintln!("  {error}");
        }
    }

    if !complete.is_success() {
        bail!(
            "{} of {} entries failed",
            complete.failed,
            complete.failed + complete.succeeded
        );
    }
    Ok(())
}

fn describe_size(entry: &FileEntry) -> String {
    if entry.is_dir {
        format!("{} items", entry.child_count)
    } else {
        format_size(entry.size)
    }
}

fn format_time(entry: &FileEntry) -> String {
    DateTime::<Local>::from(entry.modified)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
