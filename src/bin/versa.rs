//! # versa CLI - version history for one file
//!
//! Command-line front end for the versa library.
//!
//! ## Features
//! - Record the tracked file as a new version
//! - Load any version back into the tracked file
//! - Compare two versions line by line
//! - Search all versions for a keyword
//! - Interactive prompt with single-key commands
//!
//! ## Usage
//! ```bash
//! # Record the current content of file.txt
//! versa add
//!
//! # Track another file, keep backups elsewhere
//! versa --file notes.txt --backup-dir .versions add
//!
//! # Compare versions 1 and 3
//! versa compare 1 3
//!
//! # Interactive prompt (also the default without a subcommand)
//! versa shell
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use versa::{
    FileBackups, LineRecord, LineStatus, MatchMode, Snapshot, VersaConfig, VersaError,
    VersioningService,
};

/// versa CLI - keep a linear version history of a single text file
#[derive(Parser)]
#[command(name = "versa")]
#[command(version)]
#[command(about = "Keep a linear version history of a single text file")]
#[command(long_about = None)]
struct Cli {
    /// Tracked file (defaults to file.txt, or the value in versa.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Directory holding version backups (defaults to the tracked file's directory)
    #[arg(short, long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Treat equal hashes as equal content
    #[arg(long, global = true)]
    hash_only: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the tracked file as a new version
    Add,

    /// Remove a version
    #[command(alias = "rm")]
    Remove {
        /// Version number
        version: u64,
    },

    /// Write a version back into the tracked file
    Load {
        /// Version number
        version: u64,
    },

    /// Compare two versions line by line
    #[command(alias = "diff")]
    Compare {
        /// First version
        first: u64,

        /// Second version
        second: u64,
    },

    /// Find versions containing a keyword
    Search {
        /// Case-sensitive keyword
        keyword: String,
    },

    /// Print every version
    #[command(alias = "ls")]
    List,

    /// Interactive prompt
    Shell,
}

const INSTRUCTIONS: &str = "\
To add the content of your file to version control press  'a'
To remove a version press                                  'r'
To load a version press                                    'l'
To print the detailed list of all versions press           'p'
To compare any 2 versions press                            'c'
To search versions for a keyword press                     's'
To show these instructions again press                     'i'
To exit press                                              'e'";

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Main command runner
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let mut service = VersioningService::open(&config)
        .with_context(|| format!("failed to open history of {}", config.tracked_file.display()))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Add => cmd_add(&mut service)?,
        Commands::Remove { version } => cmd_remove(&mut service, version)?,
        Commands::Load { version } => cmd_load(&service, version)?,
        Commands::Compare { first, second } => cmd_compare(&service, first, second)?,
        Commands::Search { keyword } => cmd_search(&service, &keyword),
        Commands::List => cmd_list(&service),
        Commands::Shell => {
            let stdin = io::stdin();
            cmd_shell(&mut service, stdin.lock())?
        }
    }

    Ok(())
}

/// Merge versa.json from the working directory with command-line flags
fn resolve_config(cli: &Cli) -> anyhow::Result<VersaConfig> {
    let mut config = VersaConfig::load_or_default(Path::new("."))
        .context("failed to read versa.json")?;

    if let Some(file) = &cli.file {
        config.tracked_file = file.clone();
    }
    if let Some(dir) = &cli.backup_dir {
        config.backup_dir = Some(dir.clone());
    }
    if cli.hash_only {
        config.match_mode = MatchMode::HashOnly;
    }

    config.validate()?;
    Ok(config)
}

/// Record the tracked file as a new version
///
/// An empty or unchanged tracked file is reported rather than recorded.
fn cmd_add(service: &mut VersioningService<FileBackups>) -> versa::Result<()> {
    let text = service.backups().read_tracked()?;
    if text.is_empty() {
        println!("{}", "The tracked file is empty, nothing to add.".yellow());
        return Ok(());
    }

    let version = match service.add(text) {
        Ok(version) => version,
        Err(e @ VersaError::DuplicateContent) => {
            println!("{}", e.user_message().yellow());
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    println!(
        "{} Your content has been added successfully as version {}",
        "✓".green().bold(),
        version.to_string().yellow().bold()
    );
    Ok(())
}

/// Remove a version and its backup file
fn cmd_remove(service: &mut VersioningService<FileBackups>, version: u64) -> versa::Result<()> {
    service.remove(version)?;
    println!(
        "{} Version {} deleted successfully.",
        "✓".green().bold(),
        version.to_string().yellow()
    );
    Ok(())
}

/// Write a version back into the tracked file
fn cmd_load(service: &VersioningService<FileBackups>, version: u64) -> versa::Result<()> {
    let content = service.load(version)?.content().to_string();
    service.backups().write_tracked(&content)?;
    println!(
        "{} Version {} loaded successfully. Please refresh your text editor to see the changes.",
        "✓".green().bold(),
        version.to_string().yellow()
    );
    Ok(())
}

/// Print a line-by-line comparison
fn cmd_compare(
    service: &VersioningService<FileBackups>,
    first: u64,
    second: u64,
) -> versa::Result<()> {
    let diff = service.compare(first, second)?;

    println!(
        "{} {} <<>> {}",
        "Comparing".blue().bold(),
        first.to_string().yellow(),
        second.to_string().yellow()
    );
    println!();
    for record in &diff {
        print_record(record);
    }

    if diff.is_identical() {
        println!("\n{}", "Versions are identical line by line.".dimmed());
    } else {
        println!("\n{}", format!("{} of {} lines differ", diff.divergent_count(), diff.len()).dimmed());
    }
    Ok(())
}

/// Print every version containing a keyword
fn cmd_search(service: &VersioningService<FileBackups>, keyword: &str) {
    if !service.has_keyword(keyword) {
        println!("Your keyword '{}' was not found in any version.", keyword);
        return;
    }

    println!(
        "The keyword '{}' has been found in the following versions:",
        keyword.cyan()
    );
    for snapshot in service.search_iter(keyword) {
        print_snapshot(snapshot);
    }
}

/// Print every version
fn cmd_list(service: &VersioningService<FileBackups>) {
    println!("Number of versions: {}", service.len());
    for snapshot in service.list_all() {
        print_snapshot(snapshot);
    }
}

/// Interactive prompt
///
/// Reads single-character commands until `e` or end of input. Operation
/// errors are reported and the prompt continues.
fn cmd_shell<R: BufRead>(
    service: &mut VersioningService<FileBackups>,
    input: R,
) -> anyhow::Result<()> {
    let mut prompt = Prompt::new(input);

    println!("{}", "Welcome to the versa file versioning system!".blue().bold());
    println!(
        "Tracking {} ({} versions)\n",
        service.backups().tracked().display().to_string().cyan(),
        service.len()
    );
    println!("{}", INSTRUCTIONS);

    let mut question = "\nPick action: ";
    while let Some(command) = prompt.ask(question)? {
        question = "\nChoose next action: ";

        let outcome = match command.chars().next() {
            Some('e') => break,
            Some('p') => {
                cmd_list(service);
                Ok(())
            }
            Some('i') => {
                println!("{}", INSTRUCTIONS);
                Ok(())
            }
            Some('a') => cmd_add(service),
            Some('r') => {
                match prompt.ask_version("Enter the number of the version that you want to delete: ")? {
                    Some(version) => cmd_remove(service, version),
                    None => Ok(()),
                }
            }
            Some('l') => match prompt.ask_version("Which version would you like to load? ")? {
                Some(version) => cmd_load(service, version),
                None => Ok(()),
            },
            Some('c') => {
                let first = prompt.ask_version("Please enter the number of the first version to compare: ")?;
                let second = match first {
                    Some(_) => prompt.ask_version("Please enter the number of the second version to compare: ")?,
                    None => None,
                };
                match (first, second) {
                    (Some(first), Some(second)) => cmd_compare(service, first, second),
                    _ => Ok(()),
                }
            }
            Some('s') => {
                match prompt.ask("Please enter the keyword that you are looking for: ")? {
                    Some(keyword) if !keyword.is_empty() => cmd_search(service, &keyword),
                    _ => println!("{}", "No keyword given.".yellow()),
                }
                Ok(())
            }
            _ => {
                println!("Unrecognized command. Press 'i' for instructions");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            report_versa(&e);
        }
    }

    println!("versa versioning system has terminated.");
    Ok(())
}

/// Line-oriented reader for the interactive prompt
struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    /// Print `question` and read one trimmed line, `None` at end of input
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a version number, reporting input that is not one
    fn ask_version(&mut self, question: &str) -> io::Result<Option<u64>> {
        let Some(answer) = self.ask(question)? else {
            return Ok(None);
        };
        match answer.parse::<u64>() {
            Ok(version) => Ok(Some(version)),
            Err(_) => {
                report_versa(&VersaError::VersionNotFound(0));
                Ok(None)
            }
        }
    }
}

// Helper functions

/// Print one snapshot block
fn print_snapshot(snapshot: &Snapshot) {
    println!();
    println!("Version number: {}", snapshot.version().to_string().yellow().bold());
    println!("Hash Value: {}", snapshot.hash().to_string().dimmed());
    println!("Content: {}", snapshot.content());
}

/// Print one diff line
fn print_record(record: &LineRecord) {
    match &record.status {
        LineStatus::Identical(_) => {
            println!("Line {}: {}", record.number, "<Identical>".dimmed());
        }
        LineStatus::Divergent { left, right } => {
            println!(
                "Line {}: {} {} {}",
                record.number,
                left.to_string().red(),
                "<<>>".dimmed(),
                right.to_string().green()
            );
        }
    }
}

/// Report an operation error to the user
fn report_versa(err: &VersaError) {
    eprintln!("{}", err.user_message().red());
}

/// Report a top-level error
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<VersaError>() {
        Some(versa_err) => report_versa(versa_err),
        None => eprintln!("{}: {:#}", "Error".red().bold(), err),
    }
}
