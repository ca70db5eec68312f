//! folder-trust - Decide and manage which folders are trusted

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use folder_trust::{
    resolver::normalize_path,
    store::remove_files,
    workspace::{TrustSource, WorkspaceTrust, WorkspaceTrustResolver},
    default_sources, TrustError, TrustLevel, TrustedFolders,
};
use folder_trust_core::{Paths, Settings};

/// folder-trust - Decide and manage which folders are trusted
#[derive(Parser)]
#[command(name = "folder-trust")]
#[command(version = "0.1.0")]
#[command(about = "Decide and manage which folders are trusted")]
#[command(long_about = "Decide and manage which folders are trusted.\n\n\
    Rules live in a JSON file mapping folders to TRUST_FOLDER, TRUST_PARENT\n\
    or DO_NOT_TRUST. The deepest rule covering a path decides it; a path no\n\
    rule covers is undecided.")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the trust decision for the current directory
    #[command(about = "Show the trust decision for the current directory")]
    Status {
        /// Trust state reported by the IDE, overriding the rule files
        #[arg(long)]
        ide_trusted: Option<bool>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a single path against the rule files
    #[command(about = "Resolve a path against the rule files")]
    Check {
        /// Path to check (defaults to the current directory)
        path: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add or update a rule
    #[command(about = "Add or update a trust rule")]
    Set {
        /// Folder the rule applies to
        path: PathBuf,

        /// Trust level: TRUST_FOLDER, TRUST_PARENT or DO_NOT_TRUST
        level: String,
    },

    /// Remove a rule
    #[command(about = "Remove a trust rule")]
    Remove {
        /// Folder whose rule to remove (defaults to the current directory)
        path: Option<PathBuf>,
    },

    /// List all rules
    #[command(about = "List trust rules from every rule file")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the user rule file
    #[command(about = "Delete the user rule file")]
    Reset {
        /// Also delete the settings file
        #[arg(long)]
        all: bool,
    },

    /// Turn folder trust checks on
    #[command(about = "Enable folder trust checks")]
    Enable,

    /// Turn folder trust checks off
    #[command(about = "Disable folder trust checks")]
    Disable,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = Paths::new();

    match cli.command {
        Commands::Status { ide_trusted, json } => cmd_status(&paths, ide_trusted, json),
        Commands::Check { path, json } => cmd_check(path, json),
        Commands::Set { path, level } => cmd_set(path, level),
        Commands::Remove { path } => cmd_remove(path),
        Commands::List { json } => cmd_list(json),
        Commands::Reset { all } => cmd_reset(&paths, all),
        Commands::Enable => cmd_toggle(&paths, true),
        Commands::Disable => cmd_toggle(&paths, false),
    }
}

/// Exit codes for `status`
const EXIT_TRUSTED: i32 = 0;
const EXIT_UNTRUSTED: i32 = 1;
const EXIT_UNDECIDED: i32 = 2;
const EXIT_FATAL_CONFIG: i32 = 3;
const EXIT_ERROR: i32 = 4;

fn cmd_status(paths: &Paths, ide_trusted: Option<bool>, json_output: bool) -> Result<()> {
    let result = workspace_decision(paths, ide_trusted);
    let code = status_exit_code(&result);

    let decision = match result {
        Ok(decision) => decision,
        Err(TrustError::FatalConfig { path, message }) => {
            eprintln!("Error in {}: {}", path.display(), message);
            eprintln!("Fix or remove the trusted folders file to continue.");
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            std::process::exit(code);
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        let verdict = match decision.is_trusted {
            Some(true) => "TRUSTED",
            Some(false) => "UNTRUSTED",
            None => "UNDECIDED",
        };
        let source = match decision.source {
            Some(TrustSource::Ide) => "ide",
            Some(TrustSource::File) => "rule file",
            None => "folder trust disabled",
        };

        println!("Workspace Trust");
        println!("{}", "=".repeat(50));
        println!();
        println!("Decision: {}", verdict);
        println!("Decided by: {}", source);
    }

    std::process::exit(code)
}

fn workspace_decision(
    paths: &Paths,
    ide_trusted: Option<bool>,
) -> std::result::Result<WorkspaceTrust, TrustError> {
    let settings = Settings::load_from(&paths.settings())?;
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let resolver =
        WorkspaceTrustResolver::with_sources(default_sources(paths), cwd).with_ide(ide_trusted);
    resolver.is_workspace_trusted(&settings)
}

/// Errors never share a code with a decision
fn status_exit_code(result: &std::result::Result<WorkspaceTrust, TrustError>) -> i32 {
    match result {
        Ok(decision) => match decision.is_trusted {
            Some(true) => EXIT_TRUSTED,
            Some(false) => EXIT_UNTRUSTED,
            None => EXIT_UNDECIDED,
        },
        Err(TrustError::FatalConfig { .. }) => EXIT_FATAL_CONFIG,
        Err(_) => EXIT_ERROR,
    }
}

fn cmd_check(path: Option<PathBuf>, json_output: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let folders = TrustedFolders::load_default(&cwd);
    let location = path.unwrap_or_else(|| cwd.clone());

    report_load_errors(&folders);

    let verdict = folders.is_path_trusted(&location);
    let matched = folders.matching_rule(&location);

    if json_output {
        let output = serde_json::json!({
            "path": normalize_path(&location, &cwd),
            "verdict": verdict,
            "rule": matched,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}: {}", verdict.as_str().to_uppercase(), location.display());
        match matched {
            Some(rule) => println!(
                "  Rule: {} = {} ({})",
                rule.path, rule.trust_level, rule.source
            ),
            None => println!("  Rule: none"),
        }
    }

    Ok(())
}

fn cmd_set(path: PathBuf, level: String) -> Result<()> {
    let level =
        TrustLevel::from_str(&level).ok_or_else(|| TrustError::InvalidLevel(level.clone()))?;

    let cwd = std::env::current_dir()?;
    let key = rule_key(Some(&path), &cwd);

    let mut folders = TrustedFolders::load_default(&cwd);
    folders.set_value(&key, level)?;

    println!("Set {} = {}", key, level);
    Ok(())
}

fn cmd_remove(path: Option<PathBuf>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let key = rule_key(path.as_deref(), &cwd);

    let mut folders = TrustedFolders::load_default(&cwd);
    if folders.remove(&key)? {
        println!("Removed rule for {}", key);
    } else {
        println!("No rule for {}", key);
    }
    Ok(())
}

fn cmd_list(json_output: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let folders = TrustedFolders::load_default(&cwd);

    if json_output {
        let output = serde_json::json!({
            "rules": folders.rules(),
            "errors": folders.errors(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if folders.rules().is_empty() {
        println!("No trust rules");
    } else {
        println!("{:<14} {:<8} {}", "LEVEL", "SOURCE", "PATH");
        println!("{}", "-".repeat(70));
        for rule in folders.rules() {
            println!(
                "{:<14} {:<8} {}",
                rule.trust_level.as_str(),
                rule.source.as_str(),
                rule.path
            );
        }
    }

    report_load_errors(&folders);
    Ok(())
}

fn cmd_reset(paths: &Paths, all: bool) -> Result<()> {
    let mut targets = vec![paths.user_rules.clone()];
    if all {
        targets.push(paths.settings());
    }

    let warnings = remove_files(&targets);
    for warning in &warnings {
        eprintln!("warning: {}", warning);
    }

    if warnings.is_empty() {
        println!("Reset folder trust data");
    }
    Ok(())
}

fn cmd_toggle(paths: &Paths, enabled: bool) -> Result<()> {
    let path = paths.settings();
    let mut settings = Settings::load_from(&path)?;
    settings.folder_trust.enabled = enabled;
    settings.save_to(&path)?;

    println!(
        "Folder trust {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

/// Rule keys are stored absolute so they mean the same from any directory
fn rule_key(path: Option<&Path>, cwd: &Path) -> String {
    let path = path.unwrap_or(cwd);
    normalize_path(path, cwd).to_string_lossy().to_string()
}

fn report_load_errors(folders: &TrustedFolders) {
    for error in folders.errors() {
        eprintln!("warning: {}", error);
    }
}
