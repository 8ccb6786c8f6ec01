//! pakprune - Trim stock content and platform-specific mesh files from map pakfiles
//!
//! Usage:
//!   pakprune <archive>                      - Run both passes with the default manifests
//!   pakprune <archive> --textures <file>    - Use a different texture manifest
//!   pakprune <archive> --strategy scratch   - Strip VTX files via a scratch directory
//!   pakprune <archive> --dry-run            - Report only, never modify the archive

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dialoguer::Input;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pakprune::pak_utils::{compare_with_manifests, strip_platform_variants};
use pakprune::{
    is_affirmative, AlwaysAccept, AlwaysDecline, Confirm, Error, ManifestPaths, StripStrategy,
};

const EXIT_SUCCESS: u8 = 0;
/// Exit code when the archive does not exist
const EXIT_NO_ARCHIVE: u8 = 1;
/// Exit code when the VTX pass fails
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "pakprune")]
#[command(version)]
#[command(about = "Remove stock content and unused VTX files from a map pakfile")]
#[command(long_about = None)]
struct Cli {
    /// Path to the pakfile .zip archive
    archive: PathBuf,

    /// Manifest of stock texture entries
    #[arg(long, env = "PAKPRUNE_TEXTURES", default_value = "default_textures.txt")]
    textures: PathBuf,

    /// Manifest of stock model entries (.mdl)
    #[arg(long, env = "PAKPRUNE_MODELS", default_value = "default_models.txt")]
    models: PathBuf,

    /// Manifest of stock sound entries
    #[arg(long, env = "PAKPRUNE_SOUNDS", default_value = "default_sounds.txt")]
    sounds: PathBuf,

    /// How VTX files are removed from the archive
    #[arg(long, value_enum, env = "PAKPRUNE_STRATEGY", default_value = "rewrite")]
    strategy: Strategy,

    /// Skip the stock manifest pass
    #[arg(long)]
    skip_manifests: bool,

    /// Skip the platform VTX pass
    #[arg(long)]
    skip_variants: bool,

    /// Answer yes to every prompt
    #[arg(short, long)]
    yes: bool,

    /// Report matches without modifying the archive
    #[arg(long, conflicts_with = "yes")]
    dry_run: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pause: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn manifest_paths(&self) -> ManifestPaths {
        ManifestPaths {
            textures: self.textures.clone(),
            models: self.models.clone(),
            sounds: self.sounds.clone(),
        }
    }

    fn answerer(&self) -> Box<dyn Confirm> {
        if self.yes {
            Box::new(AlwaysAccept)
        } else if self.dry_run {
            Box::new(AlwaysDecline)
        } else {
            Box::new(ConsolePrompt)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Rewrite,
    Scratch,
}

impl From<Strategy> for StripStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Rewrite => StripStrategy::Rewrite,
            Strategy::Scratch => StripStrategy::Scratch,
        }
    }
}

/// Reads a typed yes/no answer from the terminal
struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        println!();
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match answer {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Could not read answer, treating as no: {}", e);
                false
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<u8> {
    if !cli.archive.is_file() {
        eprintln!("No archive found at {}", cli.archive.display());
        return Ok(EXIT_NO_ARCHIVE);
    }

    let mut confirm = cli.answerer();

    if !cli.skip_manifests {
        match compare_with_manifests(&cli.archive, &cli.manifest_paths(), confirm.as_mut()) {
            Ok(outcome) => tracing::info!("Manifest pass finished: {:?}", outcome),
            Err(Error::ManifestNotFound { path }) => {
                eprintln!(
                    "Error: manifest not found: {}. Please ensure the paths are correct.",
                    path.display()
                );
            }
            Err(e) => eprintln!("Unexpected error: {}", e),
        }
    }

    if !cli.skip_variants {
        let outcome = strip_platform_variants(&cli.archive, cli.strategy.into(), confirm.as_mut())
            .with_context(|| format!("Failed to strip VTX files from {}", cli.archive.display()))?;
        tracing::info!("VTX pass finished: {:?}", outcome);
    }

    Ok(EXIT_SUCCESS)
}

/// Run both passes and map a fatal error to its exit code
fn exit_code(cli: &Cli) -> u8 {
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FATAL
        }
    }
}

fn pause() {
    let _ = Input::<String>::new()
        .with_prompt("Press Enter to exit")
        .allow_empty(true)
        .interact_text();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = exit_code(&cli);

    if cli.pause {
        pause();
    }

    ExitCode::from(code)
}
