//! chordscope - chord progression parsing and degree analysis
//!
//! Subcommands:
//! - `chordscope chords <progression>` - List the chord symbols in a progression
//! - `chordscope degrees <progression> --key "C Major"` - Label each chord with its degree
//! - `chordscope analyze <progression> --result <file>` - Report against a key-estimation result
//! - `chordscope config` - Print the effective configuration

use anyhow::{bail, Context, Result};
use chordconf::{ChordConfig, OutputFormat};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod palette;

use palette::Palette;

#[derive(Parser)]
#[command(name = "chordscope")]
#[command(about = "Chord progression parsing and Roman-numeral degree analysis")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./chordscope.toml)
    #[arg(long, global = true, env = "CHORDSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chord symbols found in a bracketed progression
    Chords {
        /// Progression text, e.g. "[C][Am][F][G7]"
        progression: String,

        /// Also list bracket spans that were skipped
        #[arg(long)]
        show_rejected: bool,
    },

    /// Label each chord with its degree in a key
    Degrees {
        /// Progression text, e.g. "[C][Am][F][G7]"
        progression: String,

        /// Key as "<Root> <Major|Minor>", e.g. "A Minor"
        #[arg(short, long)]
        key: String,
    },

    /// Report degrees and borrowed chords against an analysis result
    Analyze {
        /// Progression text, e.g. "[C][Am][Fm][G7]"
        progression: String,

        /// Analysis result JSON file, or "-" for stdin
        #[arg(short, long)]
        result: Option<String>,

        /// Source key for a borrowed chord; an empty KEY resets it
        #[arg(short, long = "select", value_name = "CHORD=KEY")]
        select: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Also list bracket spans that were skipped
        #[arg(long)]
        show_rejected: bool,

        /// Print the pitch-class profile
        #[arg(long)]
        profile: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
    }

    let (config, sources) = ChordConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.telemetry.log_level);
    for file in &sources.files {
        info!(path = %file.display(), "loaded config file");
    }
    if !sources.env_overrides.is_empty() {
        debug!(vars = ?sources.env_overrides, "config overridden from environment");
    }

    let palette =
        Palette::new(config.output.color && !cli.no_color && std::io::stdout().is_terminal());
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Chords {
            progression,
            show_rejected,
        } => {
            let show_rejected = show_rejected || config.output.show_rejected;
            commands::chords(&mut out, &progression, show_rejected, &palette)?;
        }
        Commands::Degrees { progression, key } => {
            commands::degrees(&mut out, &progression, &key, &palette)?;
        }
        Commands::Analyze {
            progression,
            result,
            select,
            format,
            show_rejected,
            profile,
        } => {
            let source = match result {
                Some(arg) => commands::ResultSource::from_arg(&arg),
                None => match &config.analysis.result {
                    Some(path) => commands::ResultSource::File(path.clone()),
                    None => bail!(
                        "No analysis result given\n\n\
                         Pass --result <FILE> (or - for stdin), or set\n  \
                         [analysis]\n  \
                         result = \"<path>\"\n\
                         in chordscope.toml"
                    ),
                },
            };

            commands::analyze(
                &mut out,
                commands::AnalyzeOptions {
                    progression,
                    source,
                    selections: select,
                    format: format.unwrap_or(config.output.format),
                    show_rejected: show_rejected || config.output.show_rejected,
                    profile,
                },
                &palette,
            )?;
        }
        Commands::Config => {
            commands::config(&mut out, &config)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
