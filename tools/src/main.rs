use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{DecodeOptions, StateRoot};
use mapstate_tools::{format_report_pretty, format_state_pretty, inspect_hash, Transport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mapstate-tools",
    version,
    about = "mapstate encoding, decoding and inspection tools"
)]
struct Cli {
    #[command(flatten)]
    limits: LimitArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON state file into a hash.
    Encode {
        /// Path to the state JSON.
        state_path: PathBuf,
        /// Produce a compressed auto-save string instead of a shareable hash.
        #[arg(long)]
        autosave: bool,
    },
    /// Decode a hash into a state.
    Decode {
        /// The hash, or `@path` to read it from a file.
        input: String,
        /// Treat the input as a compressed auto-save string.
        #[arg(long)]
        autosave: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show where the bits of a hash go.
    Inspect {
        /// The hash, or `@path` to read it from a file.
        input: String,
        /// Treat the input as a compressed auto-save string.
        #[arg(long)]
        autosave: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct LimitArgs {
    /// Maximum number of elements accepted when decoding.
    #[arg(long, global = true)]
    max_elements: Option<usize>,
    /// Maximum points per line or polygon accepted when decoding.
    #[arg(long, global = true)]
    max_points: Option<usize>,
    /// Maximum input length in characters.
    #[arg(long, global = true)]
    max_hash_chars: Option<usize>,
}

impl LimitArgs {
    fn decode_options(&self) -> DecodeOptions {
        let mut options = DecodeOptions::default();
        if let Some(max) = self.max_elements {
            options.limits.max_elements = max;
        }
        if let Some(max) = self.max_points {
            options.limits.max_points = max;
        }
        if let Some(max) = self.max_hash_chars {
            options.wire.max_hash_chars = max;
        }
        options
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

const fn transport(autosave: bool) -> Transport {
    if autosave {
        Transport::Autosave
    } else {
        Transport::Hash
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.limits.decode_options();
    tracing::trace!(target: "mapstate::tools", limits = ?options.limits, "decode limits");
    match cli.command {
        Command::Encode {
            state_path,
            autosave,
        } => {
            let root = load_state(&state_path)?;
            tracing::debug!(
                target: "mapstate::tools",
                path = %state_path.display(),
                elements = root.elements.len(),
                autosave,
                "encoding state"
            );
            let encoded = if autosave {
                codec::encode_autosave(&root)
            } else {
                codec::encode_hash(&root)
            }
            .context("encode state")?;
            println!("{encoded}");
        }
        Command::Decode {
            input,
            autosave,
            format,
        } => {
            let input = read_input(&input)?;
            tracing::debug!(target: "mapstate::tools", chars = input.len(), autosave, "decoding");
            let root = if autosave {
                codec::decode_autosave(&input, &options)
            } else {
                codec::decode_hash(&input, &options)
            }
            .with_context(|| format!("decode {} chars", input.len()))?;
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&root).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_state_pretty(&root)),
            }
        }
        Command::Inspect {
            input,
            autosave,
            format,
        } => {
            let input = read_input(&input)?;
            let report = inspect_hash(&input, transport(autosave), &options)?;
            tracing::debug!(
                target: "mapstate::tools",
                total_bits = report.total_bits,
                root_bits = report.root_bits,
                elements = report.elements.len(),
                "inspected"
            );
            match format {
                OutputFormat::Json => {
                    let json =
                        serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_report_pretty(&report)),
            }
        }
    }
    Ok(())
}

fn load_state(path: &Path) -> Result<StateRoot> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read state {}", path.display()))?;
    serde_json::from_str(&contents).context("parse state json")
}

/// Accepts a literal hash or `@path`, and strips whitespace and a leading `#`
/// so URL fragments can be pasted as is.
fn read_input(arg: &str) -> Result<String> {
    let raw = match arg.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read input {path}"))?
        }
        None => arg.to_string(),
    };
    let trimmed = raw.trim();
    Ok(trimmed.strip_prefix('#').unwrap_or(trimmed).to_string())
}
