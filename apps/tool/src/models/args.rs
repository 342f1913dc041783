//! # CLI Argument Definitions
//!
//! The command-line interface of the `bedrock` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "bedrock")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Keys, certificates, INI files and transport settings")]
pub struct Cli {
    /// Log level (off, error, warn, info, debug, trace); overrides `BEDROCK_LOG__LEVEL`
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Generate a key pair (`rsa[:bits]`, `ec[:curve]` or `ed25519`)
    Keygen {
        spec: String,
        /// Write `private.pem` and `public.pem` into this directory instead of printing them
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print the raw Ed25519 key bytes as hex
        #[arg(long)]
        raw: bool,
    },
    /// Check whether a certificate is trusted
    Trust {
        /// PEM certificate to check
        cert: PathBuf,
        /// PEM certificate of the claimed issuer
        #[arg(long)]
        issuer: PathBuf,
        /// PEM bundle of additionally trusted certificates
        #[arg(long, value_name = "BUNDLE")]
        trusted: Option<PathBuf>,
        /// Accept certificates outside their validity period
        #[arg(long)]
        ignore_validity: bool,
    },
    /// Convert between INI and JSON
    Ini {
        #[command(subcommand)]
        action: IniAction,
    },
    /// Show the effective transport configuration and where each value came from
    Transport {
        /// Override a field, e.g. `--set http.retry.max_retries=5`
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
        /// Configuration file layered over the defaults
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Print only the fields that differ from their original values, as JSON
        #[arg(long)]
        changes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum IniAction {
    /// Print an INI file as JSON
    ToJson {
        file: PathBuf,
        /// Keep every value as a string instead of inferring types
        #[arg(long)]
        raw: bool,
    },
    /// Render a JSON file as INI
    FromJson {
        file: PathBuf,
        /// Write the INI text to this file instead of printing it
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}
