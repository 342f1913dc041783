#![allow(clippy::print_stdout, clippy::print_stderr)]

mod handlers;
mod models;

use crate::handlers::{ini, keygen, transport, trust};
use crate::models::args::{AppCommands, Cli, IniAction};

use anyhow::Result;
use bedrock::config::{ConfigLoader, ConfigSource};
use bedrock::logger::{Logger, LoggingConfig};
use clap::Parser;
use serde_json::json;

const LOG_ENV_PREFIX: &str = "BEDROCK_LOG";

fn init_logging(level: Option<String>) -> Result<Logger> {
    let mut config = ConfigLoader::<LoggingConfig>::new()
        .defaults(json!({ "name": "bedrock", "level": "warn" }))
        .env_prefix(Some(LOG_ENV_PREFIX))
        .load()?;
    if let Some(level) = level {
        config.set("level", level, ConfigSource::Override)?;
    }
    Ok(Logger::init(&config)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.log_level)?;

    match cli.command {
        AppCommands::Keygen { spec, out, raw } => keygen::generate_keys(&spec, out.as_deref(), raw)?,
        AppCommands::Trust { cert, issuer, trusted, ignore_validity } => {
            trust::check_trust(&cert, &issuer, trusted.as_deref(), ignore_validity)?;
        },
        AppCommands::Ini { action } => match action {
            IniAction::ToJson { file, raw } => ini::to_json(&file, raw)?,
            IniAction::FromJson { file, out } => ini::from_json(&file, out.as_deref())?,
        },
        AppCommands::Transport { set, config, changes } => {
            transport::show_transport(config.as_deref(), &set, changes)?;
        },
    }

    Ok(())
}
