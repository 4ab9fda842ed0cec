//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod convert;

pub(crate) use check::CheckArgs;
pub(crate) use convert::ConvertArgs;

use std::io::Read;
use std::path::PathBuf;

use callout::{DirectiveError, MarkupConfig, ProcessResult, transform};
use callout_config::{CliSettings, Config};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Markdown file to read, or `-` for stdin.
    input: PathBuf,

    /// Class prefix for `:::message` containers (overrides config).
    #[arg(long)]
    class_prefix: Option<String>,

    /// Path to configuration file (default: auto-discover callout.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load configuration with CLI overrides applied.
    fn markup_config(&self) -> Result<MarkupConfig, CliError> {
        let cli_settings = CliSettings {
            class_prefix: self.class_prefix.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(config.markup_config())
    }

    /// Read the input markdown.
    fn read_input(&self) -> Result<String, CliError> {
        if self.input.as_os_str() == "-" {
            let mut markdown = String::new();
            std::io::stdin().read_to_string(&mut markdown)?;
            return Ok(markdown);
        }
        Ok(std::fs::read_to_string(&self.input)?)
    }

    /// Display name of the input.
    fn input_name(&self) -> String {
        if self.input.as_os_str() == "-" {
            "<stdin>".to_owned()
        } else {
            self.input.display().to_string()
        }
    }
}

/// Parse, transform and serialize one markdown document.
fn convert_markdown(
    markdown: &str,
    config: &MarkupConfig,
) -> Result<(String, ProcessResult), DirectiveError> {
    let mut doc = callout_mdast::parse(markdown);
    let result = transform(&mut doc, config)?;
    Ok((callout_mdast::to_markdown(&doc), result))
}

/// Print warnings prefixed with the input name.
fn print_warnings(output: &Output, input: &str, result: &ProcessResult) {
    for warning in &result.warnings {
        output.warning(&format!("{input}: {warning}"));
    }
}
