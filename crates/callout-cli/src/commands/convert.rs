//! `callout convert` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::{CommonArgs, convert_markdown, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, converting or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.markup_config()?;
        let input = self.common.input_name();
        let markdown = self.common.read_input()?;

        let (converted, result) = convert_markdown(&markdown, &config)?;
        tracing::info!(input = %input, spliced = result.spliced, "Converted directives");
        print_warnings(&output, &input, &result);

        match &self.output {
            Some(path) => {
                std::fs::write(path, &converted)?;
                output.success(&format!(
                    "Converted {} directive(s) to {}",
                    result.spliced,
                    path.display()
                ));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(converted.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}
