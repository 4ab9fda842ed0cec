//! `callout check` command implementation.

use clap::Args;

use super::{CommonArgs, convert_markdown, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a directive is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.common.markup_config()?;
        let input = self.common.input_name();
        let markdown = self.common.read_input()?;

        let (_, result) = convert_markdown(&markdown, &config)?;
        output.info(&format!("{input}: {} directive(s)", result.spliced));
        print_warnings(&output, &input, &result);

        if result.warnings.is_empty() {
            output.success("No problems found.");
        } else {
            output.warning(&format!("{} warning(s)", result.warnings.len()));
        }

        Ok(())
    }
}
