use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

/// Arguments for `dl completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Generate a shell completion script for `command` into `out`.
///
/// # Errors
///
/// Returns an error if flushing the output fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) -> Result<()> {
    let name = command.get_name().to_string();
    generate(shell, command, name, out);
    out.flush()?;
    Ok(())
}
