//! Shell completion scripts for the cmdshell binary
//!
//! Generated from the clap definition of [`CliArgs`] with `clap_complete`.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;

/// Binary name the scripts register completions for
pub const BIN_NAME: &str = "cmdshell";

/// Write the completion script for `shell` to `out`
pub fn generate_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = CliArgs::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}
