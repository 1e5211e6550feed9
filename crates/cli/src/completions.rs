// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw completions <SHELL>`
//!
//! ```bash
//! sw completions bash > ~/.local/share/bash-completion/completions/sw
//! sw completions zsh > ~/.zfunc/_sw
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to `out`
pub fn write_completions<C: CommandFactory>(shell: Shell, out: &mut dyn Write) {
    let mut cmd = C::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;

    #[test]
    fn bash_script_names_the_subcommands() {
        let mut out = Vec::new();
        write_completions::<Cli>(Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();

        assert!(script.contains("_sw()"), "{script}");
        assert!(script.contains("validate"));
        assert!(script.contains("units"));
    }
}
