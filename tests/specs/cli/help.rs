//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .sw()
        .args(&["--help"])
        .passes()
        .stdout_has("init")
        .stdout_has("validate")
        .stdout_has("run")
        .stdout_has("list")
        .stdout_has("show")
        .stdout_has("units");
}

#[test]
fn version_flag() {
    Project::empty()
        .sw()
        .args(&["--version"])
        .passes()
        .stdout_has("sw ");
}

#[test]
fn unknown_command_fails() {
    Project::empty()
        .sw()
        .args(&["deploy-everything"])
        .fails()
        .stderr_has("unrecognized subcommand");
}
