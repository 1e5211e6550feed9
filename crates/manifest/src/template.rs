// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable interpolation for manifest strings

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// {execution_id}, {revision}, {pipeline}, ...; a leading `$` marks a
// shell reference and is captured so it can be skipped
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$?)\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Variables exported to build commands at run time. References to them
/// are left for the shell to expand.
pub const RUNTIME_VARS: &[&str] = &["SW_EXECUTION_ID", "SW_REVISION", "SW_PIPELINE"];

// ${VAR} or ${VAR:-default}
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("constant regex pattern is valid")
});

/// Expand `${VAR}` and `${VAR:-default}` from the process environment.
///
/// An unset variable without a default expands to the empty string.
/// [`RUNTIME_VARS`] are not expanded.
pub fn expand_env(template: &str) -> String {
    ENV_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            if RUNTIME_VARS.contains(&&caps[1]) {
                return caps[0].to_string();
            }
            std::env::var(&caps[1]).unwrap_or_else(|_| {
                caps.get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            })
        })
        .to_string()
}

/// Fill `{name}` placeholders from `vars`.
///
/// Unknown placeholders and `${...}` shell references are left as-is, so
/// shell braces such as `{a,b}` survive.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            if !caps[1].is_empty() {
                return caps[0].to_string();
            }
            vars.get(&caps[2])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
