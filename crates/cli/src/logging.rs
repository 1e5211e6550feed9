// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for `sw run`

use crate::config::Config;
use std::ffi::OsStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route tracing output to `<state>/sw.log`.
///
/// The filter comes from `SW_LOG`, then `RUST_LOG`, then `info`. Keep the
/// guard alive until exit so buffered lines are flushed.
pub fn setup_logging(config: &Config) -> std::io::Result<WorkerGuard> {
    let dir = config.log_path.parent().unwrap_or(&config.state_dir);
    let file_name = config
        .log_path
        .file_name()
        .unwrap_or_else(|| OsStr::new("sw.log"));
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("SW_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (e.g. in tests); keep it
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init();

    Ok(guard)
}
