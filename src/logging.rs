#![forbid(unsafe_code)]

//! File-only tracing. The terminal belongs to the UI, so nothing is written
//! to stdout or stderr; without a log file, logging stays off.

use std::fs::OpenOptions;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::error::ConfigError;

pub fn filter(directives: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(directives).map_err(|err| ConfigError::LogFilter {
        filter: directives.to_string(),
        reason: err.to_string(),
    })
}

/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>, ConfigError> {
    let Some(path) = &config.log_file else {
        return Ok(None);
    };
    let filter = filter(&config.log_level)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile { path: path.clone(), source })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(file_layer).init();
    Ok(Some(guard))
}
