use std::any::Any;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::path_env;

pub const LOG_FILTER_ENV: &str = "ASHARE_PANEL_LOG";
const DEFAULT_FILTER: &str = "error,ashare_panel=debug";

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

#[must_use]
pub fn active_log_dir() -> PathBuf {
    ACTIVE_LOG_DIR.get().cloned().unwrap_or_else(path_env::log_dir)
}

fn local_offset() -> time::UtcOffset {
    time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC)
}

/// Install the file subscriber; keep the returned guard alive until exit
///
/// The terminal belongs to the TUI, so nothing is ever logged to stdout.
pub fn init() -> anyhow::Result<impl Any> {
    use anyhow::Context;
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let primary = path_env::log_dir();
    let log_dir = if std::fs::create_dir_all(&primary).is_ok() {
        primary
    } else {
        let fallback = path_env::fallback_log_dir();
        _ = std::fs::create_dir_all(&fallback);
        fallback
    };
    _ = ACTIVE_LOG_DIR.set(log_dir.clone());

    let writer = RollingFileAppender::builder()
        .filename_prefix("ashare-panel")
        .filename_suffix("log")
        .max_log_files(5)
        .rotation(Rotation::DAILY)
        .build(&log_dir)
        .with_context(|| format!("日志目录不可用: {}", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(writer);

    let timer = fmt::time::OffsetTime::new(
        local_offset(),
        time::format_description::well_known::Rfc3339,
    );
    let file_line = cfg!(debug_assertions);

    let filter = std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_thread_ids(true)
        .with_file(file_line)
        .with_line_number(file_line)
        .with_writer(writer)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    tracing_subscriber::registry().with(layer).init();
    Ok(guard)
}
