use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use vetsched_app::error::AppError;
use vetsched_app::input::load_query;
use vetsched_app::render::render_table;
use vetsched_core::config::load_config;
use vetsched_grid::ScheduleBrowser;

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let path = std::env::args()
        .nth(1)
        .or_else(|| config.input.path.clone())
        .map(PathBuf::from)
        .ok_or(AppError::MissingInput)?;

    let result = load_query(&path)?;
    let mut browser = ScheduleBrowser::new(config.grid, config.display.schedule_columns);
    browser.query_result(result)?;

    if let Some(model) = browser.model() {
        println!("{}", render_table(model, Local::now().naive_local()));
    }

    Ok(())
}
