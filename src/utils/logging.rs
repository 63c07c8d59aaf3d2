// utils/logging.rs

use log::{debug, error, LevelFilter};

use crate::template::TemplateError;

/// Sets the logger level based on the provided argument.
///
/// Intended for host programs; calling it twice is harmless.
pub fn initialize_logger(log_level: &str) {
    let level = parse_level(log_level);
    let _ = env_logger::Builder::new().filter(None, level).try_init();
}

fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info, // Default to Info if unrecognized
    }
}

/// Logs a template error at error level and each link of its cause chain at debug level.
pub fn log_template_error(err: &TemplateError) {
    let fields: Vec<String> = err
        .detail()
        .fields()
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{}: {}", name, v)))
        .collect();

    if fields.is_empty() {
        error!("[{}] {}", err.kind(), err.message());
    } else {
        error!("[{}] {} ({})", err.kind(), err.message(), fields.join(", "));
    }

    for (depth, link) in err.causes().enumerate() {
        debug!("  caused by #{} [{}] {}", depth + 1, link.kind_tag(), link.message());
    }
}
