use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // No-op when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_event(level: LogLevel, message: &str, context: Option<serde_json::Value>) {
    let context = context.map(|c| c.to_string()).unwrap_or_default();
    match level {
        LogLevel::Debug => tracing::debug!(context = %context, "[Batch] {}", message),
        LogLevel::Info => tracing::info!(context = %context, "[Batch] {}", message),
        LogLevel::Warn => tracing::warn!(context = %context, "[Batch] {}", message),
        LogLevel::Error => tracing::error!(context = %context, "[Batch] {}", message),
    }
}
