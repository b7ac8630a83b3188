use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging on stderr.
///
/// stdout stays reserved for what the commands print. `RUST_LOG` takes
/// precedence over the configured level.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!("Orientation telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the records of one invocation
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping one command against a worker's orientation session
pub fn create_session_span(
    operation: &str,
    session_id: Option<&str>,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "orientation_session",
        operation = operation,
        session.id = session_id,
        correlation.id = correlation_id,
    )
}
