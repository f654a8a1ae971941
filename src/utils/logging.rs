use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let fmt = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false);
    tracing_subscriber::registry().with(filter).with(fmt).init();
}

/// Pretty JSON of `value`, rendered only when DEBUG is enabled so hot paths skip the
/// serialization entirely.
pub(crate) fn pretty_json_if_debug<T: Serialize>(value: &T) -> Option<String> {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return None;
    }

    Some(
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>")),
    )
}
