use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Builds the JSON subscriber. `RUST_LOG` wins over `default_filter` when set.
pub fn get_subscriber(default_filter: &str) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let formatting_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .json();

    Registry::default().with(env_filter).with(formatting_layer)
}

/// Installs the structured JSON logger as the global default.
/// Records emitted through the `log` facade are forwarded as well.
pub fn init_telemetry() {
    get_subscriber("info").init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_can_be_scoped() {
        let subscriber = get_subscriber("debug");
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(component = "telemetry", "scoped subscriber active");
        });
    }
}
