//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

fn default_filter() -> &'static str {
    if AppConfig::is_production() {
        "companionfit_app=info,companionfit_core=info"
    } else {
        "companionfit_app=debug,companionfit_core=debug"
    }
}

/// Initialize tracing/logging
///
/// `RUST_LOG` overrides the default filter. Output goes to stderr so
/// `--json` command output on stdout stays machine readable.
pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter().into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
