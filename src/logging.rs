// src/logging.rs
//! Logging macros and subscriber setup shared by the server and the CLI

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_DIRECTIVES: &str = "resume_analyzer=info,rocket=warn";

/// Log through `tracing` at the given level: `app_log!(info, "x = {}", x)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Open an info-level span: `app_span!("upload", file = %name)`.
#[macro_export]
macro_rules! app_span {
    ($name:expr) => {
        ::tracing::info_span!($name)
    };
    ($name:expr, $($fields:tt)+) => {
        ::tracing::info_span!($name, $($fields)+)
    };
}

/// Install the global subscriber. `RUST_LOG` wins over the default directives.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))?;

    if json {
        Registry::default()
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .with(filter)
            .try_init()?;
    } else {
        Registry::default()
            .with(fmt::layer())
            .with(filter)
            .try_init()?;
    }

    Ok(())
}
