use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used by [`init_logging_default`] when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Filter used by [`init_logging_json`] when `RUST_LOG` is unset. Store facades emit their
/// create/update/delete events at debug under `service::memory`; snapshot saves log at debug
/// under `service::storage::json_file_store` and stay hidden unless `RUST_LOG` asks for them.
pub const JSON_DIRECTIVES: &str = "info,service::memory=debug";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize tracing subscriber with compact output on stdout.
/// - Respects `RUST_LOG` if set
/// - Falls back to [`DEFAULT_DIRECTIVES`]: load counts from `service::stores` and
///   `service::bootstrap`, save failures from `service::storage`
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(env_filter(DEFAULT_DIRECTIVES))
        .with_target(false)
        .compact()
        .with_writer(|| io::stdout())
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, e.g. `RUST_LOG=info,service::storage=debug` to see every save
/// - Falls back to [`JSON_DIRECTIVES`]
/// - Targets are kept so events can be grouped by store module
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(env_filter(JSON_DIRECTIVES))
        .with_target(true)
        .json()
        .with_writer(|| io::stdout())
        .try_init();
}
