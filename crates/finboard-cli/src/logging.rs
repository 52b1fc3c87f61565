use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FINBOARD_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

static TRACING_INIT: Once = Once::new();

/// Diagnostics go to stderr so stdout stays parseable in `--json` mode.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
