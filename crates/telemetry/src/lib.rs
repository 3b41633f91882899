//! Tracing subscriber bootstrap for bookrack.

use tracing_subscriber::EnvFilter;

use bookrack_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber according to settings.
///
/// Honors `RUST_LOG`-style filtering, defaulting to `info`. Installing a
/// second subscriber (tests, embedded use) is a silent no-op.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.ok();
}
