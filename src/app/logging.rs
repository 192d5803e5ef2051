//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::domain::{LogFormat, LoggingConfig};

const HTTP_NOISE_DIRECTIVES: [&str; 3] = ["hyper=warn", "reqwest=warn", "h2=warn"];

/// Build the filter for `config`; `RUST_LOG` replaces the configured level when set.
pub fn build_filter(config: &LoggingConfig, rust_log: Option<&str>) -> EnvFilter {
    let base = rust_log
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(config.level.as_str())
        .to_string();

    let mut filter = EnvFilter::try_new(&base).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.disable_httpx_noise {
        for directive in HTTP_NOISE_DIRECTIVES {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

/// Install the global subscriber, writing to stderr. Later calls are no-ops.
pub fn init(config: &LoggingConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(config, rust_log.as_deref());
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
