use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Used when `RUST_LOG` is unset: request spans from tower-http plus the
/// service's own create/update/delete events.
const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Compact,
    /// One JSON object per line, for container log collectors.
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else, or nothing, is compact.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Install the global tracing subscriber on stdout.
/// - Respects `RUST_LOG` if set, otherwise `DEFAULT_FILTER`
/// - A second call is a no-op
pub fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(env_filter).with_target(false).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Pick the format from `LOG_FORMAT` and install the subscriber.
pub fn init_logging_from_env() {
    let format = LogFormat::from_value(std::env::var("LOG_FORMAT").ok().as_deref());
    init_logging(format);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_from_env_value() {
        assert_eq!(LogFormat::from_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_value(Some("pretty")), LogFormat::Compact);
        assert_eq!(LogFormat::from_value(None), LogFormat::Compact);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(LogFormat::Compact);
        init_logging(LogFormat::Json);
    }
}
