use super::config::{ConfigError, LogLevel};
use parking_lot::RwLock;
use std::sync::OnceLock;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Noisy HTTP-stack targets capped at `warn` unless overridden.
const QUIET_TARGETS: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Builds the `EnvFilter` for the binary's tracing subscriber.
pub struct LoggingSystem {
    directives: RwLock<Vec<Directive>>,
    default_level: LogLevel,
}

impl LoggingSystem {
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            directives: RwLock::new(Vec::new()),
            default_level,
        }
    }

    pub fn add_directive(&self, directive: &str) -> Result<(), ConfigError> {
        let parsed = directive.parse::<Directive>().map_err(|e| {
            ConfigError::InvalidConfig(format!("Invalid log directive '{directive}': {e}"))
        })?;
        self.directives.write().push(parsed);
        Ok(())
    }

    pub fn add_default_directives(&self) {
        let mut directives = self.directives.write();
        for target in QUIET_TARGETS {
            if let Ok(directive) = format!("{target}=warn").parse() {
                directives.push(directive);
            }
        }
    }

    pub fn build_filter_string(&self) -> String {
        let directives = self.directives.read();

        let mut parts = Vec::with_capacity(directives.len() + 1);
        parts.push(self.default_level.as_str().to_string());
        parts.extend(directives.iter().map(ToString::to_string));
        parts.join(",")
    }

    /// `RUST_LOG` wins over the configured level when it is set and valid.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }

        let filter_string = self.build_filter_string();
        EnvFilter::try_new(&filter_string).map_err(|e| {
            ConfigError::LoggingInit(format!("Failed to create EnvFilter '{filter_string}': {e}"))
        })
    }

    pub fn initialize_tracing(&self) -> Result<(), ConfigError> {
        let env_filter = self.env_filter()?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .map_err(|e| ConfigError::LoggingInit(e.to_string()))
    }
}

/// Install the global subscriber once; later calls return the first outcome.
pub fn setup_logging(level: LogLevel) -> Result<(), ConfigError> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    INIT.get_or_init(|| {
        let logging = LoggingSystem::new(level);
        logging.add_default_directives();
        logging.initialize_tracing().map_err(|e| e.to_string())
    })
    .clone()
    .map_err(ConfigError::LoggingInit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_without_directives() {
        let logging = LoggingSystem::new(LogLevel::Debug);
        assert_eq!(logging.build_filter_string(), "debug");
    }

    #[test]
    fn test_default_directives_quiet_http_stack() {
        let logging = LoggingSystem::new(LogLevel::Info);
        logging.add_default_directives();

        let filter = logging.build_filter_string();
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("reqwest=warn"));
        assert!(filter.contains("hyper=warn"));
    }

    #[test]
    fn test_invalid_directive_is_rejected() {
        let logging = LoggingSystem::new(LogLevel::Info);
        assert!(logging.add_directive("loggly_shipper=loudest").is_err());
        assert!(logging.add_directive("loggly_shipper=trace").is_ok());
        assert!(logging.build_filter_string().ends_with("loggly_shipper=trace"));
    }
}
