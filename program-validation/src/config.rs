//! Configuration for program validation
use std::num::NonZeroUsize;
use std::path::Path;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// The default tracing directives.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,program_validation=debug";

/// The default minimum number of programs in a transaction before they
/// are checked in parallel.
pub const DEFAULT_PARALLEL_MIN_PROGRAMS: usize = 8;

/// Configuration error variants.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The logging directives could not be parsed.
    #[error("[logging.directives] Invalid tracing directives '{0}': {1}")]
    InvalidLogDirectives(String, #[source] tracing_subscriber::filter::ParseError),
}

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> Result<(), ConfigError>;
}

/// Top-level configuration
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// How programs are checked
    pub validation: ValidationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings for [`ProgramValidator`](crate::program::ProgramValidator).
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Check the programs of a transaction in parallel.
    pub parallel: bool,
    /// Transactions with fewer programs than this are always checked
    /// sequentially, even if `parallel` is set.
    pub parallel_min_programs: NonZeroUsize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_min_programs: NonZeroUsize::new(DEFAULT_PARALLEL_MIN_PROGRAMS)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Logging configuration
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Tracing directives used when `RUST_LOG` is not set.
    pub directives: String,
    /// Write human readable logs instead of JSON.
    pub pretty: bool,
}

impl Validatable for LoggingConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.directives)
            .map_err(|error| {
                ConfigurationError::InvalidLogDirectives(self.directives.clone(), error)
            })
            .map_err(|error| ConfigError::Message(error.to_string()))?;

        Ok(())
    }
}

impl Settings {
    /// Load the configuration: defaults first, then the optional config
    /// file, then environment variables.
    ///
    /// The environment variables are prefixed with `PROGRAM_AUTH_` and
    /// the nested fields are separated with double underscores, so
    /// `validation.parallel_min_programs` is set with
    ///
    /// ```text
    /// PROGRAM_AUTH_VALIDATION__PARALLEL_MIN_PROGRAMS
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix("PROGRAM_AUTH")
            .separator("__")
            .prefix_separator("_")
            .try_parsing(true);

        let mut cfg_builder = Config::builder();

        cfg_builder = cfg_builder.set_default("validation.parallel", false)?;
        cfg_builder = cfg_builder.set_default(
            "validation.parallel_min_programs",
            DEFAULT_PARALLEL_MIN_PROGRAMS as u64,
        )?;
        cfg_builder = cfg_builder.set_default("logging.directives", DEFAULT_LOG_DIRECTIVES)?;
        cfg_builder = cfg_builder.set_default("logging.pretty", false)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Load the configuration from the defaults and the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(None::<&Path>)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate(self)?;

        Ok(())
    }
}
