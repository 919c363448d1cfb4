//! [`Config`]-related definitions.

use std::{
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
    time,
};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use service::infra::postgres;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Postgres configuration.
    #[serde(default)]
    pub postgres: Postgres,

    /// Console configuration.
    #[serde(default)]
    pub console: Console,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `REALTY__`-prefixed environment variables (if
    ///   any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("REALTY").separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Postgres configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to connect with.
    #[default(SecretString::from("postgres".to_owned()))]
    pub password: SecretString,

    /// Database name to connect to.
    #[default("realty".to_owned())]
    pub dbname: String,

    /// Timeout of establishing a single connection.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: time::Duration,

    /// Maximum number of connection attempts on startup.
    #[default(NonZeroU32::MIN.saturating_add(2))]
    pub connect_attempts: NonZeroU32,

    /// Delay between two consecutive connection attempts.
    #[default(time::Duration::from_secs(2))]
    #[serde(with = "humantime_serde")]
    pub retry_delay: time::Duration,
}

impl Postgres {
    /// Returns the [`postgres::Retry`] policy of this configuration.
    #[must_use]
    pub fn retry(&self) -> postgres::Retry {
        postgres::Retry {
            attempts: self.connect_attempts,
            delay: self.retry_delay,
        }
    }
}

impl From<&Postgres> for postgres::Config {
    fn from(value: &Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            connect_timeout,
            connect_attempts: _,
            retry_delay: _,
        } = value;

        Self {
            host: Some(host.clone()),
            port: Some(*port),
            user: Some(user.clone()),
            password: Some(password.expose_secret().to_owned()),
            dbname: Some(dbname.clone()),
            connect_timeout: Some(*connect_timeout),
            // Single interactive session never needs more.
            pool: Some(postgres::PoolConfig::new(1)),
            ..Self::default()
        }
    }
}

/// Console configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Console {
    /// Maximum number of records shown at once.
    #[default(NonZeroUsize::MIN.saturating_add(9))]
    pub page_size: NonZeroUsize,
}

/// Log configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,

    /// File to append the log to.
    #[default(PathBuf::from("realty.log"))]
    pub file: PathBuf,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write as _, time::Duration};

    use pretty_assertions::assert_eq;
    use service::infra::postgres;

    use super::Config;

    #[test]
    fn falls_back_to_defaults() {
        let conf = Config::new("missing-realty-config").unwrap();

        assert_eq!(conf.console.page_size.get(), 10);
        assert_eq!(conf.postgres.connect_attempts.get(), 3);
        assert_eq!(conf.postgres.retry_delay, Duration::from_secs(2));
        assert_eq!(conf.log.file.to_str(), Some("realty.log"));

        let pg = postgres::Config::from(&conf.postgres);
        assert_eq!(pg.pool.map(|p| p.max_size), Some(1));
        assert_eq!(pg.connect_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_zero_page_size() {
        let path = std::env::temp_dir().join("realty-zero-page.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[console]\npage_size = 0").unwrap();

        let res = Config::new(path.to_str().unwrap());

        assert!(res.is_err(), "{res:?}");
    }
}
