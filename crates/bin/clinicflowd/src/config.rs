//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `clinicflow.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Event log and bus settings.
    pub events: EventsConfig,
    /// Notification center settings.
    pub notifications: NotificationsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Event log and event bus sizing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Maximum number of events kept in the log.
    pub retention: usize,
    /// Broadcast channel capacity; slower subscribers lag beyond this.
    pub bus_capacity: usize,
    /// Number of processed event ids the rule engine remembers.
    pub dedup_window: usize,
}

/// Notification center sizing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Maximum number of notifications kept.
    pub capacity: usize,
}

impl Config {
    /// Load configuration from `clinicflow.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override is not a valid number, or a sizing value is zero.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("clinicflow.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply `CLINICFLOW_*` overrides read through `lookup`.
    ///
    /// `RUST_LOG` wins over `CLINICFLOW_LOG`, and `CLINICFLOW_BIND` over the
    /// separate host and port variables.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("CLINICFLOW_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CLINICFLOW_PORT") {
            self.server.port = parse_number("CLINICFLOW_PORT", &port)?;
        }
        if let Some(bind) = lookup("CLINICFLOW_BIND") {
            let (host, port) = bind.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("CLINICFLOW_BIND={bind} is not host:port"))
            })?;
            self.server.host = host.to_string();
            self.server.port = parse_number("CLINICFLOW_BIND", port)?;
        }
        if let Some(url) = lookup("CLINICFLOW_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(filter) = lookup("RUST_LOG").or_else(|| lookup("CLINICFLOW_LOG")) {
            self.logging.filter = filter;
        }

        let sizes = [
            ("CLINICFLOW_EVENT_RETENTION", &mut self.events.retention),
            ("CLINICFLOW_BUS_CAPACITY", &mut self.events.bus_capacity),
            ("CLINICFLOW_DEDUP_WINDOW", &mut self.events.dedup_window),
            ("CLINICFLOW_NOTIFICATION_CAPACITY", &mut self.notifications.capacity),
        ];
        for (name, slot) in sizes {
            if let Some(raw) = lookup(name) {
                *slot = parse_number(name, &raw)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        let sizes = [
            ("events.retention", self.events.retention),
            ("events.bus_capacity", self.events.bus_capacity),
            ("events.dedup_window", self.events.dedup_window),
            ("notifications.capacity", self.notifications.capacity),
        ];
        match sizes.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::Validation(format!("{name} must be non-zero"))),
            None => Ok(()),
        }
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{name}={raw} is not a valid number")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:clinicflow.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "clinicflowd=info,clinicflow=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            retention: 1000,
            bus_capacity: 256,
            dedup_window: 1024,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
