use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

use crate::shared::ValidationError;

/// Character set forced on every destination connection.
const DEFAULT_CHARSET: &str = "utf8mb4";

/// Configuration for connecting to a MySQL-compatible destination database.
///
/// This intentionally does not implement `Serialize` so the password cannot leak into
/// serialized forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MySqlConnectionConfig {
    /// Hostname or IP address of the MySQL server.
    pub host: String,
    /// Port number on which the MySQL server is listening.
    #[serde(default = "MySqlConnectionConfig::default_port")]
    pub port: u16,
    /// Name of the database (schema) holding the destination table.
    pub name: String,
    /// Username for authenticating with the MySQL server.
    pub username: String,
    /// Password for the specified user. Redacted in debug output.
    pub password: Option<SecretString>,
    /// Maximum number of pooled connections.
    #[serde(default = "MySqlConnectionConfig::default_max_connections")]
    pub max_connections: u32,
}

impl MySqlConnectionConfig {
    /// Default MySQL port.
    pub const DEFAULT_PORT: u16 = 3306;

    /// Default connection pool size. A single pass only ever holds one connection at a time.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 2;

    fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_max_connections() -> u32 {
        Self::DEFAULT_MAX_CONNECTIONS
    }

    /// Validates the connection settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::EmptyHost);
        }

        if self.port == 0 {
            return Err(ValidationError::PortZero);
        }

        Ok(())
    }
}

/// A trait which can be used to convert the implementation into crate specific connect
/// options.
pub trait IntoConnectOptions<Output> {
    /// Creates connection options for the server without selecting a database.
    ///
    /// Useful for administrative operations such as creating throwaway test databases.
    fn without_db(&self) -> Output;

    /// Creates connection options for the configured database.
    fn with_db(&self) -> Output;
}

impl IntoConnectOptions<MySqlConnectOptions> for MySqlConnectionConfig {
    fn without_db(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .charset(DEFAULT_CHARSET);

        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }

        options
    }

    fn with_db(&self) -> MySqlConnectOptions {
        let options: MySqlConnectOptions = self.without_db();
        options.database(&self.name)
    }
}
