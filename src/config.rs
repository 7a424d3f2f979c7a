//! Configuration loader for the `runtime-status-page` service.
//!
//! Every value the page reports or the database probe uses is read here,
//! once, at startup. Handlers receive the resulting [`Config`] and never
//! touch `env::var` themselves, so the render path stays free of ambient
//! process state and can be exercised in tests with hand-built configs.
use std::{env, fmt, path::PathBuf};

use anyhow::{anyhow, Result};

/// Fixed location of the RDS certificate-authority bundle.
pub const CA_BUNDLE_PATH: &str = "/opt/rds-ca-certs/rds-ca-cert-bundle.pem";

/// Parse an optional port environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable, falling back to a default.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| String::from($default))
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Clone)]
pub struct Config {
    // ---
    /// TCP port the HTTP server binds to.
    pub listen_port: u16,

    /// Database host name.
    pub db_host: String,

    /// Database TCP port.
    pub db_port: u16,

    /// Database (schema) name.
    pub db_name: String,

    /// Database user.
    pub db_username: String,

    /// Database password. Never logged, never rendered.
    pub db_password: String,

    /// True only when `DISABLE_DB_TLS` is exactly `"true"`.
    pub disable_db_tls: bool,

    /// CA bundle whose existence enables TLS for the probe.
    pub ca_bundle_path: PathBuf,

    /// Server software identifier shown on the status panel.
    pub server_software: Option<String>,

    /// Configured server name.
    pub server_name: Option<String>,

    /// Document root path.
    pub document_root: Option<String>,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `LISTEN_PORT` – HTTP port (default: 8080)
/// - `DB_HOST` / `DB_PORT` – database endpoint (default: `db`:3306)
/// - `DB_DATABASE` / `DB_USERNAME` / `DB_PASSWORD` – default `apache_php` each
/// - `DISABLE_DB_TLS` – `"true"` turns TLS off for the probe
/// - `SERVER_SOFTWARE` – defaults to this binary's name and version
/// - `SERVER_NAME`, `DOCUMENT_ROOT` – shown as `Unknown` when unset
///
/// Returns an error if a numeric variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let listen_port = parse_env_u16!("LISTEN_PORT", 8080);
    let db_port = parse_env_u16!("DB_PORT", 3306);

    let db_host = env_or!("DB_HOST", "db");
    let db_name = env_or!("DB_DATABASE", "apache_php");
    let db_username = env_or!("DB_USERNAME", "apache_php");
    let db_password = env_or!("DB_PASSWORD", "apache_php");

    let disable_db_tls = env::var("DISABLE_DB_TLS").as_deref() == Ok("true");

    let server_software = Some(env_or!(
        "SERVER_SOFTWARE",
        concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
    ));

    Ok(Config {
        listen_port,
        db_host,
        db_port,
        db_name,
        db_username,
        db_password,
        disable_db_tls,
        ca_bundle_path: PathBuf::from(CA_BUNDLE_PATH),
        server_software,
        server_name: env::var("SERVER_NAME").ok(),
        document_root: env::var("DOCUMENT_ROOT").ok(),
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The database password is masked; everything else is shown as loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  LISTEN_PORT     : {}", self.listen_port);
        tracing::info!("  DB_HOST         : {}", self.db_host);
        tracing::info!("  DB_PORT         : {}", self.db_port);
        tracing::info!("  DB_DATABASE     : {}", self.db_name);
        tracing::info!("  DB_USERNAME     : {}", self.db_username);
        tracing::info!("  DB_PASSWORD     : ****");
        tracing::info!("  DISABLE_DB_TLS  : {}", self.disable_db_tls);
        tracing::info!("  CA_BUNDLE_PATH  : {}", self.ca_bundle_path.display());
        tracing::info!("  SERVER_SOFTWARE : {:?}", self.server_software);
        tracing::info!("  SERVER_NAME     : {:?}", self.server_name);
        tracing::info!("  DOCUMENT_ROOT   : {:?}", self.document_root);
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ---
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_name", &self.db_name)
            .field("db_username", &self.db_username)
            .field("db_password", &"****")
            .field("disable_db_tls", &self.disable_db_tls)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .field("server_software", &self.server_software)
            .field("server_name", &self.server_name)
            .field("document_root", &self.document_root)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    // ---
    Config {
        listen_port: 8080,
        db_host: "db".to_string(),
        db_port: 3306,
        db_name: "apache_php".to_string(),
        db_username: "apache_php".to_string(),
        db_password: "apache_php".to_string(),
        disable_db_tls: false,
        ca_bundle_path: PathBuf::from("/nonexistent/ca-bundle.pem"),
        server_software: Some("runtime-status-page/test".to_string()),
        server_name: None,
        document_root: None,
    }
}
