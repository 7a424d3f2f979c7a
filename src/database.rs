//! Single-shot database connectivity probe.
//!
//! One connection is opened per `?view=db` request with the driver's default
//! timeouts, then closed. There is no pool and no retry: a failure is the
//! useful signal and is handed back to the page as a [`DbOutcome::Failed`].

use std::path::Path;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};
use sqlx::Connection;
use tracing::{debug, info, warn};

use crate::{Config, DbOutcome, DbSettings};

// ---

/// TLS is used only when not explicitly disabled and the CA bundle exists.
pub fn tls_eligible(disable_flag: bool, ca_bundle_path: &Path) -> bool {
    !disable_flag && ca_bundle_path.exists()
}

impl DbSettings {
    /// Resolve the inputs of a connection attempt from the loaded config.
    ///
    /// The CA bundle existence check happens here, at call time, so a bundle
    /// mounted after startup is picked up by the next request.
    pub fn resolve(config: &Config) -> Self {
        // ---
        DbSettings {
            host: config.db_host.clone(),
            port: config.db_port,
            database: config.db_name.clone(),
            username: config.db_username.clone(),
            password: config.db_password.clone(),
            tls_enabled: tls_eligible(config.disable_db_tls, &config.ca_bundle_path),
            ca_bundle_path: config.ca_bundle_path.clone(),
        }
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        // ---
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password);

        if self.tls_enabled {
            // Verify the server certificate against the bundle and check the hostname
            options
                .ssl_mode(MySqlSslMode::VerifyIdentity)
                .ssl_ca(&self.ca_bundle_path)
        } else {
            options.ssl_mode(MySqlSslMode::Disabled)
        }
    }
}

/// Open one connection, close it again, and report what happened.
///
/// Never returns an error: every failure becomes [`DbOutcome::Failed`]
/// carrying the driver's message.
pub async fn attempt_connection(settings: &DbSettings) -> DbOutcome {
    // ---
    debug!(
        "Attempting database connection to {}:{} (tls={})",
        settings.host, settings.port, settings.tls_enabled
    );

    match MySqlConnection::connect_with(&settings.connect_options()).await {
        Ok(conn) => {
            if let Err(e) = conn.close().await {
                debug!("Error closing probe connection: {}", e);
            }
            info!(
                "Database connection to {}/{} succeeded",
                settings.host, settings.database
            );
            DbOutcome::Connected {
                host: settings.host.clone(),
                database: settings.database.clone(),
                username: settings.username.clone(),
                tls_enabled: settings.tls_enabled,
            }
        }
        Err(e) => {
            warn!(
                "Database connection to {}/{} failed: {}",
                settings.host, settings.database, e
            );
            DbOutcome::Failed {
                host: settings.host.clone(),
                database: settings.database.clone(),
                username: settings.username.clone(),
                tls_enabled: settings.tls_enabled,
                message: e.to_string(),
            }
        }
    }
}
