//! Request-scoped data models for the status page.
//!
//! Everything here is built once per request, handed to the renderer and
//! dropped. Nothing is mutated after construction.

use serde::Serialize;

// ---

/// Placeholder for server metadata the environment did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Optional section selected by the `view` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSelector {
    Default,
    Extensions,
    Db,
}

impl ViewSelector {
    /// Exact, case-sensitive match; anything unrecognized is the default view.
    pub fn from_param(value: Option<&str>) -> Self {
        // ---
        match value {
            Some("extensions") => ViewSelector::Extensions,
            Some("db") => ViewSelector::Db,
            _ => ViewSelector::Default,
        }
    }
}

/// Snapshot of runtime and server metadata for a single request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    // ---
    pub runtime_version: String,
    pub server_software: Option<String>,
    pub document_root: Option<String>,
    pub server_name: Option<String>,
    pub host_header: Option<String>,
    /// `None` when the runtime has no opcode cache to ask about.
    pub opcode_cache: Option<bool>,
}

/// The status panel as the template sees it: absent values already replaced.
#[derive(Debug, Serialize)]
pub struct StatusPanel<'a> {
    // ---
    pub runtime_version: &'a str,
    pub server_software: &'a str,
    pub document_root: &'a str,
    pub server_name: &'a str,
    pub host_header: &'a str,
    pub opcode_cache: Option<&'static str>,
}

fn display_or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

impl RequestContext {
    // ---
    pub fn status_panel(&self) -> StatusPanel<'_> {
        // ---
        StatusPanel {
            runtime_version: &self.runtime_version,
            server_software: display_or_unknown(&self.server_software),
            document_root: display_or_unknown(&self.document_root),
            server_name: display_or_unknown(&self.server_name),
            host_header: display_or_unknown(&self.host_header),
            opcode_cache: self
                .opcode_cache
                .map(|enabled| if enabled { "Enabled" } else { "Disabled" }),
        }
    }
}

/// Names of the components loaded into the running process, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtensionList(Vec<String>);

impl ExtensionList {
    // ---
    pub fn new(mut names: Vec<String>) -> Self {
        // Byte-wise ordering, so uppercase names sort before lowercase ones
        names.sort();
        ExtensionList(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Inputs of one database connection attempt.
#[derive(Clone)]
pub struct DbSettings {
    // ---
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub tls_enabled: bool,
    pub ca_bundle_path: std::path::PathBuf,
}

impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // ---
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"****")
            .field("tls_enabled", &self.tls_enabled)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .finish()
    }
}

/// Result of a database connection attempt. Holds no credentials.
///
/// Both variants echo the resolved target so a failed attempt still shows
/// which host, database and user were tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DbOutcome {
    Connected {
        host: String,
        database: String,
        username: String,
        tls_enabled: bool,
    },
    Failed {
        host: String,
        database: String,
        username: String,
        tls_enabled: bool,
        message: String,
    },
}
