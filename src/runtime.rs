//! Host runtime introspection.
//!
//! The renderer only talks to [`RuntimeIntrospection`], so tests can swap in
//! a runtime with any version, extension set, or opcode-cache capability.

/// Direct dependencies compiled into this binary, reported as its loaded
/// extensions. Must list exactly the `[dependencies]` of Cargo.toml; a unit
/// test fails when the two drift apart.
const COMPILED_COMPONENTS: &[&str] = &[
    "anyhow",
    "axum",
    "dotenvy",
    "is-terminal",
    "serde",
    "sqlx",
    "tera",
    "tokio",
    "tracing",
    "tracing-subscriber",
];

/// What the status page needs to know about the process it runs in.
pub trait RuntimeIntrospection: Send + Sync {
    /// Version string of the running runtime.
    fn version(&self) -> String;

    /// Names of the loaded extensions, in no particular order.
    fn loaded_extensions(&self) -> Vec<String>;

    /// `Some(enabled)` when the runtime has an opcode cache, `None` otherwise.
    fn opcode_cache(&self) -> Option<bool>;
}

/// The runtime of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRuntime;

impl RuntimeIntrospection for ProcessRuntime {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn loaded_extensions(&self) -> Vec<String> {
        COMPILED_COMPONENTS.iter().map(|s| s.to_string()).collect()
    }

    // Native code has no opcode cache
    fn opcode_cache(&self) -> Option<bool> {
        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    // ---
    use super::*;

    /// Runtime with a fixed, caller-chosen view of itself.
    pub(crate) struct StubRuntime {
        pub extensions: Vec<&'static str>,
        pub opcode_cache: Option<bool>,
    }

    impl RuntimeIntrospection for StubRuntime {
        fn version(&self) -> String {
            "9.9.9-test".to_string()
        }

        fn loaded_extensions(&self) -> Vec<String> {
            self.extensions.iter().map(|s| s.to_string()).collect()
        }

        fn opcode_cache(&self) -> Option<bool> {
            self.opcode_cache
        }
    }

    #[test]
    fn test_process_runtime_reports_crate_version() {
        // ---
        assert_eq!(ProcessRuntime.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(ProcessRuntime.opcode_cache(), None);
    }

    #[test]
    fn test_process_runtime_extensions_non_empty() {
        // ---
        let exts = ProcessRuntime.loaded_extensions();
        assert!(exts.contains(&"sqlx".to_string()));
        assert_eq!(exts.len(), COMPILED_COMPONENTS.len());
    }

    #[test]
    fn test_components_match_manifest_dependencies() {
        // ---
        let manifest = include_str!("../Cargo.toml");

        let mut declared: Vec<&str> = manifest
            .lines()
            .skip_while(|line| line.trim() != "[dependencies]")
            .skip(1)
            .take_while(|line| !line.trim_start().starts_with('['))
            .filter_map(|line| line.split('=').next())
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.starts_with('#'))
            .collect();
        declared.sort();

        let mut listed = COMPILED_COMPONENTS.to_vec();
        listed.sort();

        assert_eq!(listed, declared);
    }
}
