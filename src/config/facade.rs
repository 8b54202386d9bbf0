//! ConfigLoader facade composing defaults, files, and environment.

use std::path::Path;

use crate::error::SyncError;

use super::sources;
use super::SyncConfig;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the standard sources, or from a specific
    /// file when `explicit` is given (the file must then exist).
    pub fn load(explicit: Option<&Path>) -> Result<SyncConfig, SyncError> {
        let builder = sources::builder_with_defaults().map_err(config_error)?;
        let builder = match explicit {
            Some(path) => sources::add_file(builder, path),
            None => sources::add_default_files(builder),
        };
        let builder = sources::add_environment(builder);
        let config = builder.build().map_err(config_error)?;
        config.try_deserialize().map_err(config_error)
    }
}

fn config_error(e: config::ConfigError) -> SyncError {
    SyncError::ConfigError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergePolicy;

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specsync.toml");
        std::fs::write(
            &path,
            r#"
collection_name = "payments-api"
workspace_name = "team"
spec_url = "https://example.com/openapi.yaml"
strategy = "Replace"
api_key = "k"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.collection_name, "payments-api");
        assert_eq!(config.workspace_name.as_deref(), Some("team"));
        assert_eq!(config.policy().unwrap(), MergePolicy::Replace);
        assert_eq!(config.base_url, crate::remote::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ConfigLoader::load(Some(&path)).is_err());
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specsync.toml");
        std::fs::write(&path, "collection_name = \"api\"\napi_key = \"from-file\"\n").unwrap();

        std::env::set_var("SPECSYNC__API_KEY", "from-env");
        let config = ConfigLoader::load(Some(&path)).unwrap();
        std::env::remove_var("SPECSYNC__API_KEY");

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_defaults_apply_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.toml");
        std::fs::write(&path, "collection_name = \"api\"\n").unwrap();
        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(
            config.policy().unwrap(),
            MergePolicy::PreserveAuthoritative
        );
    }
}
