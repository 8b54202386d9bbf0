//! Configuration sources composed through the `config` crate builder.
//! Precedence: defaults (lowest) -> XDG config file -> local file ->
//! environment (highest). CLI flags are applied on top by the caller.

use std::path::Path;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};

use crate::merge::MergePolicy;
use crate::remote::DEFAULT_BASE_URL;

pub(super) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("strategy", MergePolicy::default().to_string())?
        .set_default("base_url", DEFAULT_BASE_URL)
}

/// Standard file locations when no explicit path is given: the XDG config
/// directory, then a `specsync` file in the working directory. Both are
/// optional.
pub(super) fn add_default_files(
    builder: ConfigBuilder<DefaultState>,
) -> ConfigBuilder<DefaultState> {
    let mut builder = builder;
    if let Some(dirs) = directories::ProjectDirs::from("", "specsync", "specsync") {
        let xdg_path = dirs.config_dir().join("config.toml");
        builder = builder.add_source(File::from(xdg_path).required(false));
    }
    builder.add_source(File::with_name("specsync").required(false))
}

pub(super) fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path.to_path_buf()))
}

/// Environment variables use a double-underscore prefix and nesting
/// separator: `SPECSYNC__API_KEY`, `SPECSYNC__LOGGING__LEVEL`.
pub(super) fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("SPECSYNC")
            .prefix_separator("__")
            .separator("__"),
    )
}
