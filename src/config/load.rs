use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CURATOR__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CURATOR")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let lib = &self.library;
        for (name, value) in [
            ("library.incoming_dir", &lib.incoming_dir),
            ("library.playlists_dir", &lib.playlists_dir),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(format!("{name} must be a single directory name, got {value:?}"));
            }
        }
        if lib.incoming_dir == lib.playlists_dir {
            return Err("library.incoming_dir and library.playlists_dir must differ".to_string());
        }
        if lib.extensions.iter().all(|e| e.trim().trim_start_matches('.').is_empty()) {
            return Err("library.extensions must list at least one extension".to_string());
        }
        if self.keys.enabled && self.keys.detector.trim().is_empty() {
            return Err("keys.detector must be set when key detection is enabled".to_string());
        }
        if self.playlists.extension.trim().trim_start_matches('.').is_empty() {
            return Err("playlists.extension must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `CURATOR_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CURATOR_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/curator/config.toml`
/// or `~/.config/curator/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("curator").join("config.toml"))
}
