use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_curator_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CURATOR_CONFIG_PATH", "/tmp/curator-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/curator-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("curator")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("curator")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_documented_layout() {
    let s = Settings::default();
    assert_eq!(s.library.incoming_dir, "_New");
    assert_eq!(s.library.playlists_dir, "_Playlists");
    assert_eq!(s.library.reserved_prefix, "_");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.tags.low_bitrate_kbps, 250);
    assert!(s.tags.comment.is_none());
    assert_eq!(s.keys.detector, "keyfinder-cli");
    assert_eq!(s.keys.notation, "openkey");
    assert_eq!(s.playlists.extension, "m3u");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/srv/music"
incoming_dir = "Inbox"
playlists_dir = "Lists"
extensions = ["mp3", ".MP3"]
include_hidden = true

[tags]
low_bitrate_kbps = 192
comment = "curated"
prompt_rating = false

[keys]
enabled = false
detector = "/opt/bin/keyfinder-cli"
notation = "camelot"

[playlists]
extension = "m3u8"
header = false

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CURATOR_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CURATOR__TAGS__LOW_BITRATE_KBPS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root, Some(std::path::PathBuf::from("/srv/music")));
    assert_eq!(s.library.incoming_dir, "Inbox");
    assert_eq!(s.library.playlists_dir, "Lists");
    assert_eq!(s.library.extensions.len(), 2);
    assert!(s.library.include_hidden);
    // untouched keys keep their defaults
    assert_eq!(s.library.reserved_prefix, "_");
    assert_eq!(s.tags.low_bitrate_kbps, 192);
    assert_eq!(s.tags.comment.as_deref(), Some("curated"));
    assert!(!s.tags.prompt_rating);
    assert!(s.tags.extract_remixer);
    assert!(!s.keys.enabled);
    assert_eq!(s.keys.detector, "/opt/bin/keyfinder-cli");
    assert_eq!(s.keys.notation, "camelot");
    assert_eq!(s.playlists.extension, "m3u8");
    assert!(!s.playlists.header);
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[tags]
low_bitrate_kbps = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CURATOR_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CURATOR__TAGS__LOW_BITRATE_KBPS", "128");

    let s = Settings::load().unwrap();
    assert_eq!(s.tags.low_bitrate_kbps, 128);
}

#[test]
fn validate_rejects_clashing_or_nested_reserved_dirs() {
    let mut s = Settings::default();
    s.library.playlists_dir = s.library.incoming_dir.clone();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.incoming_dir = "a/b".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".to_string()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.keys.detector = String::new();
    assert!(s.validate().is_err());
    s.keys.enabled = false;
    assert!(s.validate().is_ok());
}

#[test]
fn partial_sections_fill_in_defaults() {
    let s: Settings = toml::from_str(
        r#"
[keys]
enabled = false

[playlists]
header = false
"#,
    )
    .unwrap();
    assert!(!s.keys.enabled);
    assert_eq!(s.keys.detector, "keyfinder-cli");
    assert!(!s.playlists.header);
    assert!(s.playlists.enabled);
    assert_eq!(s.library.incoming_dir, "_New");
    assert!(s.validate().is_ok());
}
