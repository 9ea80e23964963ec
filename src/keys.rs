//! Musical key detection through an optional external executable.
//!
//! The detector is chosen once at startup: a real process-backed one when
//! the executable can be found, otherwise a disabled stand-in that reports
//! the tool as unavailable for every file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use crate::config::KeySettings;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key detector `{program}` is not available")]
    ToolUnavailable { program: String },
    #[error("key detector `{program}` failed ({status}): {stderr}")]
    ToolExecutionFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Something that can name the key of an audio file.
pub trait KeyDetector {
    fn detect_key(&self, path: &Path) -> Result<String, KeyError>;
}

/// Runs `<program> -n <notation> <file>` and reads the key from stdout.
#[derive(Debug, Clone)]
pub struct ExternalKeyDetector {
    program: PathBuf,
    notation: String,
}

impl ExternalKeyDetector {
    pub fn new(program: impl Into<PathBuf>, notation: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            notation: notation.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl KeyDetector for ExternalKeyDetector {
    fn detect_key(&self, path: &Path) -> Result<String, KeyError> {
        let output = Command::new(&self.program)
            .arg("-n")
            .arg(&self.notation)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| KeyError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(KeyError::ToolExecutionFailed {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| KeyError::ToolExecutionFailed {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: "no key on standard output".to_string(),
            })
    }
}

/// Used when the detector is switched off or missing.
#[derive(Debug, Clone)]
pub struct DisabledKeyDetector {
    program: String,
}

impl DisabledKeyDetector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl KeyDetector for DisabledKeyDetector {
    fn detect_key(&self, _path: &Path) -> Result<String, KeyError> {
        Err(KeyError::ToolUnavailable {
            program: self.program.clone(),
        })
    }
}

/// Whether `program` resolves to an executable file. Never runs it.
pub fn probe(program: &str) -> bool {
    resolve_program(program).is_some()
}

fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.trim().is_empty() {
        return None;
    }
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
        || fs::metadata(path.with_extension("exe"))
            .map(|m| m.is_file())
            .unwrap_or(false)
}

/// Pick the detector for this run.
pub fn select_detector(settings: &KeySettings, force_disabled: bool) -> Box<dyn KeyDetector> {
    if force_disabled || !settings.enabled {
        info!("key detection disabled");
        return Box::new(DisabledKeyDetector::new(settings.detector.clone()));
    }
    if !probe(&settings.detector) {
        warn!(
            "{} not found, tracks will keep whatever key they have",
            settings.detector
        );
        return Box::new(DisabledKeyDetector::new(settings.detector.clone()));
    }
    info!(
        "detecting keys with {} ({} notation)",
        settings.detector, settings.notation
    );
    Box::new(ExternalKeyDetector::new(
        &settings.detector,
        settings.notation.clone(),
    ))
}

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}[md]$").expect("valid key regex"))
}

/// An existing key tag is trusted only in `<1-2 digits><m|d>` form.
pub fn is_valid_key(key: &str) -> bool {
    key_re().is_match(key)
}
