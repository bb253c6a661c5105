//! Configuration loading for protolens.
//!
//! ```toml
//! [linter]
//! binary = "${HOME}/.local/bin/protoc"
//! args = ["--experimental_allow_proto3_optional"]
//! lint_out = "."
//! language_marker = "proto"
//! severity = "warning"
//! ```

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use protolens_lint::LinterConfig;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProtolensConfig {
    pub linter: LinterConfig,
}

impl ProtolensConfig {
    /// Load from `explicit` if given, else from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse TOML text and expand `${VAR}` references.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env(|var| env::var(var).ok());
        Ok(config)
    }

    fn expand_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let linter = &mut self.linter;
        linter.binary = expand_env_vars_with(&linter.binary, &lookup);
        linter.lint_out = expand_env_vars_with(&linter.lint_out, &lookup);
        for arg in &mut linter.args {
            *arg = expand_env_vars_with(arg, &lookup);
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

/// Replace `${VAR}` with its value from `lookup`; unknown variables expand
/// to the empty string and an unterminated `${` is kept literally.
#[must_use]
pub fn expand_env_vars_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".protolens").join("config.toml"))
}
