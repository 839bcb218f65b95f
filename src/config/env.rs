//! Environment file loading: `KEY=VALUE` lines parsed once into an immutable map.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Parsed key-value pairs from an environment file. Never exported to the process environment.
#[derive(Clone, Debug, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::MissingFile(path.to_path_buf())
            } else {
                ConfigError::Load(format!("{}: {}", path.display(), e))
            }
        })?;
        let env = Env::parse(&contents);
        tracing::debug!(path = %path.display(), keys = env.vars.len(), "env file loaded");
        Ok(env)
    }

    /// One `KEY=VALUE` per line, split on the first `=`, both sides trimmed. Values are taken
    /// literally: no quoting, no `$VAR` expansion, no inline comments. Blank lines and lines
    /// starting with `#` are skipped; a line without `=` sets its key to "".
    pub fn parse(contents: &str) -> Self {
        let vars = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let (key, value) = line.split_once('=').unwrap_or((line, ""));
                (key.trim().to_string(), value.trim().to_string())
            })
            .collect();
        Env { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Env {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

/// An environment file that is read on first access and cached for the process lifetime.
#[derive(Debug)]
pub struct EnvFile {
    path: PathBuf,
    loaded: OnceLock<Env>,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EnvFile {
            path: path.into(),
            loaded: OnceLock::new(),
        }
    }

    /// Already-parsed values; `get` never touches the filesystem.
    pub fn preloaded(env: Env) -> Self {
        let loaded = OnceLock::new();
        let _ = loaded.set(env);
        EnvFile {
            path: PathBuf::new(),
            loaded,
        }
    }

    pub fn get(&self) -> Result<&Env, ConfigError> {
        if let Some(env) = self.loaded.get() {
            return Ok(env);
        }
        let env = Env::load(&self.path)?;
        Ok(self.loaded.get_or_init(|| env))
    }
}
