use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

/// Key the best score is kept under.
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Somewhere to keep the best score between runs.
pub trait ScoreStore {
    /// The stored best score, 0 when nothing usable is stored.
    fn get(&self) -> u32;

    fn set(&mut self, value: u32) -> Result<()>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self) -> u32 {
        (**self).get()
    }

    fn set(&mut self, value: u32) -> Result<()> {
        (**self).set(value)
    }
}

/// A JSON object on disk; the score is stored as a string-encoded integer.
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScoreStore { path: path.into() }
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        match value {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("{} does not hold a JSON object", self.path.display()),
        }
    }
}

impl ScoreStore for FileScoreStore {
    fn get(&self) -> u32 {
        if !self.path.exists() {
            debug!("No score file at {}, starting from 0", self.path.display());
            return 0;
        }

        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Ignoring stored high score: {:#}", err);
                return 0;
            }
        };

        match entries.get(HIGH_SCORE_KEY) {
            Some(Value::String(s)) => s.trim().parse().unwrap_or_else(|_| {
                warn!("Stored high score {:?} is not a number", s);
                0
            }),
            // Tolerate a bare number written by hand
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
            _ => 0,
        }
    }

    fn set(&mut self, value: u32) -> Result<()> {
        // Keep whatever else lives in the file
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(HIGH_SCORE_KEY.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let text = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!("Saved high score {} to {}", value, self.path.display());
        Ok(())
    }
}

/// Keeps the score for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    value: Option<u32>,
    writes: usize,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_value(value: u32) -> Self {
        MemoryScoreStore { value: Some(value), writes: 0 }
    }

    /// Number of successful `set` calls
    #[cfg(test)]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryScoreStore {
    fn get(&self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn set(&mut self, value: u32) -> Result<()> {
        self.value = Some(value);
        self.writes += 1;
        Ok(())
    }
}
