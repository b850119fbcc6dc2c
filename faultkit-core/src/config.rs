//! Harness configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use crate::error::{self, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Top-level harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub files: FileConfig,
    pub database: DatabaseConfig,
    pub inputs: InputConfig,
}

/// Locations used by the file scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directory relative paths resolve against
    pub scratch_dir: PathBuf,
    /// Prefixes that refuse writes
    pub restricted: Vec<PathBuf>,
    /// Target of the restricted write
    pub restricted_target: PathBuf,
    /// A file expected not to exist
    pub missing_file: PathBuf,
    /// Scratch file for the read-past-end scenario
    pub data_file: PathBuf,
    /// Integer written to `data_file`
    pub data_value: i32,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("faultkit"),
            restricted: vec![PathBuf::from("/root")],
            restricted_target: PathBuf::from("/root/restricted.txt"),
            missing_file: PathBuf::from("nonexistent.txt"),
            data_file: PathBuf::from("test.dat"),
            data_value: 123,
        }
    }
}

/// The service the connect scenario targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "jdbc:mysql://localhost:3306/nonexistentdb".to_string(),
            user: "user".to_string(),
            password: "password".to_string(),
            connect_timeout_ms: 500,
        }
    }
}

/// Inputs for the in-memory scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub symbol: String,
    pub dividend: i64,
    pub divisor: i64,
    /// String whose length is taken; absent means null
    pub reference: Option<String>,
    pub array_len: usize,
    pub index: i64,
    /// Value viewed as a string
    pub coerce_value: Value,
    pub age: i64,
    pub numeric_input: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            symbol: "com.nonexistent.Class".to_string(),
            dividend: 10,
            divisor: 0,
            reference: None,
            array_len: 5,
            index: 10,
            coerce_value: Value::from(123),
            age: -5,
            numeric_input: "abc".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| error::io_failed(path, e).with_operation("config::load"))?;
        Self::from_json(&content).map_err(|e| {
            e.with_operation("config::load")
                .with_context("path", path.display().to_string())
        })
    }

    /// Parse a JSON config document
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            error::format_parse("invalid config", e).with_operation("config::from_json")
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::unclassified(e.to_string()).with_operation("config::to_json"))
    }
}
