//! Client settings.
//!
//! The client treats this as an opaque input record: host, port and token
//! are forwarded to the constructor with no validation beyond their types.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utility::get_file_path;

/// Settings filename inside the application directory.
pub const SETTING_FILENAME: &str = "rpc_setting.json";

/// Connection settings for the RPC client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Server host name or address.
    pub host: String,
    /// Server TCP port.
    pub port: u16,
    /// Authentication token.
    pub token: String,
    /// Optional I/O deadline in milliseconds. Absent means no timeout,
    /// matching the server's observed behavior.
    pub timeout_ms: Option<u64>,
    /// Speak the legacy dialect that double-encodes `result` as a JSON
    /// string.
    pub legacy_result: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9090,
            token: String::new(),
            timeout_ms: None,
            legacy_result: false,
        }
    }
}

impl ClientSettings {
    /// Load settings from the application directory, falling back to
    /// defaults when no file exists.
    pub fn load() -> Self {
        let path = get_file_path(SETTING_FILENAME);
        if path.exists() {
            Self::from_file(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Load settings from an explicit JSON file.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save settings to an explicit JSON file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}
