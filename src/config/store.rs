//! Durable status store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding the last announced status. In-memory when unset.
    pub path: Option<PathBuf>,
    pub key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("sentinel-state.json")),
            key: "lastStatus".to_string(),
        }
    }
}
