//! Operator notification channel configuration

use serde::{Deserialize, Serialize};

/// Telegram bot settings used for DOWN/UP announcements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
    pub parse_mode: String,
    /// Offset applied to timestamps in alert messages
    pub utc_offset_minutes: i32,
    pub timeout_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            parse_mode: "HTML".to_string(),
            utc_offset_minutes: 7 * 60,
            timeout_seconds: 10,
        }
    }
}
