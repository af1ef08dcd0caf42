//! Operator alert texts (Telegram HTML formatting).

use chrono::{DateTime, FixedOffset, Utc};

/// Local wall-clock time for alert messages, e.g. `14:05:09 19/10/2026`.
pub fn format_timestamp(now: DateTime<Utc>, utc_offset_minutes: i32) -> String {
    const FORMAT: &str = "%H:%M:%S %d/%m/%Y";
    match FixedOffset::east_opt(utc_offset_minutes * 60) {
        Some(offset) => now.with_timezone(&offset).format(FORMAT).to_string(),
        None => now.format(FORMAT).to_string(),
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Confirmed outage; failover rules were (or failed to be) switched on.
pub fn down_alert(domain: &str, timestamp: &str, rules_updated: bool) -> String {
    format!(
        "⚠️ <b>Website Down Alert</b>\n\n\
         Domain: {}\n\
         Status: DOWN\n\
         Time: {}\n\
         Action: Main Page Rule {}, Backup Page Rule {}\n\n\
         ➡️ Redirecting traffic to backup server",
        escape_html(domain),
        escape_html(timestamp),
        if rules_updated { "enabled" } else { "failed to enable" },
        if rules_updated { "disabled" } else { "failed to disable" },
    )
}

/// Recovery; normal rules were (or failed to be) restored.
pub fn recovery_alert(domain: &str, timestamp: &str, rules_updated: bool) -> String {
    format!(
        "✅ <b>Website Recovery Alert</b>\n\n\
         Domain: {}\n\
         Status: UP\n\
         Time: {}\n\
         Action: Main Page Rule {}, Backup Page Rule {}\n\n\
         ➡️ Traffic restored to main server",
        escape_html(domain),
        escape_html(timestamp),
        if rules_updated { "disabled" } else { "failed to disable" },
        if rules_updated { "enabled" } else { "failed to enable" },
    )
}
