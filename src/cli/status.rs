//! Status command implementation

use crate::cli::{load_config, StatusArgs};
use crate::engine::FailoverContext;
use crate::notify::AnnouncedStatus;
use crate::status::{StatusReporter, StatusSnapshot};
use colored::Colorize;
use std::fmt::Write;
use std::sync::Arc;

fn enabled(flag: bool) -> colored::ColoredString {
    if flag {
        "enabled".green()
    } else {
        "disabled".dimmed()
    }
}

/// Format a snapshot as pretty text
pub fn format_status_pretty(domain: &str, snapshot: &StatusSnapshot) -> String {
    let mut output = String::new();

    let status_display = if snapshot.status == "up" {
        "Up".green()
    } else {
        "Down".red()
    };
    let announced = match snapshot.last_notification_status {
        AnnouncedStatus::Up => "UP".green(),
        AnnouncedStatus::Down => "DOWN".red(),
    };

    let _ = writeln!(output, "Domain: {}", domain);
    let _ = writeln!(output, "Status: {}", status_display);
    let _ = writeln!(output, "Main page rule: {}", enabled(snapshot.main_page_rule_enabled));
    let _ = writeln!(
        output,
        "Backup page rule: {}",
        enabled(snapshot.backup_page_rule_enabled)
    );
    let _ = writeln!(output, "Last announced: {}", announced);
    let _ = write!(output, "Checked at: {}", snapshot.timestamp);

    output
}

/// Handle `sentinel status`
pub async fn handle_status(args: &StatusArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    config.validate()?;

    let ctx = Arc::new(FailoverContext::from_config(&config)?);
    let snapshot = StatusReporter::new(ctx).snapshot().await;

    if args.json {
        Ok(serde_json::to_string_pretty(&snapshot)?)
    } else {
        Ok(format_status_pretty(&config.monitor.domain, &snapshot))
    }
}
