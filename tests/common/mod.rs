//! Shared wiremock fixtures for integration tests.

#![allow(dead_code)]

use sentinel::config::{NotifyConfig, RuleApiConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ZONE: &str = "zone-1";
pub const MAIN_RULE: &str = "rule-main";
pub const BACKUP_RULE: &str = "rule-backup";
pub const BOT_TOKEN: &str = "123:abc";

pub fn rule_path(rule_id: &str) -> String {
    format!("/zones/{}/pagerules/{}", ZONE, rule_id)
}

pub fn rule_config(server: &MockServer) -> RuleApiConfig {
    RuleApiConfig {
        api_base: server.uri(),
        api_email: "ops@example.com".to_string(),
        api_key: "secret-key".to_string(),
        zone_id: ZONE.to_string(),
        main_rule_id: MAIN_RULE.to_string(),
        backup_rule_id: BACKUP_RULE.to_string(),
        cache_ttl_seconds: 30,
        timeout_seconds: 2,
    }
}

pub fn notify_config(server: &MockServer) -> NotifyConfig {
    NotifyConfig {
        enabled: true,
        api_base: server.uri(),
        bot_token: BOT_TOKEN.to_string(),
        chat_id: "42".to_string(),
        utc_offset_minutes: 0,
        ..Default::default()
    }
}

/// Serve GET for one rule with the given status.
pub async fn mount_rule(server: &MockServer, rule_id: &str, active: bool) {
    let status = if active { "active" } else { "disabled" };
    Mock::given(method("GET"))
        .and(path(rule_path(rule_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "id": rule_id, "status": status }
        })))
        .mount(server)
        .await;
}

/// Answer PATCH for one rule with `response_status`.
pub async fn mount_rule_write(server: &MockServer, rule_id: &str, response_status: u16) {
    Mock::given(method("PATCH"))
        .and(path(rule_path(rule_id)))
        .respond_with(ResponseTemplate::new(response_status).set_body_json(json!({
            "success": response_status < 300
        })))
        .mount(server)
        .await;
}

pub async fn mount_telegram(server: &MockServer, ok: bool) {
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", BOT_TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": ok })))
        .mount(server)
        .await;
}

pub async fn mount_origin(server: &MockServer, status: u16) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Requests received with the given method.
pub async fn count_requests(server: &MockServer, http_method: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == http_method)
        .count()
}
