//! Example demonstrating lists, maps, timestamps and JSON values

use chrono::{DateTime, Utc};
use envbind::{EnvBind, Json};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
struct RetryPolicy {
    pub attempts: u32,
    pub backoff_ms: u64,
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Comma-separated list
    pub tags: Vec<String>,

    // Comma-separated numbers
    pub allowed_ports: Vec<u16>,

    // Comma-separated key:value pairs
    pub log_levels: HashMap<String, String>,

    // RFC 3339 timestamp
    pub maintenance_window: DateTime<Utc>,

    // Raw bytes
    pub signing_key: Vec<u8>,

    // Structured value encoded as JSON
    pub retry: Json<RetryPolicy>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_TAGS", "production,api,v2");
    std::env::set_var("APP_ALLOWED_PORTS", "80,443,8080");
    std::env::set_var("APP_LOG_LEVELS", "http:debug,db:warn");
    std::env::set_var("APP_MAINTENANCE_WINDOW", "2024-03-01T02:00:00Z");
    std::env::set_var("APP_SIGNING_KEY", "not-so-secret");
    std::env::set_var("APP_RETRY", r#"{"attempts":3,"backoff_ms":250}"#);

    let mut config = Config::default();
    envbind::bind("app", &mut config)?;

    println!("Configuration loaded:");
    println!("  Tags: {:?}", config.tags);
    println!("  Allowed Ports: {:?}", config.allowed_ports);
    println!("  Log Levels: {:?}", config.log_levels);
    println!("  Maintenance Window: {}", config.maintenance_window);
    println!("  Signing Key: {} bytes", config.signing_key.len());
    println!(
        "  Retry: {} attempts, {}ms backoff",
        config.retry.attempts, config.retry.backoff_ms
    );

    Ok(())
}
