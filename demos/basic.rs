//! Basic usage example

use envbind::EnvBind;
use std::time::Duration;

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Required field: loaded from MYAPP_DATABASE_URL
    #[env(required)]
    pub database_url: String,

    // With default value
    #[env(default = "127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type
    #[env(default = 10)]
    pub max_connections: u32,

    // Boolean type
    #[env(default = false)]
    pub debug_mode: bool,

    // Human-readable duration
    #[env(default = "30s")]
    pub request_timeout: Duration,
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=envbind=trace shows which variable bound each field
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Set environment variables for demonstration
    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("MYAPP_SERVER_ADDR", "0.0.0.0:3000");
    std::env::set_var("MYAPP_REQUEST_TIMEOUT", "1m 30s");

    // Load configuration
    let mut config = Config::default();
    envbind::bind("myapp", &mut config)?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);
    println!("  Request Timeout: {:?}", config.request_timeout);

    Ok(())
}
