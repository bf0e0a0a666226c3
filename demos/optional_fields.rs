//! Example demonstrating Option<T> for optional fields

use envbind::EnvBind;

#[derive(Debug, Default, EnvBind)]
struct Tls {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    // Required field
    #[env(required)]
    pub app_name: String,

    // Optional fields - None if not set
    pub api_key: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,

    // Some only when a default applies or one of its variables is set
    #[env(default = "warn")]
    pub log_level: Option<String>,
    pub tls: Option<Tls>,
}

fn main() -> anyhow::Result<()> {
    // Set only some environment variables
    std::env::set_var("APP_APP_NAME", "my-application");
    std::env::set_var("APP_PORT", "8080");
    std::env::set_var("APP_TLS_CERT_PATH", "/etc/tls/cert.pem");
    // APP_API_KEY, APP_DEBUG not set

    let mut config = Config::default();
    envbind::bind("app", &mut config)?;

    println!("Configuration:");
    println!("  App Name: {}", config.app_name);
    println!("  API Key: {:?}", config.api_key); // None
    println!("  Port: {:?}", config.port); // Some(8080)
    println!("  Debug: {:?}", config.debug); // None
    println!("  Log Level: {:?}", config.log_level); // Some("warn")
    println!("  TLS: {:?}", config.tls); // Some(Tls { cert_path: .., key_path: "" })

    Ok(())
}
