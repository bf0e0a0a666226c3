//! Nested and repeated structs example

use envbind::EnvBind;

#[derive(Debug, Default, EnvBind)]
struct Database {
    #[env(default = "localhost")]
    pub host: String,
    #[env(default = 5432)]
    pub port: u16,
}

#[derive(Debug, Default, EnvBind)]
struct Upstream {
    #[env(required)]
    pub url: String,
    #[env(default = 1)]
    pub weight: u32,
}

#[derive(Debug, Default, EnvBind)]
struct Telemetry {
    pub endpoint: String,
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    // APP_DB_HOST, APP_DB_PORT
    #[env(alt = "db")]
    pub database: Database,

    // APP_UPSTREAMS_0_URL, APP_UPSTREAMS_1_URL, ...
    pub upstreams: Vec<Upstream>,

    // APP_ENDPOINT: fields are bound as if declared here
    #[env(flatten)]
    pub telemetry: Telemetry,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_DB_HOST", "db.internal");
    std::env::set_var("APP_UPSTREAMS_0_URL", "http://10.0.0.1");
    std::env::set_var("APP_UPSTREAMS_1_URL", "http://10.0.0.2");
    std::env::set_var("APP_UPSTREAMS_1_WEIGHT", "3");
    std::env::set_var("APP_ENDPOINT", "http://collector:4318");

    let mut config = Config::default();
    envbind::bind("app", &mut config)?;

    println!("Database: {}:{}", config.database.host, config.database.port);
    for (index, upstream) in config.upstreams.iter().enumerate() {
        println!("Upstream {index}: {} (weight {})", upstream.url, upstream.weight);
    }
    println!("Telemetry: {}", config.telemetry.endpoint);

    Ok(())
}
