//! Detecting misspelled or stale environment variables

use envbind::EnvBind;

#[derive(Debug, Default, Clone, EnvBind)]
struct Config {
    #[env(default = 8080)]
    pub port: u16,
    pub debug: bool,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_PORT", "9090");
    std::env::set_var("APP_DEBGU", "true"); // typo
    std::env::set_var("APP_LEGACY_MODE", "1"); // no longer read

    let mut config = Config::default();
    for name in envbind::find_unused("app", &config)? {
        eprintln!("warning: {name} is set but not used");
    }

    envbind::bind("app", &mut config)?;
    println!("Port: {}, Debug: {}", config.port, config.debug);

    Ok(())
}
