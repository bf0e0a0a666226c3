//! Example demonstrating custom conversions through the Set contract

use envbind::{Bindable, BoxError, EnvBind, Set};

/// Log level parsed case-insensitively
#[derive(Debug, Default, Clone, Copy)]
enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Set for Level {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        *self = match value.to_ascii_lowercase().as_str() {
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" | "warning" => Level::Warn,
            "error" => Level::Error,
            other => return Err(format!("unknown log level {other:?}").into()),
        };
        Ok(())
    }
}

impl Bindable for Level {
    fn as_set(&mut self) -> Option<&mut dyn Set> {
        Some(self)
    }
}

#[derive(Debug, Default, EnvBind)]
struct Config {
    #[env(default = "info")]
    pub log_level: Level,

    // Elements of a list go through the same conversion
    pub audit_levels: Vec<Level>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_LOG_LEVEL", "WARNING");
    std::env::set_var("APP_AUDIT_LEVELS", "warn,error");

    let mut config = Config::default();
    envbind::bind("app", &mut config)?;

    println!("Configuration loaded:");
    println!("  Log Level: {:?}", config.log_level);
    println!("  Audit Levels: {:?}", config.audit_levels);

    // Conversion failures name the variable, the field and the type
    std::env::set_var("APP_LOG_LEVEL", "verbose");
    if let Err(err) = envbind::bind("app", &mut config) {
        println!("Error: {err}");
    }

    Ok(())
}
