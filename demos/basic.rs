//! Example loading a flat configuration from the process environment

use envbind::EnvStruct;
use std::time::Duration;

#[derive(Debug, Default, EnvStruct)]
#[env(prefix = "MYAPP")]
struct Config {
    #[env(required)]
    database_url: String,

    #[env(default = 8080)]
    port: u16,

    #[env(default = "30s")]
    timeout: Duration,

    #[env(name = "hosts")]
    allowed_hosts: Vec<String>,

    debug: bool,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/app");
    std::env::set_var("HOSTS", "a.example,b.example");
    std::env::set_var("MYAPP_DEBUG", "t");
    std::env::remove_var("MYAPP_PORT");
    std::env::remove_var("MYAPP_TIMEOUT");

    let config = Config::from_env()?;

    println!("Configuration:");
    println!("  Database URL: {}", config.database_url);
    println!("  Port (default): {}", config.port); // 8080
    println!("  Timeout (default): {:?}", config.timeout); // 30s
    println!("  Allowed hosts (alt name): {:?}", config.allowed_hosts);
    println!("  Debug: {}", config.debug);

    Ok(())
}
