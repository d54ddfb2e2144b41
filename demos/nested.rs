//! Example with nested and flattened structs, processed in parallel

use envbind::{EnvStruct, Options, Processor};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, EnvStruct)]
struct Database {
    #[env(default = "localhost")]
    host: String,
    #[env(default = 5432)]
    port: u16,
}

#[derive(Debug, Default, EnvStruct)]
#[allow(non_snake_case)]
struct Logging {
    #[env(default = "info")]
    LogLevel: String,
}

#[derive(Debug, Default, EnvStruct)]
#[allow(non_snake_case)]
struct Config {
    // SHOP_PRIMARY_HOST, SHOP_PRIMARY_PORT
    primary: Database,

    // Allocated on demand: SHOP_REPLICA_HOST, SHOP_REPLICA_PORT
    replica: Option<Database>,

    // SHOP_LOG_LEVEL
    #[env(flatten)]
    logging: Logging,

    MaxConnections: u32,
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG=envbind=trace shows every lookup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let env = HashMap::from([
        ("SHOP_PRIMARY_HOST".to_string(), "db1.internal".to_string()),
        ("SHOP_REPLICA_HOST".to_string(), "db2.internal".to_string()),
        ("SHOP_LOG_LEVEL".to_string(), "debug".to_string()),
        ("SHOP_MAX_CONNECTIONS".to_string(), "64".to_string()),
    ]);

    let processor = Processor::new()
        .with_env(env)
        .with_options(Options::new().split_words(true).parallel(true));

    let mut config = Config::default();
    for info in processor.discover("shop", &mut config)? {
        println!("  {} -> {}", info.name, info.key);
    }

    processor.process("shop", &mut config)?;
    println!("{config:#?}");

    Ok(())
}
