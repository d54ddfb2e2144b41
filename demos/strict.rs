//! Example rejecting unknown prefixed variables

use envbind::{EnvStruct, Error, Options, Processor};
use std::collections::HashMap;

#[derive(Debug, Default, EnvStruct)]
struct Config {
    host: String,
    port: u16,
    #[env(required = false)]
    proxy: String,
}

fn main() -> anyhow::Result<()> {
    let env = HashMap::from([
        ("WEB_HOST".to_string(), "0.0.0.0".to_string()),
        ("WEB_PORT".to_string(), "80".to_string()),
        // Typo of WEB_PORT
        ("WEB_PROT".to_string(), "8080".to_string()),
    ]);

    // Every field is required unless it opts out
    let processor = Processor::new()
        .with_env(env)
        .with_options(Options::new().required(true));

    let mut config = Config::default();
    match processor.check_disallowed("web", &mut config) {
        Err(Error::UnknownVariable { key }) => println!("Unknown variable: {key}"),
        other => other?,
    }

    processor.process("web", &mut config)?;
    println!("{config:?}");

    Ok(())
}
