//! Example with self-converting field types

use envbind::{BoxError, EnvStruct, EnvValue, Json, Processor, Setter, UnmarshalText};
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Parsed with a `Setter`
#[derive(Debug, Default, EnvValue)]
#[env(setter)]
struct Level(u8);

impl Setter for Level {
    fn set(&mut self, value: &str) -> Result<(), BoxError> {
        self.0 = match value.to_ascii_lowercase().as_str() {
            "error" => 0,
            "warn" => 1,
            "info" => 2,
            "debug" => 3,
            other => return Err(format!("unknown level {other:?}").into()),
        };
        Ok(())
    }
}

/// Parsed from text, like a URL
#[derive(Debug, Default, EnvValue)]
#[env(text)]
struct Endpoint {
    scheme: String,
    authority: String,
}

impl UnmarshalText for Endpoint {
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), BoxError> {
        let text = std::str::from_utf8(text)?;
        let (scheme, authority) = text.split_once("://").ok_or("missing scheme")?;
        self.scheme = scheme.to_string();
        self.authority = authority.to_string();
        Ok(())
    }
}

/// Parsed through `FromStr`
#[derive(Debug, Default, EnvValue)]
#[env(from_str)]
enum Mode {
    #[default]
    Development,
    Production,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RateLimit {
    burst: u32,
    per_second: f64,
}

#[derive(Debug, Default, EnvStruct)]
struct Config {
    level: Level,
    endpoint: Endpoint,
    mode: Mode,
    #[env(default = r#"{"burst": 10, "per_second": 2.5}"#)]
    rate_limit: Json<RateLimit>,
    #[env(default = "red:1,green:2")]
    weights: HashMap<String, u32>,
}

fn main() -> anyhow::Result<()> {
    let env = HashMap::from([
        ("API_LEVEL".to_string(), "Debug".to_string()),
        ("API_ENDPOINT".to_string(), "https://api.example.com".to_string()),
        ("API_MODE".to_string(), "prod".to_string()),
    ]);

    let mut config = Config::default();
    Processor::new().with_env(env).process("api", &mut config)?;

    println!("{config:#?}");
    println!("Level: {}", config.level.0);
    println!("Endpoint: {} over {}", config.endpoint.authority, config.endpoint.scheme);
    println!(
        "Rate limit: {} burst, {}/s",
        config.rate_limit.burst, config.rate_limit.per_second
    );

    // Conversion failures carry the key, field, type and raw value
    let env = HashMap::from([("API_LEVEL".to_string(), "loud".to_string())]);
    let mut config = Config::default();
    if let Err(err) = Processor::new().with_env(env).process("api", &mut config) {
        println!("Error: {err}");
    }

    Ok(())
}
