//! Bind environment variables into typed configuration structs
//!
//! `envbind` walks a configuration struct, derives an environment variable
//! name for every field and converts the variable's value into the field's
//! type. The field tables are generated at compile time by
//! `#[derive(EnvStruct)]`; the conversions are resolved at runtime through
//! the [`Value`] trait.
//!
//! # Features
//!
//! - **Naming conventions**: keys are upper-cased, prefixed and optionally
//!   split into words (`MaxConnections` becomes `APP_MAX_CONNECTIONS`)
//! - **Nested structs**: named fields extend the prefix, `#[env(flatten)]`
//!   fields share it
//! - **Defaults and required fields**: per field or for the whole struct
//! - **Collections**: `Vec<T>` from `a,b,c`, maps from `k1:v1,k2:v2`
//! - **Custom types**: self-converting types via [`Decoder`], [`Setter`],
//!   [`UnmarshalText`] or [`UnmarshalBinary`]
//! - **Strict mode**: [`check_disallowed`] rejects unknown prefixed variables
//!
//! # Example
//!
//! ```rust
//! use envbind::{EnvStruct, Processor};
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, EnvStruct)]
//! struct Config {
//!     #[env(required)]
//!     database_url: String,
//!
//!     #[env(default = 8080)]
//!     port: u16,
//!
//!     #[env(default = "30s")]
//!     timeout: Duration,
//!
//!     allowed_hosts: Vec<String>,
//! }
//!
//! # fn main() -> Result<(), envbind::Error> {
//! let env = HashMap::from([
//!     ("APP_DATABASE_URL".to_string(), "postgres://localhost/db".to_string()),
//!     ("APP_ALLOWED_HOSTS".to_string(), "a.example,b.example".to_string()),
//! ]);
//!
//! let mut config = Config::default();
//! Processor::new().with_env(env).process("app", &mut config)?;
//!
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.allowed_hosts, ["a.example", "b.example"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env(default = "value")]`
//!
//! Raw value used when the variable is not set. It is converted exactly
//! like an environment value, so `default = "1m"` works for a `Duration`.
//!
//! ## `#[env(required)]`, `#[env(required = false)]`
//!
//! Fail with [`Error::RequiredValueMissing`] when neither the variable nor a
//! default is present. `required = false` opts out of
//! [`Options::required`].
//!
//! ## `#[env(name = "ALT_NAME")]`
//!
//! Replace the derived name. The alternate name is combined with the
//! prefix, and looked up on its own as a fallback:
//!
//! ```rust
//! # use envbind::EnvStruct;
//! #[derive(Default, EnvStruct)]
//! struct Config {
//!     // APP_REDIS_URL, then REDIS_URL
//!     #[env(name = "redis_url")]
//!     cache: String,
//! }
//! ```
//!
//! ## `#[env(split_words)]`, `#[env(split_words = false)]`
//!
//! Split a camel-cased field name at word boundaries, overriding
//! [`Options::split_words`].
//!
//! ## `#[env(flatten)]`
//!
//! Bind the fields of a nested struct without adding the field's own name to
//! the prefix.
//!
//! ## `#[env(ignored)]`, `#[env(skip)]`
//!
//! Leave the field out of processing entirely. Its type need not implement
//! [`Value`]. `skip` is an alias.
//!
//! ## `#[env(prefix = "APP")]` (struct level)
//!
//! Prefix used by [`EnvStruct::from_env`].

// Lets derive output name `::envbind` from inside this crate.
extern crate self as envbind;

mod collection;
mod discover;
mod env;
mod error;
mod json;
mod naming;
mod options;
mod process;
mod resolve;
mod scalar;
mod value;

pub use discover::{discover, EnvStruct, Field, Tags, VarInfo, MAX_DEPTH};
pub use env::{Environment, OsEnv};
pub use envbind_derive::{EnvStruct, EnvValue};
pub use error::{BoxError, ConvertError, Error, ParseError};
pub use json::Json;
pub use naming::split_words;
pub use options::Options;
pub use process::Processor;
pub use resolve::resolve;
pub use value::{convert, Decoder, Setter, UnmarshalBinary, UnmarshalText, Value};

/// Populate `spec` from the process environment.
///
/// # Errors
///
/// See [`Processor::process`].
pub fn process(prefix: &str, spec: &mut dyn EnvStruct) -> Result<(), Error> {
    process_with_options(prefix, spec, Options::default())
}

/// Like [`process`], with explicit [`Options`].
///
/// # Errors
///
/// See [`Processor::process`].
pub fn process_with_options(
    prefix: &str,
    spec: &mut dyn EnvStruct,
    options: Options,
) -> Result<(), Error> {
    Processor::new().with_options(options).process(prefix, spec)
}

/// Like [`process`], but panics if an error occurs.
///
/// # Panics
///
/// On any error [`process`] would return.
pub fn must_process(prefix: &str, spec: &mut dyn EnvStruct) {
    must_process_with_options(prefix, spec, Options::default());
}

/// Like [`must_process`], with explicit [`Options`].
///
/// # Panics
///
/// On any error [`process_with_options`] would return.
pub fn must_process_with_options(prefix: &str, spec: &mut dyn EnvStruct, options: Options) {
    if let Err(err) = process_with_options(prefix, spec, options) {
        tracing::error!(error = %err, prefix, "failed to load configuration");
        panic!("{err}");
    }
}

/// Fail if a variable starting with `PREFIX_` is set that `spec` does not bind.
///
/// This is only meaningful with a non-empty prefix.
///
/// # Errors
///
/// See [`Processor::check_disallowed`].
pub fn check_disallowed(prefix: &str, spec: &mut dyn EnvStruct) -> Result<(), Error> {
    check_disallowed_with_options(prefix, spec, Options::default())
}

/// Like [`check_disallowed`], with explicit [`Options`].
///
/// # Errors
///
/// See [`Processor::check_disallowed`].
pub fn check_disallowed_with_options(
    prefix: &str,
    spec: &mut dyn EnvStruct,
    options: Options,
) -> Result<(), Error> {
    Processor::new()
        .with_options(options)
        .check_disallowed(prefix, spec)
}
