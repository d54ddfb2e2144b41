//! Orchestration of discovery and resolution over one struct

use crate::discover::{discover, EnvStruct, VarInfo};
use crate::env::{Environment, OsEnv};
use crate::error::Error;
use crate::resolve::resolve;
use crate::Options;
use std::collections::HashSet;

/// Binds configuration structs from an [`Environment`].
///
/// ```rust
/// use envbind::{EnvStruct, Processor};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, EnvStruct)]
/// struct Config {
///     port: u16,
///     #[env(default = "info")]
///     log_level: String,
/// }
///
/// let env = HashMap::from([("APP_PORT".to_string(), "8080".to_string())]);
///
/// let mut config = Config::default();
/// Processor::new().with_env(env).process("app", &mut config).unwrap();
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.log_level, "info");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Processor<E = OsEnv> {
    options: Options,
    env: E,
}

impl Processor {
    /// A processor over the process environment with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Environment> Processor<E> {
    /// Replace the environment the processor reads from.
    pub fn with_env<F: Environment>(self, env: F) -> Processor<F> {
        Processor {
            options: self.options,
            env,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// List the binding descriptors of `spec`.
    ///
    /// # Errors
    ///
    /// See [`discover`].
    pub fn discover<'a>(
        &self,
        prefix: &str,
        spec: &'a mut dyn EnvStruct,
    ) -> Result<Vec<VarInfo<'a>>, Error> {
        discover(prefix, spec, &self.options)
    }

    /// Populate `spec` from the environment.
    ///
    /// Sequential processing stops at the first error and keeps the fields
    /// assigned so far. Parallel processing attempts every field and reports
    /// the failures together as [`Error::Multiple`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSpecification`] if discovery fails
    /// - [`Error::RequiredValueMissing`] or [`Error::Parse`] from a field
    /// - [`Error::Multiple`] in parallel mode
    pub fn process(&self, prefix: &str, spec: &mut dyn EnvStruct) -> Result<(), Error> {
        let infos = self.discover(prefix, spec)?;

        if !self.options.parallel {
            return infos
                .into_iter()
                .try_for_each(|info| resolve(info, &self.options, &self.env));
        }

        let errors = self.resolve_parallel(infos);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Multiple(errors))
        }
    }

    fn resolve_parallel(&self, infos: Vec<VarInfo<'_>>) -> Vec<Error> {
        let options = &self.options;
        let env: &dyn Environment = &self.env;
        let (tx, rx) = flume::unbounded();

        std::thread::scope(|scope| {
            for info in infos {
                let tx = tx.clone();
                scope.spawn(move || {
                    if let Err(err) = resolve(info, options, env) {
                        // The receiver outlives the scope.
                        let _ = tx.send(err);
                    }
                });
            }
        });
        drop(tx);

        rx.drain().collect()
    }

    /// Fail if the environment holds a prefixed variable that `spec` does not bind.
    ///
    /// With an empty prefix every environment variable is checked.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSpecification`] if discovery fails
    /// - [`Error::UnknownVariable`] for the first unexpected variable
    pub fn check_disallowed(&self, prefix: &str, spec: &mut dyn EnvStruct) -> Result<(), Error> {
        let infos = self.discover(prefix, spec)?;
        let known: HashSet<String> = infos.into_iter().map(|info| info.key).collect();

        let prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}_", prefix.to_uppercase())
        };

        for (key, _) in self.env.vars() {
            if key.starts_with(&prefix) && !known.contains(&key) {
                return Err(Error::UnknownVariable { key });
            }
        }
        Ok(())
    }
}
