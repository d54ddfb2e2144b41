//! Sources of environment variables

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A read-only view of environment variables.
///
/// [`OsEnv`] reads the process environment; plain maps can stand in for it.
pub trait Environment: Send + Sync {
    /// The value of `key`, distinguishing "set but empty" from "not set".
    fn lookup(&self, key: &str) -> Option<String>;

    /// Every variable as a `(name, value)` pair.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The environment of the current process.
///
/// Values that are not valid UTF-8 are converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl Environment for OsEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        // Such names can never be set; the platform lookup may panic on them.
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .map(|(key, value)| {
                (
                    key.to_string_lossy().into_owned(),
                    value.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

impl<S: BuildHasher + Send + Sync> Environment for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl Environment for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, key: &str) -> Option<String> {
        (**self).lookup(key)
    }

    fn vars(&self) -> Vec<(String, String)> {
        (**self).vars()
    }
}
