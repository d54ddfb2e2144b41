use crate::error::BoxError;
use crate::value::{UnmarshalText, Value};
use serde::de::DeserializeOwned;
use std::ops::{Deref, DerefMut};

/// A field whose environment value is a JSON document.
///
/// ```rust
/// use envbind::{EnvStruct, Json, Processor};
/// use std::collections::HashMap;
///
/// #[derive(Debug, Default, EnvStruct)]
/// struct Config {
///     weights: Json<Vec<f64>>,
/// }
///
/// let env = HashMap::from([("WEIGHTS".to_string(), "[0.5, 1.5]".to_string())]);
/// let mut config = Config::default();
/// Processor::new().with_env(env).process("", &mut config).unwrap();
/// assert_eq!(*config.weights, vec![0.5, 1.5]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> UnmarshalText for Json<T> {
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), BoxError> {
        self.0 = serde_json::from_slice(text)?;
        Ok(())
    }
}

impl<T: DeserializeOwned + Send> Value for Json<T> {
    fn as_text_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalText> {
        Some(self)
    }
}
