//! Built-in coercion for sequences and maps
//!
//! Sequences are comma separated (`a,b,c`), maps are comma separated
//! `key:value` pairs (`red:1,green:2`). A blank value yields an empty
//! collection. `Vec<u8>` is filled with the raw bytes instead.

use crate::error::ConvertError;
use crate::value::{convert, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

impl<T: Value + Default + 'static> Value for Vec<T> {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        if let Some(bytes) = (&mut *self as &mut dyn Any).downcast_mut::<Vec<u8>>() {
            *bytes = raw.as_bytes().to_vec();
            return Ok(());
        }

        let mut items = Vec::new();
        if !raw.trim().is_empty() {
            for piece in raw.split(',') {
                let mut item = T::default();
                convert(&mut item, piece)?;
                items.push(item);
            }
        }
        *self = items;
        Ok(())
    }
}

impl<K, V, S> Value for HashMap<K, V, S>
where
    K: Value + Default + Eq + Hash,
    V: Value + Default,
    S: BuildHasher + Default + Send,
{
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        let mut map = HashMap::with_hasher(S::default());
        for_each_pair(raw, |key, value| {
            map.insert(key, value);
        })?;
        *self = map;
        Ok(())
    }
}

impl<K, V> Value for BTreeMap<K, V>
where
    K: Value + Default + Ord,
    V: Value + Default,
{
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        let mut map = BTreeMap::new();
        for_each_pair(raw, |key, value| {
            map.insert(key, value);
        })?;
        *self = map;
        Ok(())
    }
}

/// Convert every `key:value` item of `raw` and hand it to `insert`.
fn for_each_pair<K, V>(raw: &str, mut insert: impl FnMut(K, V)) -> Result<(), ConvertError>
where
    K: Value + Default,
    V: Value + Default,
{
    if raw.trim().is_empty() {
        return Ok(());
    }

    for pair in raw.split(',') {
        let mut parts = pair.split(':');
        let (Some(raw_key), Some(raw_value), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConvertError::InvalidMapEntry(pair.to_string()));
        };

        let mut key = K::default();
        convert(&mut key, raw_key)?;
        let mut value = V::default();
        convert(&mut value, raw_value)?;
        insert(key, value);
    }
    Ok(())
}
