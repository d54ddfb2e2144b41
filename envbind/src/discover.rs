//! Field discovery: turning a configuration struct into binding descriptors

use crate::error::Error;
use crate::naming::derive_key;
use crate::value::Value;
use crate::Options;

/// Structs deeper than this are assumed to be recursive.
pub const MAX_DEPTH: usize = 32;

/// Declarative metadata attached to a field with `#[env(...)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    /// Raw value used when the environment has none. Empty means no default.
    pub default: Option<&'static str>,
    /// Explicit required policy; `None` defers to [`Options::required`].
    pub required: Option<bool>,
    /// Explicit word splitting; `None` defers to [`Options::split_words`].
    pub split_words: Option<bool>,
    /// Alternate key that replaces the derived one.
    pub alt: Option<&'static str>,
    pub ignored: bool,
    /// Children of an embedded struct share the parent's prefix.
    pub embedded: bool,
}

/// One field of a configuration struct, as listed by [`EnvStruct::fields`].
pub struct Field<'a> {
    pub name: &'static str,
    pub tags: Tags,
    pub value: &'a mut dyn Value,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: &'a mut dyn Value, tags: Tags) -> Self {
        Self { name, tags, value }
    }
}

/// A struct whose fields can be bound from the environment.
///
/// Usually derived with `#[derive(EnvStruct)]`, which also implements
/// [`Value`] so the struct can be nested inside another one.
pub trait EnvStruct: Send {
    /// Every bindable field, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Prefix used by [`EnvStruct::from_env`].
    fn prefix() -> &'static str
    where
        Self: Sized,
    {
        ""
    }

    /// Build a default instance and populate it from the process environment.
    ///
    /// # Errors
    ///
    /// - A required variable is not set and has no default
    /// - A value cannot be converted into its field
    fn from_env() -> Result<Self, Error>
    where
        Self: Sized + Default,
    {
        let mut spec = Self::default();
        crate::process(Self::prefix(), &mut spec)?;
        Ok(spec)
    }
}

/// A binding descriptor: one leaf field together with its lookup keys.
pub struct VarInfo<'a> {
    /// Declared field name
    pub name: &'static str,
    /// Upper-cased alternate key, if the field declares one
    pub alt: Option<String>,
    /// Fully qualified lookup key
    pub key: String,
    pub tags: Tags,
    pub(crate) field: &'a mut dyn Value,
}

impl std::fmt::Debug for VarInfo<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarInfo")
            .field("name", &self.name)
            .field("alt", &self.alt)
            .field("key", &self.key)
            .field("tags", &self.tags)
            .field("type", &self.field.type_name())
            .finish()
    }
}

/// Walk `root` and list a descriptor for every leaf field.
///
/// Nested structs are replaced by their own fields. Empty `Option`s of a
/// struct, nested or bound as one variable, are filled with a default
/// instance along the way.
///
/// # Errors
///
/// Returns [`Error::InvalidSpecification`] when nesting exceeds [`MAX_DEPTH`].
pub fn discover<'a>(
    prefix: &str,
    root: &'a mut dyn EnvStruct,
    options: &Options,
) -> Result<Vec<VarInfo<'a>>, Error> {
    let mut infos = Vec::new();
    gather(prefix, root, options, 0, &mut infos)?;
    tracing::debug!(prefix, fields = infos.len(), "discovered configuration fields");
    Ok(infos)
}

fn gather<'a>(
    prefix: &str,
    spec: &'a mut dyn EnvStruct,
    options: &Options,
    depth: usize,
    infos: &mut Vec<VarInfo<'a>>,
) -> Result<(), Error> {
    if depth > MAX_DEPTH {
        return Err(Error::invalid(format!(
            "struct nesting exceeds {MAX_DEPTH} levels at prefix {prefix:?}"
        )));
    }

    for Field { name, tags, value } in spec.fields() {
        if tags.ignored {
            continue;
        }

        let key = derive_key(prefix, name, &tags, options);

        if value.is_struct() {
            let inner_prefix = if tags.embedded { prefix.to_string() } else { key };
            if let Some(inner) = value.as_struct() {
                gather(&inner_prefix, inner, options, depth + 1, infos)?;
            }
            continue;
        }

        value.allocate();
        infos.push(VarInfo {
            name,
            alt: tags
                .alt
                .filter(|alt| !alt.is_empty())
                .map(str::to_uppercase),
            key,
            tags,
            field: value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvStruct;

    #[derive(Debug, Default, EnvStruct)]
    struct Database {
        host: String,
        #[env(default = "5432")]
        port: u16,
    }

    #[derive(Debug, Default, EnvStruct)]
    struct Common {
        #[env(name = "log_level")]
        level: String,
    }

    #[derive(Debug, Default, EnvStruct)]
    #[allow(non_snake_case)]
    struct Spec {
        Name: String,
        #[env(ignored)]
        Skipped: String,
        MultiWordVar: String,
        #[env(split_words)]
        AutoSplit: String,
        database: Database,
        replica: Option<Database>,
        #[env(flatten)]
        common: Common,
        timeout: Option<u64>,
    }

    fn keys(infos: &[VarInfo<'_>]) -> Vec<String> {
        infos.iter().map(|info| info.key.clone()).collect()
    }

    #[test]
    fn test_keys_in_declaration_order() {
        let mut spec = Spec::default();
        let infos = discover("app", &mut spec, &Options::default()).unwrap();

        assert_eq!(
            keys(&infos),
            [
                "APP_NAME",
                "APP_MULTIWORDVAR",
                "APP_AUTO_SPLIT",
                "APP_DATABASE_HOST",
                "APP_DATABASE_PORT",
                "APP_REPLICA_HOST",
                "APP_REPLICA_PORT",
                "APP_LOG_LEVEL",
                "APP_TIMEOUT",
            ]
        );
    }

    #[test]
    fn test_split_words_option() {
        let mut spec = Spec::default();
        let infos = discover("", &mut spec, &Options::new().split_words(true)).unwrap();
        assert!(keys(&infos).contains(&"MULTI_WORD_VAR".to_string()));
    }

    #[test]
    fn test_descriptor_metadata() {
        let mut spec = Spec::default();
        let infos = discover("APP", &mut spec, &Options::default()).unwrap();

        let level = infos.iter().find(|info| info.name == "level").unwrap();
        assert_eq!(level.alt.as_deref(), Some("LOG_LEVEL"));

        let port = infos.iter().find(|info| info.key == "APP_DATABASE_PORT").unwrap();
        assert_eq!(port.name, "port");
        assert_eq!(port.tags.default, Some("5432"));
        assert!(port.alt.is_none());
    }

    #[test]
    fn test_optional_struct_is_allocated() {
        let mut spec = Spec::default();
        assert!(spec.replica.is_none());

        discover("", &mut spec, &Options::default()).unwrap();
        assert!(spec.replica.is_some());
        assert!(spec.timeout.is_none());
    }

    #[derive(Default, EnvStruct)]
    struct Link {
        value: i32,
        next: Option<Box<Link>>,
    }

    #[test]
    fn test_recursive_struct_is_rejected() {
        let mut link = Link::default();
        let err = discover("", &mut link, &Options::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidSpecification { .. }));
    }

    struct Manual {
        kept: String,
        dropped: String,
    }

    impl EnvStruct for Manual {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("kept", &mut self.kept, Tags::default()),
                Field::new(
                    "dropped",
                    &mut self.dropped,
                    Tags {
                        ignored: true,
                        ..Tags::default()
                    },
                ),
            ]
        }
    }

    #[test]
    fn test_ignored_tag_at_runtime() {
        let mut manual = Manual {
            kept: String::new(),
            dropped: String::new(),
        };
        let infos = discover("", &mut manual, &Options::default()).unwrap();
        assert_eq!(keys(&infos), ["KEPT"]);
    }
}
