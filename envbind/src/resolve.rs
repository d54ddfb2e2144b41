//! Value resolution: finding a raw string for a descriptor and assigning it

use crate::discover::VarInfo;
use crate::env::Environment;
use crate::error::{Error, ParseError};
use crate::value::convert;
use crate::Options;

/// Resolve one descriptor against `env` and write the result through it.
///
/// The key is tried first, then the alternate key, then the default. A field
/// with none of those is left untouched unless it is required.
///
/// # Errors
///
/// - [`Error::RequiredValueMissing`] if a required field has no value
/// - [`Error::Parse`] if the value cannot be converted
pub fn resolve(info: VarInfo<'_>, options: &Options, env: &dyn Environment) -> Result<(), Error> {
    let mut source = "env";
    let mut value = env.lookup(&info.key);
    if value.is_none() {
        if let Some(alt) = &info.alt {
            source = "alt";
            value = env.lookup(alt);
        }
    }

    let value = match (value, info.tags.default.filter(|d| !d.is_empty())) {
        (Some(value), _) => value,
        (None, Some(default)) => {
            source = "default";
            default.to_string()
        }
        (None, None) => {
            if info.tags.required.unwrap_or(options.required) {
                let key = info.alt.unwrap_or(info.key);
                return Err(Error::missing(key));
            }
            tracing::trace!(key = %info.key, source = "unset", "leaving field untouched");
            return Ok(());
        }
    };

    tracing::trace!(key = %info.key, source, "assigning field");
    convert(info.field, &value).map_err(|source| {
        Error::from(ParseError {
            key: info.key,
            field: info.name.to_string(),
            type_name: info.field.type_name().to_string(),
            value,
            source,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::{discover, Field, Tags};
    use crate::error::ConvertError;
    use crate::EnvStruct;
    use std::collections::HashMap;

    struct One {
        tags: Tags,
        value: i32,
    }

    impl EnvStruct for One {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::new("value", &mut self.value, self.tags)]
        }
    }

    fn run(tags: Tags, options: Options, env: &[(&str, &str)]) -> (Result<(), Error>, i32) {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut one = One { tags, value: -1 };
        let result = discover("T", &mut one, &options).and_then(|infos| {
            infos
                .into_iter()
                .try_for_each(|info| resolve(info, &options, &env))
        });
        (result, one.value)
    }

    #[test]
    fn test_key_wins_over_alt_and_default() {
        let tags = Tags {
            alt: Some("other"),
            default: Some("3"),
            ..Tags::default()
        };
        let (result, value) = run(tags, Options::default(), &[("T_OTHER", "1"), ("OTHER", "2")]);
        result.unwrap();
        assert_eq!(value, 1);
    }

    #[test]
    fn test_alt_key_fallback() {
        let tags = Tags {
            alt: Some("other"),
            ..Tags::default()
        };
        let (result, value) = run(tags, Options::default(), &[("OTHER", "2")]);
        result.unwrap();
        assert_eq!(value, 2);
    }

    #[test]
    fn test_default_is_coerced() {
        let tags = Tags {
            default: Some("0x10"),
            ..Tags::default()
        };
        let (result, value) = run(tags, Options::default(), &[]);
        result.unwrap();
        assert_eq!(value, 16);
    }

    #[test]
    fn test_empty_value_is_present() {
        let tags = Tags {
            default: Some("3"),
            ..Tags::default()
        };
        let (result, value) = run(tags, Options::default(), &[("T_VALUE", "")]);
        assert!(matches!(result, Err(Error::Parse(_))));
        assert_eq!(value, -1);
    }

    #[test]
    fn test_missing_optional_is_untouched() {
        let (result, value) = run(Tags::default(), Options::default(), &[]);
        result.unwrap();
        assert_eq!(value, -1);
    }

    #[test]
    fn test_required_policy() {
        let required = Tags {
            required: Some(true),
            ..Tags::default()
        };
        let optional = Tags {
            required: Some(false),
            ..Tags::default()
        };
        let global = Options::new().required(true);

        let (result, _) = run(required, Options::default(), &[]);
        assert!(matches!(result, Err(Error::RequiredValueMissing { key }) if key == "T_VALUE"));

        let (result, _) = run(Tags::default(), global, &[]);
        assert!(matches!(result, Err(Error::RequiredValueMissing { .. })));

        let (result, _) = run(optional, global, &[]);
        result.unwrap();
    }

    #[test]
    fn test_required_reports_alt_key() {
        let tags = Tags {
            required: Some(true),
            alt: Some("legacy_value"),
            ..Tags::default()
        };
        let (result, _) = run(tags, Options::default(), &[]);
        assert!(matches!(result, Err(Error::RequiredValueMissing { key }) if key == "LEGACY_VALUE"));
    }

    #[test]
    fn test_empty_default_counts_as_none() {
        let tags = Tags {
            required: Some(true),
            default: Some(""),
            ..Tags::default()
        };
        let (result, _) = run(tags, Options::default(), &[]);
        assert!(matches!(result, Err(Error::RequiredValueMissing { .. })));
    }

    #[test]
    fn test_parse_error_fields() {
        let (result, _) = run(Tags::default(), Options::default(), &[("T_VALUE", "many")]);
        let Err(Error::Parse(err)) = result else {
            panic!("expected parse error");
        };
        assert_eq!(err.key, "T_VALUE");
        assert_eq!(err.field, "value");
        assert_eq!(err.type_name, "i32");
        assert_eq!(err.value, "many");
        assert!(matches!(err.source, ConvertError::Int { .. }));
    }
}
