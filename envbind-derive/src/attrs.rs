//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates the struct, field and value-type
//! attributes during macro expansion.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Field, Lit, LitBool, LitStr, Token};

/// Parsed struct-level `#[env(...)]` attributes of an `EnvStruct`.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Prefix used by the generated `prefix()`, empty when not given.
    pub prefix: String,
}

impl StructAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in env_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                // prefix = "..."
                if meta.path.is_ident("prefix") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parsed.prefix = lit.value();
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level env attribute"))
            })?;
        }

        Ok(parsed)
    }
}

/// Parsed field-level `#[env(...)]` attributes.
///
/// Each option maps one-to-one onto a field of the runtime `Tags`.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Alternate variable name, replacing the one derived from the field.
    pub name: Option<String>,

    /// Raw default value, converted at runtime like an environment value.
    pub default: Option<String>,

    /// `Some(true)` for `required`, `Some(false)` for `required = false`.
    pub required: Option<bool>,

    /// Per-field override of word splitting.
    pub split_words: Option<bool>,

    /// Skip the field entirely.
    pub ignored: bool,

    /// Bind a nested struct's fields under the parent's prefix.
    pub flatten: bool,
}

impl FieldAttrs {
    /// Extract and validate `#[env(...)]` attributes from a struct field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();
        let mut others = false;

        for attr in env_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                // ignored or ignored = bool
                if meta.path.is_ident("ignored") || meta.path.is_ident("skip") {
                    attrs.ignored = flag(&meta)?;
                    return Ok(());
                }
                others = true;

                // name = "..."
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.name = Some(lit.value());
                    return Ok(());
                }

                // default = literal
                if meta.path.is_ident("default") {
                    let lit: Lit = meta.value()?.parse()?;
                    attrs.default = Some(literal_string(lit)?);
                    return Ok(());
                }

                // required or required = bool
                if meta.path.is_ident("required") {
                    attrs.required = Some(flag(&meta)?);
                    return Ok(());
                }

                // split_words or split_words = bool
                if meta.path.is_ident("split_words") {
                    attrs.split_words = Some(flag(&meta)?);
                    return Ok(());
                }

                // flatten
                if meta.path.is_ident("flatten") {
                    attrs.flatten = flag(&meta)?;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        if attrs.ignored && others {
            return Err(syn::Error::new_spanned(
                field,
                "ignored fields cannot take other env attributes",
            ));
        }

        Ok(attrs)
    }
}

/// Parsed `#[env(...)]` attributes of an `EnvValue` type.
#[derive(Debug, Default)]
pub struct ValueAttrs {
    pub decoder: bool,
    pub setter: bool,
    pub text: bool,
    pub binary: bool,
    /// Coerce through `FromStr` when no capability applies.
    pub from_str: bool,
}

impl ValueAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in env_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("decoder") {
                    &mut parsed.decoder
                } else if meta.path.is_ident("setter") {
                    &mut parsed.setter
                } else if meta.path.is_ident("text") {
                    &mut parsed.text
                } else if meta.path.is_ident("binary") {
                    &mut parsed.binary
                } else if meta.path.is_ident("from_str") {
                    &mut parsed.from_str
                } else {
                    return Err(meta.error(
                        "expected one of `decoder`, `setter`, `text`, `binary`, `from_str`",
                    ));
                };
                *slot = true;
                Ok(())
            })?;
        }

        Ok(parsed)
    }

    pub fn is_empty(&self) -> bool {
        !(self.decoder || self.setter || self.text || self.binary || self.from_str)
    }
}

fn env_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("env"))
}

/// A bare flag means `true`; `flag = bool` is explicit.
fn flag(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        return Ok(lit.value);
    }
    Ok(true)
}

/// Render a default literal as the raw string it stands for.
fn literal_string(lit: Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Float(f) => Ok(f.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Char(c) => Ok(c.value().to_string()),
        other => Err(syn::Error::new_spanned(
            other,
            "default must be a string, number, boolean or char literal",
        )),
    }
}
