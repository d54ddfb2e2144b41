//! The conversion seam between raw strings and field storage
//!
//! Every bindable field type implements [`Value`]. A type can take over its
//! own conversion by exposing one of the capability traits below; those are
//! consulted in a fixed order before the type's built-in coercion:
//!
//! 1. [`Decoder`]
//! 2. [`Setter`]
//! 3. [`UnmarshalText`]
//! 4. [`UnmarshalBinary`]
//! 5. [`Value::coerce`]

use crate::error::{BoxError, ConvertError};
use crate::EnvStruct;

/// Same semantics as [`Setter`], but consulted first.
pub trait Decoder {
    fn decode(&mut self, value: &str) -> Result<(), BoxError>;
}

/// A type that can assign itself from a string.
pub trait Setter {
    fn set(&mut self, value: &str) -> Result<(), BoxError>;
}

/// A type that can parse itself from raw text.
pub trait UnmarshalText {
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), BoxError>;
}

/// A type that can parse itself from raw bytes.
///
/// The bytes are the UTF-8 encoding of the environment value.
pub trait UnmarshalBinary {
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Field storage that can be populated from an environment value.
///
/// Implemented for scalars, `String`, `PathBuf`, `Duration`, `Option`, `Box`,
/// `Vec` and maps. `#[derive(EnvStruct)]` implements it for configuration
/// structs so they can be nested, and `#[derive(EnvValue)]` implements it for
/// types that bring their own conversion.
pub trait Value: Send {
    fn as_decoder(&mut self) -> Option<&mut dyn Decoder> {
        None
    }

    fn as_setter(&mut self) -> Option<&mut dyn Setter> {
        None
    }

    fn as_text_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }

    fn as_binary_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        None
    }

    /// Built-in conversion, used when no capability applies.
    fn coerce(&mut self, _raw: &str) -> Result<(), ConvertError> {
        Err(ConvertError::Unsupported {
            type_name: self.type_name(),
        })
    }

    /// Whether discovery should recurse into this value instead of binding it.
    fn is_struct(&self) -> bool {
        false
    }

    /// The nested struct to recurse into, allocating it if necessary.
    fn as_struct(&mut self) -> Option<&mut dyn EnvStruct> {
        None
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Static counterpart of [`Value::is_struct`], for wrappers that may be empty.
    fn nested() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Whether the type is a struct bound as one variable.
    ///
    /// An empty `Option` of such a type is filled with a default instance
    /// during discovery, like an `Option` of a nested struct.
    fn struct_shaped() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// Fill empty optional struct storage before resolution.
    fn allocate(&mut self) {}
}

/// Convert `raw` into `field`, honoring capability precedence.
pub fn convert(field: &mut dyn Value, raw: &str) -> Result<(), ConvertError> {
    if let Some(decoder) = field.as_decoder() {
        return decoder.decode(raw).map_err(ConvertError::Custom);
    }
    if let Some(setter) = field.as_setter() {
        return setter.set(raw).map_err(ConvertError::Custom);
    }
    if let Some(text) = field.as_text_unmarshaler() {
        return text
            .unmarshal_text(raw.as_bytes())
            .map_err(ConvertError::Custom);
    }
    if let Some(binary) = field.as_binary_unmarshaler() {
        return binary
            .unmarshal_binary(raw.as_bytes())
            .map_err(ConvertError::Custom);
    }
    field.coerce(raw)
}

impl<T: Value + Default> Value for Option<T> {
    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        convert(self.get_or_insert_with(T::default), raw)
    }

    fn is_struct(&self) -> bool {
        T::nested()
    }

    fn as_struct(&mut self) -> Option<&mut dyn EnvStruct> {
        if !T::nested() {
            return None;
        }
        self.get_or_insert_with(T::default).as_struct()
    }

    fn nested() -> bool {
        T::nested()
    }

    fn allocate(&mut self) {
        if T::struct_shaped() {
            self.get_or_insert_with(T::default);
        }
    }
}

impl<T: Value> Value for Box<T> {
    fn as_decoder(&mut self) -> Option<&mut dyn Decoder> {
        (**self).as_decoder()
    }

    fn as_setter(&mut self) -> Option<&mut dyn Setter> {
        (**self).as_setter()
    }

    fn as_text_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalText> {
        (**self).as_text_unmarshaler()
    }

    fn as_binary_unmarshaler(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        (**self).as_binary_unmarshaler()
    }

    fn coerce(&mut self, raw: &str) -> Result<(), ConvertError> {
        (**self).coerce(raw)
    }

    fn is_struct(&self) -> bool {
        (**self).is_struct()
    }

    fn as_struct(&mut self) -> Option<&mut dyn EnvStruct> {
        (**self).as_struct()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn nested() -> bool {
        T::nested()
    }

    fn struct_shaped() -> bool {
        T::struct_shaped()
    }

    fn allocate(&mut self) {
        (**self).allocate();
    }
}
