//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{FieldAttrs, StructAttrs, ValueAttrs};

/// `EnvStruct` derive macro
///
/// Implements `envbind::EnvStruct`, listing every named field in declaration
/// order, and `envbind::Value`, so the struct can be nested in another one.
/// Every field type that is not `ignored` must implement `envbind::Value`.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(prefix = "APP")]`: Prefix used by `from_env()`
///
/// **Field-level**:
/// - `#[env(name = "ALT_NAME")]`: Alternate variable name
/// - `#[env(default = "value")]`: Raw default value
/// - `#[env(required)]` / `#[env(required = false)]`: Required policy
/// - `#[env(split_words)]` / `#[env(split_words = false)]`: Word splitting
/// - `#[env(flatten)]`: Keep the parent's prefix for a nested struct
/// - `#[env(ignored)]` / `#[env(skip)]`: Skip the field
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(EnvStruct, attributes(env))]
pub fn derive_env_struct(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_env_struct(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// `EnvValue` derive macro
///
/// Implements `envbind::Value` for a leaf type that converts itself. List the
/// capability traits the type implements; they are consulted in the order
/// decoder, setter, text, binary, then `FromStr`.
///
/// On a struct, an empty `Option` of the type is filled with its default
/// during discovery, whether or not a value is found.
///
/// ```ignore
/// #[derive(Default, EnvValue)]
/// #[env(setter)]
/// struct Level(u8);
///
/// impl envbind::Setter for Level { /* ... */ }
/// ```
///
/// # Supported Attributes
///
/// - `#[env(decoder)]`: The type implements `envbind::Decoder`
/// - `#[env(setter)]`: The type implements `envbind::Setter`
/// - `#[env(text)]`: The type implements `envbind::UnmarshalText`
/// - `#[env(binary)]`: The type implements `envbind::UnmarshalBinary`
/// - `#[env(from_str)]`: Parse with `FromStr` as the built-in coercion
#[proc_macro_derive(EnvValue, attributes(env))]
pub fn derive_env_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_env_value(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_env_struct(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let prefix = StructAttrs::from_attrs(&input.attrs)?.prefix;

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvStruct only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvStruct only supports structs",
            ));
        }
    };

    let mut bindings = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.ignored {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let label = ident.unraw().to_string();
        let tags = tags_tokens(&attrs);

        bindings.push(quote! {
            ::envbind::Field::new(#label, &mut self.#ident, #tags)
        });
    }

    Ok(quote! {
        impl #impl_generics ::envbind::EnvStruct for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::envbind::Field<'_>> {
                ::std::vec![#(#bindings),*]
            }

            fn prefix() -> &'static str {
                #prefix
            }
        }

        impl #impl_generics ::envbind::Value for #struct_name #ty_generics #where_clause {
            fn is_struct(&self) -> bool {
                true
            }

            fn as_struct(&mut self) -> ::core::option::Option<&mut dyn ::envbind::EnvStruct> {
                ::core::option::Option::Some(self)
            }

            fn nested() -> bool {
                true
            }
        }
    })
}

fn expand_env_value(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let type_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let attrs = ValueAttrs::from_attrs(&input.attrs)?;

    if attrs.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "EnvValue needs at least one of #[env(decoder)], #[env(setter)], #[env(text)], #[env(binary)] or #[env(from_str)]",
        ));
    }

    let mut methods = Vec::new();
    if attrs.decoder {
        methods.push(quote! {
            fn as_decoder(&mut self) -> ::core::option::Option<&mut dyn ::envbind::Decoder> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if attrs.setter {
        methods.push(quote! {
            fn as_setter(&mut self) -> ::core::option::Option<&mut dyn ::envbind::Setter> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if attrs.text {
        methods.push(quote! {
            fn as_text_unmarshaler(&mut self) -> ::core::option::Option<&mut dyn ::envbind::UnmarshalText> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if attrs.binary {
        methods.push(quote! {
            fn as_binary_unmarshaler(&mut self) -> ::core::option::Option<&mut dyn ::envbind::UnmarshalBinary> {
                ::core::option::Option::Some(self)
            }
        });
    }
    if attrs.from_str {
        methods.push(quote! {
            fn coerce(&mut self, raw: &str) -> ::core::result::Result<(), ::envbind::ConvertError> {
                *self = raw
                    .parse::<Self>()
                    .map_err(::envbind::ConvertError::message)?;
                ::core::result::Result::Ok(())
            }
        });
    }

    if matches!(input.data, Data::Struct(_)) {
        methods.push(quote! {
            fn struct_shaped() -> bool {
                true
            }
        });
    }

    Ok(quote! {
        impl #impl_generics ::envbind::Value for #type_name #ty_generics #where_clause {
            #(#methods)*
        }
    })
}

/// Build the `envbind::Tags` literal for one field.
fn tags_tokens(attrs: &FieldAttrs) -> TokenStream2 {
    let default = option_tokens(attrs.default.as_ref());
    let required = option_tokens(attrs.required.as_ref());
    let split_words = option_tokens(attrs.split_words.as_ref());
    let alt = option_tokens(attrs.name.as_ref());
    let embedded = attrs.flatten;

    quote! {
        ::envbind::Tags {
            default: #default,
            required: #required,
            split_words: #split_words,
            alt: #alt,
            ignored: false,
            embedded: #embedded,
        }
    }
}

fn option_tokens<T: ToTokens>(value: Option<&T>) -> TokenStream2 {
    match value {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}
