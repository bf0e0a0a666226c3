//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldAttrs;

/// `EnvBind` derive macro
///
/// Implements `envbind::Bindable` for a struct with named fields: a static
/// table of field descriptors, and a `visit` method that hands every field to
/// the binder in declaration order.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env(alt = "NAME")]`: Alternate variable name, read without the prefix
/// - `#[env(default = "value")]`: Value used when no variable is set
/// - `#[env(required)]`: Fail when no variable is set and there is no default
/// - `#[env(ignored)]`: Never read or write the field
/// - `#[env(split_words)]`: Split a camel-case name into words
/// - `#[env(flatten)]`: Bind a nested struct without adding a prefix level
///
/// Every field type that is not ignored must implement `envbind::Bindable`.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(EnvBind, attributes(env))]
pub fn derive_envbind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "EnvBind does not support generic structs",
        ));
    }

    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "EnvBind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "EnvBind only supports structs",
            ));
        }
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    let mut visits = Vec::with_capacity(fields.len());

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_name = field_ident.unraw().to_string();
        let field_type = &field.ty;
        let attrs = FieldAttrs::from_field(field)?;

        // Ignored fields keep a descriptor so indices line up, but their type
        // is never required to be bindable.
        if attrs.ignored {
            descriptors.push(quote! {
                ::envbind::FieldDescriptor {
                    ignored: true,
                    ..::envbind::FieldDescriptor::new(#field_name, ::envbind::Kind::Opaque)
                }
            });
            continue;
        }

        let alt = option_str(attrs.alt.as_deref());
        let default = option_str(attrs.default.as_deref());
        let required = attrs.required;
        let split_words = attrs.split_words;
        let flatten = attrs.flatten;

        descriptors.push(quote! {
            ::envbind::FieldDescriptor {
                name: #field_name,
                kind: <#field_type as ::envbind::Bindable>::KIND,
                optional: <#field_type as ::envbind::Bindable>::OPTIONAL,
                alt: #alt,
                default: #default,
                required: #required,
                ignored: false,
                split_words: #split_words,
                flatten: #flatten,
                fields: <#field_type as ::envbind::Bindable>::fields,
            }
        });

        visits.push(quote! {
            __bound |= __walker.field(&__fields[#index], &mut self.#field_ident)?;
        });
    }

    let count = descriptors.len();

    Ok(quote! {
        impl ::envbind::Bindable for #struct_name {
            const KIND: ::envbind::Kind = ::envbind::Kind::Struct;

            fn fields() -> &'static [::envbind::FieldDescriptor] {
                static FIELDS: [::envbind::FieldDescriptor; #count] = [#(#descriptors),*];
                &FIELDS
            }

            fn visit(
                &mut self,
                __walker: &mut ::envbind::Walker<'_>,
            ) -> ::std::result::Result<bool, ::envbind::EnvError> {
                let __fields = <Self as ::envbind::Bindable>::fields();
                #[allow(unused_mut)]
                let mut __bound = false;
                #(#visits)*
                ::std::result::Result::Ok(__bound)
            }
        }
    })
}

fn option_str(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(value) => quote! { ::std::option::Option::Some(#value) },
        None => quote! { ::std::option::Option::None },
    }
}
