//! Derive macro for error types.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations,
//! standing in for `thiserror`.
//!
//! # Usage
//!
//! ```ignore
//! use neo_codec_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum CodecError {
//!     #[error("unexpected end of input")]
//!     UnexpectedEof,
//!
//!     #[error("not a PUSHDATA opcode: {0:#04x}")]
//!     NotPushData(u8),
//!
//!     #[error("var int {value} exceeds maximum {max}")]
//!     VarIntTooLarge { value: u64, max: u64 },
//! }
//! ```
//!
//! Placeholders may carry a format spec (`{0:#04x}`, `{value:>8}`). Fields
//! that the message does not mention are left out of the `write!` call, so a
//! variant may carry data that only shows up through `Debug`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_error_derive(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_error_derive(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let display_body = match &input.data {
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| {
                    let variant_name = &variant.ident;
                    let message = extract_error_message(
                        &variant.attrs,
                        variant,
                        &format!("variant `{}`", variant_name),
                    )?;
                    let (pattern, call) = display_parts(&message, &variant.fields);
                    Ok(quote! { Self::#variant_name #pattern => #call, })
                })
                .collect::<syn::Result<Vec<_>>>()?;
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Struct(data_struct) => {
            let message = extract_error_message(
                &input.attrs,
                &input.ident,
                &format!("type `{}`", input.ident),
            )?;
            let (pattern, call) = display_parts(&message, &data_struct.fields);
            quote! {
                let Self #pattern = self;
                #call
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                #display_body
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// Builds the destructuring pattern and the `write!` call for one message.
fn display_parts(message: &str, fields: &Fields) -> (TokenStream2, TokenStream2) {
    match fields {
        Fields::Unit => (quote! {}, quote! { write!(f, #message) }),
        Fields::Unnamed(unnamed) => {
            let count = unnamed.unnamed.len();
            let format_str = positional_to_named(message, count);
            let mut bindings = Vec::with_capacity(count);
            let mut args = Vec::new();
            for i in 0..count {
                let ident = format_ident!("f{}", i);
                if mentions(&format_str, &ident.to_string()) {
                    args.push(quote! { #ident = #ident });
                    bindings.push(ident.into_token_stream());
                } else {
                    bindings.push(quote! { _ });
                }
            }
            (
                quote! { ( #(#bindings),* ) },
                quote! { write!(f, #format_str #(, #args)*) },
            )
        }
        Fields::Named(named) => {
            let used: Vec<_> = named
                .named
                .iter()
                .filter_map(|field| field.ident.as_ref())
                .filter(|ident| mentions(message, &ident.to_string()))
                .collect();
            (
                quote! { { #(#used,)* .. } },
                quote! { write!(f, #message #(, #used = #used)*) },
            )
        }
    }
}

/// Returns true if `format_str` contains a `{name}` or `{name:spec}` placeholder.
fn mentions(format_str: &str, name: &str) -> bool {
    format_str.contains(&format!("{{{}}}", name)) || format_str.contains(&format!("{{{}:", name))
}

/// Rewrites positional placeholders `{0}` / `{0:spec}` to `{f0}` / `{f0:spec}`.
fn positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result
            .replace(&format!("{{{}}}", i), &format!("{{f{}}}", i))
            .replace(&format!("{{{}:", i), &format!("{{f{}:", i));
    }
    result
}

/// Extracts the message from an `#[error("...")]` attribute.
fn extract_error_message<T: ToTokens>(
    attrs: &[syn::Attribute],
    target: &T,
    target_desc: &str,
) -> syn::Result<String> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("error")) else {
        return Err(syn::Error::new_spanned(
            target,
            format!("missing #[error(\"...\")] attribute on {}", target_desc),
        ));
    };

    let Meta::List(meta_list) = &attr.meta else {
        return Err(syn::Error::new_spanned(
            &attr.meta,
            "expected #[error(\"message\")]",
        ));
    };

    match syn::parse2::<Lit>(meta_list.tokens.clone()) {
        Ok(Lit::Str(lit)) => Ok(lit.value()),
        _ => Err(syn::Error::new_spanned(
            &attr.meta,
            "the #[error] message must be a string literal, e.g. #[error(\"invalid opcode: {0}\")]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_placeholders_become_named() {
        assert_eq!(positional_to_named("bad {0} and {1}", 2), "bad {f0} and {f1}");
        assert_eq!(positional_to_named("opcode {0:#04x}", 1), "opcode {f0:#04x}");
    }

    #[test]
    fn double_digit_positions_are_not_clobbered() {
        let rewritten = positional_to_named("{1} {10}", 11);
        assert_eq!(rewritten, "{f1} {f10}");
    }

    #[test]
    fn mentions_detects_spec_and_plain_forms() {
        assert!(mentions("value {value}", "value"));
        assert!(mentions("value {value:>4}", "value"));
        assert!(!mentions("value {values}", "value"));
    }
}
