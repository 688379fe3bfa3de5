//! Derive macro for the `Serializable` wire contract.
//!
//! Generates `crate::types::serializable::Serializable` for structs and enums.
//!
//! # Supported Types
//!
//! - **Named structs**: `struct Signer { account: ScriptHash, scopes: u8 }`
//! - **Tuple structs**: `struct ScriptHash([u8; 20])`
//! - **Unit structs**: `struct Marker`
//! - **Enums**: one `u8` discriminant, then the variant's fields
//!
//! # Wire Format
//!
//! Fields are written in declaration order through their own `Serializable`
//! impls, so a `Vec<T>` field is count-framed, a `String` is a VarString and a
//! fixed array is written without prefix. `size` is the sum of the field sizes
//! (plus one byte for an enum discriminant), which keeps
//! `size() == to_array().len()` as long as every field upholds it.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DataEnum, DeriveInput, Fields, parse_macro_input};

pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (serialize_body, deserialize_body, size_body) = match &input.data {
        Data::Struct(data) => struct_bodies(&data.fields),
        Data::Enum(data) => enum_bodies(name, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Serializable derive does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics crate::types::serializable::Serializable for #name #ty_generics #where_clause {
            fn serialize<W: ::std::io::Write>(
                &self,
                writer: &mut crate::types::binary_writer::BinaryWriter<W>,
            ) -> ::std::result::Result<(), crate::types::errors::CodecError> {
                #serialize_body
                Ok(())
            }

            fn deserialize(
                reader: &mut crate::types::binary_reader::BinaryReader,
            ) -> ::std::result::Result<Self, crate::types::errors::CodecError> {
                #deserialize_body
            }

            fn size(&self) -> usize {
                #size_body
            }
        }
    })
}

/// Bodies for a struct: fields are reached through `self`.
fn struct_bodies(fields: &Fields) -> (TokenStream2, TokenStream2, TokenStream2) {
    match fields {
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().map(|f| &f.ident).collect();
            (
                quote! {
                    #( crate::types::serializable::Serializable::serialize(&self.#names, writer)?; )*
                },
                quote! {
                    Ok(Self {
                        #( #names: crate::types::serializable::Serializable::deserialize(reader)?, )*
                    })
                },
                quote! {
                    0usize #( + crate::types::serializable::Serializable::size(&self.#names) )*
                },
            )
        }
        Fields::Unnamed(unnamed) => {
            let indices: Vec<_> = (0..unnamed.unnamed.len()).map(syn::Index::from).collect();
            let reads = indices.iter().map(|_| {
                quote! { crate::types::serializable::Serializable::deserialize(reader)?, }
            });
            (
                quote! {
                    #( crate::types::serializable::Serializable::serialize(&self.#indices, writer)?; )*
                },
                quote! { Ok(Self( #(#reads)* )) },
                quote! {
                    0usize #( + crate::types::serializable::Serializable::size(&self.#indices) )*
                },
            )
        }
        Fields::Unit => (quote! {}, quote! { Ok(Self) }, quote! { 0usize }),
    }
}

/// Bodies for an enum: a `u8` discriminant followed by the variant's fields.
fn enum_bodies(
    name: &syn::Ident,
    data: &DataEnum,
) -> syn::Result<(TokenStream2, TokenStream2, TokenStream2)> {
    let discriminants = compute_discriminants(data)?;

    let mut serialize_arms = Vec::with_capacity(data.variants.len());
    let mut deserialize_arms = Vec::with_capacity(data.variants.len());
    let mut size_arms = Vec::with_capacity(data.variants.len());

    for (variant, tag) in data.variants.iter().zip(discriminants) {
        let variant_name = &variant.ident;
        match &variant.fields {
            Fields::Unit => {
                serialize_arms.push(quote! {
                    Self::#variant_name => {
                        crate::types::serializable::Serializable::serialize(&#tag, writer)?;
                    }
                });
                deserialize_arms.push(quote! { #tag => Ok(Self::#variant_name), });
                size_arms.push(quote! { Self::#variant_name => 1usize, });
            }
            Fields::Unnamed(fields) => {
                let bindings: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| format_ident!("f{}", i))
                    .collect();
                let reads = bindings.iter().map(|_| {
                    quote! { crate::types::serializable::Serializable::deserialize(reader)?, }
                });
                serialize_arms.push(quote! {
                    Self::#variant_name(#(#bindings),*) => {
                        crate::types::serializable::Serializable::serialize(&#tag, writer)?;
                        #( crate::types::serializable::Serializable::serialize(#bindings, writer)?; )*
                    }
                });
                deserialize_arms.push(quote! { #tag => Ok(Self::#variant_name(#(#reads)*)), });
                size_arms.push(quote! {
                    Self::#variant_name(#(#bindings),*) => {
                        1usize #( + crate::types::serializable::Serializable::size(#bindings) )*
                    }
                });
            }
            Fields::Named(fields) => {
                let bindings: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                serialize_arms.push(quote! {
                    Self::#variant_name { #(#bindings),* } => {
                        crate::types::serializable::Serializable::serialize(&#tag, writer)?;
                        #( crate::types::serializable::Serializable::serialize(#bindings, writer)?; )*
                    }
                });
                deserialize_arms.push(quote! {
                    #tag => Ok(Self::#variant_name {
                        #( #bindings: crate::types::serializable::Serializable::deserialize(reader)?, )*
                    }),
                });
                size_arms.push(quote! {
                    Self::#variant_name { #(#bindings),* } => {
                        1usize #( + crate::types::serializable::Serializable::size(#bindings) )*
                    }
                });
            }
        }
    }

    let type_name = name.to_string();
    Ok((
        quote! {
            match self {
                #(#serialize_arms)*
            }
        },
        quote! {
            let tag: u8 = crate::types::serializable::Serializable::deserialize(reader)?;
            match tag {
                #(#deserialize_arms)*
                other => Err(crate::types::errors::CodecError::InvalidValue(
                    format!("unknown {} discriminant {}", #type_name, other),
                )),
            }
        },
        quote! {
            match self {
                #(#size_arms)*
            }
        },
    ))
}

/// Assigns a `u8` tag to every variant.
///
/// Explicit discriminants (`Variant = 5`) are honoured; the others continue
/// from the previous tag, starting at 0.
fn compute_discriminants(data: &DataEnum) -> syn::Result<Vec<u8>> {
    let mut tags = Vec::with_capacity(data.variants.len());
    let mut next: u16 = 0;

    for variant in &data.variants {
        let tag = match &variant.discriminant {
            Some((_, expr)) => parse_discriminant(expr)?,
            None => u8::try_from(next).map_err(|_| {
                syn::Error::new_spanned(variant, "enum has more than 256 variants")
            })?,
        };
        tags.push(tag);
        next = u16::from(tag) + 1;
    }

    Ok(tags)
}

fn parse_discriminant(expr: &syn::Expr) -> syn::Result<u8> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: syn::Lit::Int(int),
        ..
    }) = expr
    {
        return int.base10_parse::<u8>();
    }
    Err(syn::Error::new_spanned(
        expr,
        "discriminant must be an integer literal that fits in a u8",
    ))
}
