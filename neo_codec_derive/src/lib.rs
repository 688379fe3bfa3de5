//! Derive macros for the neo_codec crate.
//!
//! Provides:
//! - `#[derive(Serializable)]` - wire serialization in field declaration order
//! - `#[derive(Error)]` - `Display` + `std::error::Error` for error enums

mod error;
mod serializable;

use proc_macro::TokenStream;

/// Implements `Serializable` (`serialize`, `deserialize`, `size`) from the fields of a type.
#[proc_macro_derive(Serializable)]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    serializable::derive_serializable(input)
}

/// Implements `Display` and `Error` from `#[error("...")]` attributes.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
