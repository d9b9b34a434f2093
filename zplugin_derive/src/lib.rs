//! `#[derive(Params)]`: builds a plugin's `&'static [ParamDecl]` and its sorted id-hash lookup
//! table from a struct whose fields each carry a `#[param(...)]` declaration (spec §3a).

extern crate proc_macro;

mod params;

use proc_macro::TokenStream;

#[proc_macro_derive(Params, attributes(param))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    params::derive_params(input)
}
