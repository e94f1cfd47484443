extern crate proc_macro;

mod shape;

use proc_macro::TokenStream;

#[proc_macro_derive(WireShape, attributes(wire))]
pub fn derive_wire_shape(input: TokenStream) -> TokenStream {
    crate::shape::derive_shape(input)
}
