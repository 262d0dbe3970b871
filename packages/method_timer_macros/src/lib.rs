#![allow(
    missing_docs,
    reason = "Private API, public API is documented in `method_timer` package"
)]

use proc_macro::TokenStream;

#[proc_macro_attribute]
pub fn __macro_timed(attr: TokenStream, item: TokenStream) -> TokenStream {
    method_timer_macros_impl::timed::entrypoint(&attr.into(), &item.into()).into()
}

#[proc_macro_derive(Timed, attributes(timer))]
pub fn __macro_derive_timed(input: TokenStream) -> TokenStream {
    method_timer_macros_impl::derive_timed::entrypoint(&input.into()).into()
}
