#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![allow(
    missing_docs,
    reason = "Private API, public API is documented in `method_timer` package"
)]

pub mod derive_timed;
pub mod timed;

mod syn_helpers;
