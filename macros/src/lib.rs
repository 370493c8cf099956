//! Procedural macro front end for decorate
//!
//! | Macro | Purpose |
//! |-------|---------|
//! | `decorate!{}` | Expand the dispatcher, composites and adapters in place |
//!
//! ## Example
//!
//! ```ignore
//! decorate! {
//!     pub fn decorate_meter for api::Meter;
//!     api::Battery => soc: fn() -> Result<f64, api::Error>,
//!     api::MeterEnergy => total_energy: fn() -> f64,
//! }
//!
//! let meter = decorate_meter(base, Some(Box::new(|| Ok(0.8))), None);
//! assert!(meter.as_battery().is_some());
//! assert!(meter.as_meter_energy().is_none());
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod input;

/// Generate the dispatch function, the composite enum, one composite struct
/// per capability combination and one adapter per capability.
///
/// # Syntax
/// ```ignore
/// decorate! {
///     <vis> fn <function> for <BaseTrait>;
///     <Trait> => <method>: fn(<args>) -> <ret>,
///     ...
/// }
/// ```
///
/// Paths are resolved where the macro is invoked.
#[proc_macro]
pub fn decorate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as input::DecorateInput);
    let expanded = input.decorator().and_then(|decorator| {
        decorator
            .synthesize()
            .map_err(|e| syn::Error::new(proc_macro2::Span::call_site(), e))
    });

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
