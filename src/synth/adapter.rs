//! Adapter synthesis
//!
//! One forwarding type per capability:
//!
//! ```text
//! pub struct DecorateMeterBatteryImpl {
//!     battery: Box<dyn Fn() -> Result<f64, api::Error> + Send + Sync>,
//! }
//!
//! impl api::Battery for DecorateMeterBatteryImpl {
//!     fn soc(&self) -> Result<f64, api::Error> {
//!         (self.battery)()
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;

use super::Decorator;
use crate::capability::CapabilityDefinition;

pub(crate) fn synthesize(decorator: &Decorator) -> TokenStream {
    let adapters = decorator.table().iter().map(|def| adapter(decorator, def));
    quote! { #(#adapters)* }
}

fn adapter(decorator: &Decorator, def: &CapabilityDefinition) -> TokenStream {
    let vis = decorator.visibility();
    let name = decorator.adapter_name(def);
    let var = def.var_name();
    let accessor_ty = def.signature().accessor_type();
    let trait_path = def.path();
    let method = MethodShape::of(def);
    let decl = method.declaration();
    let args = &method.args;

    let doc = format!(
        " Implements `{}` by calling the stored `{}` accessor.",
        def.name(),
        def.accessor()
    );

    quote! {
        #[doc = #doc]
        #vis struct #name {
            #var: #accessor_ty,
        }

        impl #trait_path for #name {
            #decl {
                (self.#var)(#(#args),*)
            }
        }
    }
}

// =============================================================================
// Method shape shared with composites
// =============================================================================

/// The capability method as implemented by adapters and composites:
/// `fn name(&self, arg0: T0, ..) -> R`.
pub(crate) struct MethodShape<'a> {
    def: &'a CapabilityDefinition,
    pub args: Vec<Ident>,
}

impl<'a> MethodShape<'a> {
    pub fn of(def: &'a CapabilityDefinition) -> Self {
        let args = (0..def.signature().inputs.len())
            .map(|i| format_ident!("arg{}", i))
            .collect();
        MethodShape { def, args }
    }

    /// `fn name(&self, arg0: T0) -> R`, without a body.
    pub fn declaration(&self) -> TokenStream {
        let method = self.def.accessor();
        let output = &self.def.signature().output;
        let params = self
            .args
            .iter()
            .zip(&self.def.signature().inputs)
            .map(|(arg, ty)| quote! { #arg: #ty });
        quote! { fn #method(&self #(, #params)*) #output }
    }
}
