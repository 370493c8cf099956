//! Composite synthesis
//!
//! One struct per combination embedding the base value plus one adapter per
//! member, and the enum tagging which combination a dispatched value holds.
//! A composite implements exactly the capability traits of its combination;
//! the enum probes (`as_battery()`, ...) are the only way to reach a
//! capability without naming the concrete composite.

use proc_macro2::TokenStream;
use quote::quote;

use super::Decorator;
use super::adapter::MethodShape;
use crate::powerset::Combination;

pub(crate) fn synthesize(decorator: &Decorator) -> TokenStream {
    let tagged = composite_enum(decorator);
    let structs = decorator
        .combinations()
        .iter()
        .map(|combo| composite_struct(decorator, combo));

    quote! {
        #tagged
        #(#structs)*
    }
}

/// Expression building the composite for `combo` from in-scope `base` and
/// unwrapped accessor bindings named after each member's variable name.
pub(crate) fn construct(decorator: &Decorator, combo: &Combination) -> TokenStream {
    let prefix = decorator.prefix();
    let variant = decorator.variant_name(combo);
    let composite = decorator.composite_name(combo);
    let fields = decorator.members(combo).map(|def| {
        let var = def.var_name();
        let adapter = decorator.adapter_name(def);
        quote! { #var: #adapter { #var } }
    });

    quote! {
        #prefix::#variant(#composite {
            base,
            #(#fields,)*
        })
    }
}

// =============================================================================
// Tagged enum
// =============================================================================

fn composite_enum(decorator: &Decorator) -> TokenStream {
    let vis = decorator.visibility();
    let prefix = decorator.prefix();
    let generic = decorator.generic();
    let combos = decorator.combinations();

    let variants: Vec<_> = combos.iter().map(|c| decorator.variant_name(c)).collect();
    let composites: Vec<_> = combos.iter().map(|c| decorator.composite_name(c)).collect();

    let probes = decorator.table().iter().enumerate().map(|(index, def)| {
        let probe = def.probe_name();
        let trait_path = def.path();
        let holders = combos
            .iter()
            .filter(|combo| combo.contains(index))
            .map(|combo| decorator.variant_name(combo));
        let doc = format!(" The `{}` capability, if this value carries it.", def.name());

        quote! {
            #[doc = #doc]
            #vis fn #probe(&self) -> Option<&dyn #trait_path> {
                match self {
                    #(Self::#holders(composite) => Some(composite as &dyn #trait_path),)*
                    _ => None,
                }
            }
        }
    });

    let doc = format!(
        " A `{}` value together with exactly the capabilities present at dispatch.",
        decorator.base().name()
    );
    let base_doc = format!(
        " The `{}` value is reached through `base`, `into_base`, `Deref` or `AsRef`; \
         the enum and its composites do not implement `{}` themselves.",
        decorator.base().name(),
        decorator.base().name()
    );

    quote! {
        #[doc = #doc]
        #[doc = ""]
        #[doc = #base_doc]
        #vis enum #prefix<#generic> {
            Base(#generic),
            #(#variants(#composites<#generic>),)*
        }

        impl<#generic> #prefix<#generic> {
            /// The embedded base value.
            #vis fn base(&self) -> &#generic {
                match self {
                    Self::Base(base) => base,
                    #(Self::#variants(composite) => &composite.base,)*
                }
            }

            /// Drop every capability and return the base value.
            #vis fn into_base(self) -> #generic {
                match self {
                    Self::Base(base) => base,
                    #(Self::#variants(composite) => composite.base,)*
                }
            }

            #(#probes)*
        }

        impl<#generic> core::ops::Deref for #prefix<#generic> {
            type Target = #generic;

            fn deref(&self) -> &#generic {
                self.base()
            }
        }

        impl<#generic> core::convert::AsRef<#generic> for #prefix<#generic> {
            fn as_ref(&self) -> &#generic {
                self.base()
            }
        }
    }
}

// =============================================================================
// Composite structs
// =============================================================================

fn composite_struct(decorator: &Decorator, combo: &Combination) -> TokenStream {
    let vis = decorator.visibility();
    let name = decorator.composite_name(combo);
    let generic = decorator.generic();

    let fields = decorator.members(combo).map(|def| {
        let var = def.var_name();
        let adapter = decorator.adapter_name(def);
        quote! { #var: #adapter, }
    });

    let impls = decorator.members(combo).map(|def| {
        let var = def.var_name();
        let adapter = decorator.adapter_name(def);
        let trait_path = def.path();
        let method = MethodShape::of(def);
        let decl = method.declaration();
        let accessor = def.accessor();
        let args = &method.args;

        quote! {
            impl<#generic> #trait_path for #name<#generic> {
                #decl {
                    <#adapter as #trait_path>::#accessor(&self.#var #(, #args)*)
                }
            }
        }
    });

    let doc = format!(
        " `{}` plus `{}`.",
        decorator.base().name(),
        combo.names(decorator.table()).join("`, `")
    );

    quote! {
        #[doc = #doc]
        #vis struct #name<#generic> {
            base: #generic,
            #(#fields)*
        }

        impl<#generic> #name<#generic> {
            /// Drop the capabilities and return the base value.
            #vis fn into_base(self) -> #generic {
                self.base
            }
        }

        impl<#generic> core::ops::Deref for #name<#generic> {
            type Target = #generic;

            fn deref(&self) -> &#generic {
                &self.base
            }
        }

        impl<#generic> core::convert::AsRef<#generic> for #name<#generic> {
            fn as_ref(&self) -> &#generic {
                &self.base
            }
        }

        #(#impls)*
    }
}
