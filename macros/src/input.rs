//! `decorate!` input parser
//!
//! ```text
//! pub fn decorate_meter for api::Meter;
//! api::Battery => soc: fn() -> Result<f64, api::Error>,
//! api::MeterEnergy => total_energy: fn() -> f64,
//! ```

use ::decorate::{BaseType, CapabilityDefinition, CapabilityTable, Decorator, Signature};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Ident, Path, Token, TypeBareFn, Visibility,
};

/// Single capability: `Trait => method: fn(..) -> R`
pub struct CapabilityInput {
    pub path: Path,
    pub accessor: Ident,
    pub signature: TypeBareFn,
}

impl Parse for CapabilityInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path: Path = input.parse()?;
        let _arrow: Token![=>] = input.parse()?;
        let accessor: Ident = input.parse()?;
        let _colon: Token![:] = input.parse()?;
        let signature: TypeBareFn = input.parse()?;
        Ok(CapabilityInput {
            path,
            accessor,
            signature,
        })
    }
}

impl CapabilityInput {
    fn definition(&self) -> syn::Result<CapabilityDefinition> {
        let signature = Signature::from_bare_fn(&self.signature)
            .map_err(|e| syn::Error::new(self.signature.span(), e))?;
        CapabilityDefinition::from_parts(self.path.clone(), self.accessor.clone(), signature)
            .map_err(|e| syn::Error::new(self.path.span(), e))
    }
}

/// Header plus capability list.
pub struct DecorateInput {
    pub vis: Visibility,
    pub function: Ident,
    pub base: Path,
    pub capabilities: Punctuated<CapabilityInput, Token![,]>,
}

impl Parse for DecorateInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let vis: Visibility = input.parse()?;
        let _fn: Token![fn] = input.parse()?;
        let function: Ident = input.parse()?;
        let _for: Token![for] = input.parse()?;
        let base: Path = input.parse()?;
        let _semi: Token![;] = input.parse()?;
        let capabilities = Punctuated::parse_terminated(input)?;
        Ok(DecorateInput {
            vis,
            function,
            base,
            capabilities,
        })
    }
}

impl DecorateInput {
    /// Check duplicates and derived names, then build the decorator.
    pub fn decorator(self) -> syn::Result<Decorator> {
        check_duplicates(&self.capabilities)?;

        let defs = self
            .capabilities
            .iter()
            .map(CapabilityInput::definition)
            .collect::<syn::Result<Vec<_>>>()?;
        let table = CapabilityTable::new(defs).map_err(|e| syn::Error::new(self.base.span(), e))?;
        let base =
            BaseType::from_path(self.base.clone()).map_err(|e| syn::Error::new(self.base.span(), e))?;

        let span = self.function.span();
        Decorator::from_ident(base, self.function, table)
            .map(|d| d.with_visibility(self.vis))
            .map_err(|e| syn::Error::new(span, e))
    }
}

/// Point at the second occurrence of a repeated capability.
fn check_duplicates(capabilities: &Punctuated<CapabilityInput, Token![,]>) -> syn::Result<()> {
    use quote::ToTokens;
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    for cap in capabilities {
        let name = cap.path.to_token_stream().to_string().replace(' ', "");
        if !seen.insert(name.clone()) {
            return Err(syn::Error::new_spanned(
                &cap.path,
                format!("duplicate capability `{}`", name),
            ));
        }
    }
    Ok(())
}
