//! Synthesis of the generated items
//!
//! [`Decorator`] owns everything derived from one input list: the capability
//! table, its combinations and the generated names. The three synthesizers
//! read from it:
//!
//! | Module | Emits |
//! |--------|-------|
//! | `dispatch` | the dispatch function, one arm per presence pattern |
//! | `composite` | the tagged enum and one struct per combination |
//! | `adapter` | one forwarding struct per capability |

mod adapter;
mod composite;
mod dispatch;

pub use dispatch::{Branch, DispatchPlan, Presence};

use std::collections::{HashMap, HashSet};

use proc_macro2::{TokenStream, TokenTree};
use quote::{ToTokens, format_ident, quote};
use syn::{Ident, Visibility};

use crate::capability::{
    BaseType, CapabilityDefinition, CapabilityTable, parse_ident, to_upper_camel_case,
};
use crate::error::{Error, Result};
use crate::powerset::{self, Combination};

/// Name of the enum variant holding an undecorated base value.
const BASE_VARIANT: &str = "Base";

/// Preferred name of the generic parameter standing for the base value.
const GENERIC: &str = "B";

#[derive(Debug, Clone)]
pub struct Decorator {
    base: BaseType,
    function: Ident,
    prefix: Ident,
    vis: Visibility,
    table: CapabilityTable,
    combinations: Vec<Combination>,
    /// Enum variant per combination, indexed by `mask - 1`.
    variants: Vec<Ident>,
    generic: Ident,
}

impl Decorator {
    /// Prepare generation of `function` for `base` over `table`.
    ///
    /// Generated items are `pub`; see [`Decorator::with_visibility`].
    pub fn new(base: BaseType, function: &str, table: CapabilityTable) -> Result<Self> {
        let function = parse_ident(function, "function name")?;
        Self::from_ident(base, function, table)
    }

    pub fn from_ident(base: BaseType, function: Ident, table: CapabilityTable) -> Result<Self> {
        let prefix = parse_ident(&to_upper_camel_case(&function.to_string()), "type prefix")?;
        let combinations = powerset::combinations(&table)?;
        let variants = variant_names(&table, &combinations)?;

        let mut decorator = Decorator {
            base,
            function,
            prefix,
            vis: syn::parse_quote!(pub),
            table,
            combinations,
            variants,
            generic: format_ident!("{}", GENERIC),
        };
        decorator.generic = decorator.pick_generic()?;
        decorator.check_names()?;
        Ok(decorator)
    }

    /// Visibility applied to the dispatch function and every generated type.
    pub fn with_visibility(mut self, vis: Visibility) -> Self {
        self.vis = vis;
        self
    }

    pub fn base(&self) -> &BaseType {
        &self.base
    }

    pub fn function(&self) -> &Ident {
        &self.function
    }

    /// Type-name prefix, the function name in UpperCamelCase. Also the name
    /// of the tagged enum.
    pub fn prefix(&self) -> &Ident {
        &self.prefix
    }

    pub fn visibility(&self) -> &Visibility {
        &self.vis
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Generic parameter of the dispatcher, the enum and every composite.
    /// `B` unless the input already uses that name.
    pub fn generic(&self) -> &Ident {
        &self.generic
    }

    /// Members of `combo` in input order.
    pub fn members<'a>(
        &'a self,
        combo: &'a Combination,
    ) -> impl Iterator<Item = &'a CapabilityDefinition> + 'a {
        combo.members().iter().filter_map(|&i| self.table.get(i))
    }

    /// Enum variant for `combo`: member short names concatenated, followed
    /// by the combination's mask when that name is ambiguous.
    pub fn variant_name(&self, combo: &Combination) -> Ident {
        let index = combo.mask().checked_sub(1).and_then(|i| usize::try_from(i).ok());
        match index.and_then(|i| self.variants.get(i)) {
            Some(variant) => variant.clone(),
            None => format_ident!("{}", readable_name(&self.table, combo)),
        }
    }

    /// `{Prefix}{Variant}`
    pub fn composite_name(&self, combo: &Combination) -> Ident {
        format_ident!("{}{}", self.prefix, self.variant_name(combo))
    }

    /// `{Prefix}{Short}Impl`
    pub fn adapter_name(&self, def: &CapabilityDefinition) -> Ident {
        format_ident!("{}{}Impl", self.prefix, def.short_name())
    }

    pub fn plan(&self) -> DispatchPlan {
        DispatchPlan::new(self.table.len(), &self.combinations)
    }

    /// The dispatch function, the tagged enum, every composite and every
    /// adapter, in that order.
    pub fn synthesize(&self) -> Result<TokenStream> {
        let plan = self.plan();
        plan.verify()?;

        let dispatch = dispatch::synthesize(self, &plan);
        let composites = composite::synthesize(self);
        let adapters = adapter::synthesize(self);

        tracing::debug!(
            function = %self.function,
            branches = plan.branches().len(),
            composites = self.combinations.len(),
            adapters = self.table.len(),
            "synthesized decorator"
        );

        Ok(quote! {
            #dispatch
            #composites
            #adapters
        })
    }

    /// First of `B`, `B0`, `B1`, .. not named anywhere in the input or the
    /// generated type names.
    fn pick_generic(&self) -> Result<Ident> {
        let mut used = HashSet::new();
        collect_idents(self.base.path().to_token_stream(), &mut used);
        for def in &self.table {
            collect_idents(def.path().to_token_stream(), &mut used);
            let signature = def.signature();
            for input in &signature.inputs {
                collect_idents(input.to_token_stream(), &mut used);
            }
            collect_idents(signature.output.to_token_stream(), &mut used);
            used.insert(self.adapter_name(def).to_string());
        }
        used.insert(self.prefix.to_string());
        for combo in &self.combinations {
            used.insert(self.composite_name(combo).to_string());
        }

        let name = std::iter::once(GENERIC.to_string())
            .chain((0..).map(|i| format!("{}{}", GENERIC, i)))
            .find(|name| !used.contains(name))
            .ok_or_else(|| Error::synthesis("no free name for the generic parameter"))?;
        parse_ident(&name, "generic parameter")
    }

    /// Generated type names and enum variants are unique. Holds for every
    /// accepted input; a failure is a fault in name derivation.
    fn check_names(&self) -> Result<()> {
        let mut types = HashSet::new();
        let mut claim = |name: String| {
            if types.insert(name.clone()) {
                Ok(())
            } else {
                Err(Error::synthesis(format!("generated type name `{}` is not unique", name)))
            }
        };

        claim(self.prefix.to_string())?;
        for def in &self.table {
            claim(self.adapter_name(def).to_string())?;
        }
        for combo in &self.combinations {
            claim(self.composite_name(combo).to_string())?;
        }

        let mut variants = HashSet::new();
        variants.insert(BASE_VARIANT.to_string());
        for combo in &self.combinations {
            let variant = self.variant_name(combo).to_string();
            if !variants.insert(variant.clone()) {
                return Err(Error::synthesis(format!("enum variant `{}` is not unique", variant)));
            }
        }
        Ok(())
    }
}

/// Member short names run together, `BatteryRange` for `{Battery, Range}`.
fn readable_name(table: &CapabilityTable, combo: &Combination) -> String {
    combo
        .members()
        .iter()
        .filter_map(|&i| table.get(i))
        .map(|def| def.short_name().to_string())
        .collect()
}

/// Variant names for `combinations`, in order. A readable name shared by
/// several combinations, or clashing with `Base` or an adapter (`{Short}Impl`),
/// gets the combination's mask appended until it is unique:
/// `{Battery, Range}` and `{BatteryRange}` become `BatteryRange3` and
/// `BatteryRange4`.
fn variant_names(table: &CapabilityTable, combinations: &[Combination]) -> Result<Vec<Ident>> {
    let readable: Vec<String> = combinations
        .iter()
        .map(|combo| readable_name(table, combo))
        .collect();

    let mut reserved: HashSet<String> = table
        .iter()
        .map(|def| format!("{}Impl", def.short_name()))
        .collect();
    reserved.insert(BASE_VARIANT.to_string());

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &readable {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    let ambiguous =
        |name: &str| counts.get(name).is_some_and(|&n| n > 1) || reserved.contains(name);

    let mut taken: HashSet<String> = readable
        .iter()
        .filter(|name| !ambiguous(name))
        .cloned()
        .collect();

    let mut variants = Vec::with_capacity(combinations.len());
    for (combo, name) in combinations.iter().zip(&readable) {
        if !ambiguous(name) {
            variants.push(parse_ident(name, "variant name")?);
            continue;
        }
        let suffix = combo.mask().to_string();
        let mut candidate = format!("{}{}", name, suffix);
        while taken.contains(&candidate)
            || reserved.contains(&candidate)
            || counts.contains_key(candidate.as_str())
        {
            candidate.push_str(&suffix);
        }
        tracing::debug!(readable = %name, variant = %candidate, "disambiguated variant name");
        variants.push(parse_ident(&candidate, "variant name")?);
        taken.insert(candidate);
    }
    Ok(variants)
}

/// Every identifier in `tokens`, at any depth.
fn collect_idents(tokens: TokenStream, out: &mut HashSet<String>) {
    for tree in tokens {
        match tree {
            TokenTree::Ident(ident) => {
                out.insert(ident.to_string());
            }
            TokenTree::Group(group) => collect_idents(group.stream(), out),
            _ => {}
        }
    }
}
