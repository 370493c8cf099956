//! Dispatch synthesis
//!
//! The dispatcher matches on the tuple of every accessor. Each arm is a full
//! tuple pattern, `Some(var)` for members of its combination and `None` for
//! everything else, so an arm fires only when the presence set equals its
//! combination exactly:
//!
//! ```text
//! match (battery, meter_energy) {
//!     (None, None) => DecorateMeter::Base(base),
//!     (Some(battery), None) => DecorateMeter::Battery(..),
//!     (None, Some(meter_energy)) => DecorateMeter::MeterEnergy(..),
//!     (Some(battery), Some(meter_energy)) => DecorateMeter::BatteryMeterEnergy(..),
//! }
//! ```
//!
//! The same guards are kept as data in [`DispatchPlan`] so the partition can
//! be checked without compiling the output.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;

use super::{Decorator, composite};
use crate::error::{Error, Result};
use crate::powerset::{Combination, PresencePattern};

// =============================================================================
// Plan
// =============================================================================

/// Required state of one accessor in a branch guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    Absent,
}

/// One dispatcher arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    combination: Option<Combination>,
    guard: Vec<Presence>,
}

impl Branch {
    /// `None` for the zero branch returning the bare base value.
    pub fn combination(&self) -> Option<&Combination> {
        self.combination.as_ref()
    }

    pub fn guard(&self) -> &[Presence] {
        &self.guard
    }

    /// True iff the pattern's presence set equals this branch's combination.
    pub fn matches(&self, pattern: &PresencePattern) -> bool {
        pattern.len() == self.guard.len()
            && self
                .guard
                .iter()
                .enumerate()
                .all(|(i, presence)| match presence {
                    Presence::Present => pattern.is_present(i),
                    Presence::Absent => !pattern.is_present(i),
                })
    }
}

/// Every dispatcher arm in emission order: the zero branch, then one branch
/// per combination in enumerator order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    capabilities: usize,
    branches: Vec<Branch>,
}

impl DispatchPlan {
    pub fn new(capabilities: usize, combinations: &[Combination]) -> Self {
        let zero = Branch {
            combination: None,
            guard: vec![Presence::Absent; capabilities],
        };
        let branches = std::iter::once(zero)
            .chain(combinations.iter().map(|combo| Branch {
                combination: Some(combo.clone()),
                guard: (0..capabilities)
                    .map(|i| {
                        if combo.contains(i) {
                            Presence::Present
                        } else {
                            Presence::Absent
                        }
                    })
                    .collect(),
            }))
            .collect();

        DispatchPlan {
            capabilities,
            branches,
        }
    }

    pub fn capabilities(&self) -> usize {
        self.capabilities
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// The branch taken for `pattern`.
    pub fn resolve(&self, pattern: &PresencePattern) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.matches(pattern))
    }

    /// Number of branches whose guard holds for `pattern`; always 1.
    pub fn matching(&self, pattern: &PresencePattern) -> usize {
        self.branches
            .iter()
            .filter(|branch| branch.matches(pattern))
            .count()
    }

    /// Guards are full assignments over every capability, so `2^n` distinct
    /// guards partition the `2^n` presence patterns.
    pub(crate) fn verify(&self) -> Result<()> {
        let expected = 1usize << self.capabilities;
        if self.branches.len() != expected {
            return Err(Error::synthesis(format!(
                "dispatcher has {} branches for {} capabilities, expected {}",
                self.branches.len(),
                self.capabilities,
                expected
            )));
        }

        let mut seen = HashSet::with_capacity(expected);
        for branch in &self.branches {
            if branch.guard.len() != self.capabilities {
                return Err(Error::synthesis("dispatcher guard does not cover every capability"));
            }
            if !seen.insert(branch.guard.as_slice()) {
                return Err(Error::synthesis("two dispatcher branches share a guard"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Emission
// =============================================================================

pub(crate) fn synthesize(decorator: &Decorator, plan: &DispatchPlan) -> TokenStream {
    let vis = decorator.visibility();
    let function = decorator.function();
    let prefix = decorator.prefix();
    let base_path = decorator.base().path();
    let generic = decorator.generic();
    let table = decorator.table();

    let mut params = vec![quote! { base: #generic }];
    params.extend(table.iter().map(|def| {
        let var = def.var_name();
        let accessor_ty = def.signature().accessor_type();
        quote! { #var: Option<#accessor_ty> }
    }));

    let body = if table.is_empty() {
        quote! { #prefix::Base(base) }
    } else {
        let scrutinee = tuple(table.iter().map(|def| {
            let var = def.var_name();
            quote! { #var }
        }));
        let arms = plan.branches().iter().map(|branch| {
            let pattern = tuple(branch.guard().iter().zip(table.iter()).map(
                |(presence, def)| {
                    let var = def.var_name();
                    match presence {
                        Presence::Present => quote! { Some(#var) },
                        Presence::Absent => quote! { None },
                    }
                },
            ));
            let value = match branch.combination() {
                None => quote! { #prefix::Base(base) },
                Some(combo) => composite::construct(decorator, combo),
            };
            quote! { #pattern => #value, }
        });

        quote! {
            match #scrutinee {
                #(#arms)*
            }
        }
    };

    let doc = format!(
        " Wraps a `{}` with exactly the capabilities whose accessor is `Some`.",
        decorator.base().name()
    );

    quote! {
        #[doc = #doc]
        #[allow(clippy::too_many_arguments, clippy::type_complexity)]
        #vis fn #function<#generic: #base_path>(#(#params),*) -> #prefix<#generic> {
            #body
        }
    }
}

/// `(a, b)`, or `(a,)` for a single element.
fn tuple(items: impl Iterator<Item = TokenStream>) -> TokenStream {
    let items: Vec<TokenStream> = items.collect();
    if items.len() == 1 {
        let item = &items[0];
        quote! { (#item,) }
    } else {
        quote! { (#(#items),*) }
    }
}
