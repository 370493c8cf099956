//! Capability records
//!
//! Normalizes the caller-supplied capability list into structured records.
//! A record is written `Trait,method,signature`, for example
//!
//! ```text
//! api::Battery,soc,fn() -> Result<f64, api::Error>
//! ```
//!
//! The signature may itself contain commas, so only the first two commas
//! separate fields.

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{Ident, Path, ReturnType, Type, TypeBareFn};

use crate::error::{Error, Result};

/// Name of the dispatcher argument and composite field holding the base value.
pub const BASE_FIELD: &str = "base";

// =============================================================================
// Signature
// =============================================================================

/// Call signature of a capability accessor: argument types and return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub inputs: Vec<Type>,
    pub output: ReturnType,
}

impl Signature {
    /// Parse a bare function type such as `fn(u8) -> bool`.
    pub fn parse(text: &str) -> Result<Self> {
        let bare: TypeBareFn = syn::parse_str(text)
            .map_err(|e| Error::config(format!("invalid signature `{}`: {}", text, e)))?;
        Self::from_bare_fn(&bare)
    }

    pub fn from_bare_fn(bare: &TypeBareFn) -> Result<Self> {
        let unsupported = if bare.lifetimes.is_some() {
            Some("higher-ranked lifetimes")
        } else if bare.unsafety.is_some() {
            Some("`unsafe`")
        } else if bare.abi.is_some() {
            Some("`extern`")
        } else if bare.variadic.is_some() {
            Some("variadic arguments")
        } else {
            None
        };
        if let Some(what) = unsupported {
            return Err(Error::config(format!(
                "signature `{}` uses {}, accessors must be plain `fn(..) -> T` types",
                bare.to_token_stream(),
                what
            )));
        }

        Ok(Signature {
            inputs: bare.inputs.iter().map(|arg| arg.ty.clone()).collect(),
            output: bare.output.clone(),
        })
    }

    /// Boxed closure type stored by adapters and accepted by the dispatcher.
    pub fn accessor_type(&self) -> TokenStream {
        let inputs = &self.inputs;
        let output = &self.output;
        quote! { Box<dyn Fn(#(#inputs),*) #output + Send + Sync> }
    }

    /// Source form, `fn(..) -> T`, used for the input digest.
    pub fn to_source(&self) -> String {
        let inputs = &self.inputs;
        let output = &self.output;
        quote! { fn(#(#inputs),*) #output }.to_string()
    }
}

// =============================================================================
// CapabilityDefinition
// =============================================================================

/// One optional capability: a trait with a single accessor method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDefinition {
    name: String,
    path: Path,
    accessor: Ident,
    signature: Signature,
    short_name: Ident,
    var_name: Ident,
    probe_name: Ident,
}

impl CapabilityDefinition {
    /// Parse a `Trait,method,signature` record.
    pub fn parse_record(record: &str) -> Result<Self> {
        let fields: Vec<&str> = record.splitn(3, ',').map(str::trim).collect();
        if fields.len() != 3 || fields.iter().any(|f| f.is_empty()) {
            return Err(Error::config(format!(
                "malformed capability `{}`, expected `Trait,method,signature`",
                record
            )));
        }

        let path: Path = syn::parse_str(fields[0])
            .map_err(|e| Error::config(format!("invalid capability path `{}`: {}", fields[0], e)))?;
        let accessor = parse_ident(fields[1], "accessor method")?;
        let signature = Signature::parse(fields[2])?;

        Self::from_parts(path, accessor, signature)
    }

    /// Build a record from already-parsed syntax.
    pub fn from_parts(path: Path, accessor: Ident, signature: Signature) -> Result<Self> {
        let short_name = last_segment(&path)?;
        if short_name.to_string().starts_with("r#") {
            return Err(Error::config(format!(
                "capability `{}` cannot be used as a type name prefix",
                short_name
            )));
        }
        let var_text = to_snake_case(&short_name.to_string());
        let var_name = variable_ident(&var_text)?;
        let probe_name = parse_ident(&format!("as_{}", var_text), "probe name")?;
        if var_name == BASE_FIELD {
            return Err(Error::config(format!(
                "capability `{}` derives the reserved variable name `{}`",
                path_string(&path),
                BASE_FIELD
            )));
        }

        Ok(CapabilityDefinition {
            name: path_string(&path),
            path,
            accessor,
            signature,
            short_name,
            var_name,
            probe_name,
        })
    }

    /// Unique key: the trait path as written, without whitespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn accessor(&self) -> &Ident {
        &self.accessor
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Last path segment, `Battery` for `api::Battery`.
    pub fn short_name(&self) -> &Ident {
        &self.short_name
    }

    /// Snake-case local name, `meter_energy` for `api::MeterEnergy`.
    /// Keywords are raw (`r#type` for `api::Type`).
    pub fn var_name(&self) -> &Ident {
        &self.var_name
    }

    /// Enum accessor, `as_meter_energy`. Never raw.
    pub fn probe_name(&self) -> &Ident {
        &self.probe_name
    }

    /// Canonical record text, `Trait,method,signature`.
    pub fn to_record(&self) -> String {
        format!("{},{},{}", self.name, self.accessor, self.signature.to_source())
    }
}

// =============================================================================
// BaseType
// =============================================================================

/// The mandatory base contract every composite embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseType {
    name: String,
    path: Path,
    short_name: Ident,
}

impl BaseType {
    pub fn parse(text: &str) -> Result<Self> {
        let path: Path = syn::parse_str(text.trim())
            .map_err(|e| Error::config(format!("invalid base type `{}`: {}", text, e)))?;
        Self::from_path(path)
    }

    pub fn from_path(path: Path) -> Result<Self> {
        let short_name = last_segment(&path)?;
        Ok(BaseType {
            name: path_string(&path),
            path,
            short_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn short_name(&self) -> &Ident {
        &self.short_name
    }
}

// =============================================================================
// CapabilityTable
// =============================================================================

/// Ordered, duplicate-free list of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    defs: Vec<CapabilityDefinition>,
}

impl CapabilityTable {
    pub fn new(defs: Vec<CapabilityDefinition>) -> Result<Self> {
        for (i, def) in defs.iter().enumerate() {
            for earlier in &defs[..i] {
                if earlier.name == def.name {
                    return Err(Error::config(format!("duplicate capability `{}`", def.name)));
                }
                if earlier.var_name == def.var_name {
                    return Err(Error::config(format!(
                        "capabilities `{}` and `{}` both derive the variable name `{}`",
                        earlier.name, def.name, def.var_name
                    )));
                }
            }
        }
        Ok(CapabilityTable { defs })
    }

    /// Parse every `Trait,method,signature` record in order.
    pub fn parse_records<S: AsRef<str>>(records: &[S]) -> Result<Self> {
        let defs = records
            .iter()
            .map(|r| CapabilityDefinition::parse_record(r.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(defs)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapabilityDefinition> {
        self.defs.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CapabilityDefinition> {
        self.defs.get(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.defs.iter().map(|d| d.name()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.defs.iter().position(|d| d.name == name)
    }
}

impl<'a> IntoIterator for &'a CapabilityTable {
    type Item = &'a CapabilityDefinition;
    type IntoIter = std::slice::Iter<'a, CapabilityDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}

// =============================================================================
// Naming helpers
// =============================================================================

pub(crate) fn path_string(path: &Path) -> String {
    path.to_token_stream().to_string().replace(' ', "")
}

fn last_segment(path: &Path) -> Result<Ident> {
    path.segments
        .last()
        .map(|seg| seg.ident.clone())
        .ok_or_else(|| Error::config(format!("empty path `{}`", path_string(path))))
}

/// Parse an identifier, rejecting keywords.
pub(crate) fn parse_ident(text: &str, what: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(text)
        .map_err(|_| Error::config(format!("`{}` is not a valid {}", text, what)))
}

/// Words that are keywords in the 2024 edition but still parse as plain
/// identifiers.
const EDITION_KEYWORDS: &[&str] = &["gen"];

/// Identifier for a derived variable name. Keywords become raw identifiers;
/// `self`, `Self`, `super` and `crate` cannot be raw and get a trailing
/// underscore instead.
pub(crate) fn variable_ident(text: &str) -> Result<Ident> {
    if !EDITION_KEYWORDS.contains(&text) {
        if let Ok(ident) = syn::parse_str::<Ident>(text) {
            return Ok(ident);
        }
    }
    if matches!(text, "self" | "Self" | "super" | "crate") {
        return parse_ident(&format!("{}_", text), "variable name");
    }
    syn::parse_str::<Ident>(&format!("r#{}", text))
        .map_err(|_| Error::config(format!("`{}` is not a valid variable name", text)))
}

/// `MeterEnergy` -> `meter_energy`
pub(crate) fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    result
}

/// `decorate_meter` -> `DecorateMeter`
pub(crate) fn to_upper_camel_case(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
