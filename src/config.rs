//! Generation-time configuration
//!
//! The boundary between a front end and the engine. The CLI fills a
//! [`Config`] from flags; library callers build one directly.

use std::path::PathBuf;

use syn::Path;

use crate::capability::{BaseType, CapabilityTable};
use crate::emit::Destination;
use crate::error::{Error, Result};
use crate::synth::Decorator;

/// Module imported by generated files when none is given.
pub const DEFAULT_API: &str = "crate::api";

/// Dispatch function name when none is given.
pub const DEFAULT_FUNCTION: &str = "decorate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target module name, recorded in the generated-file marker.
    pub package: String,
    /// Module defining the capability contracts, imported with `use`.
    pub api: String,
    pub function: String,
    /// Base trait path, e.g. `api::Meter`.
    pub base: String,
    /// `Trait,method,signature` records in input order.
    pub types: Vec<String>,
    /// Output file; stdout when `None`.
    pub out: Option<PathBuf>,
    /// Compare against `out` instead of writing it.
    pub check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            package: String::new(),
            api: DEFAULT_API.to_string(),
            function: DEFAULT_FUNCTION.to_string(),
            base: String::new(),
            types: Vec::new(),
            out: None,
            check: false,
        }
    }
}

impl Config {
    /// Reject missing inputs before any synthesis runs.
    pub fn validate(&self) -> Result<()> {
        if self.base.trim().is_empty() {
            return Err(Error::config("missing base type"));
        }
        if self.package.trim().is_empty() {
            return Err(Error::config("missing package name"));
        }
        if self.types.is_empty() {
            return Err(Error::config("missing capability types"));
        }
        if self.check && self.out.is_none() {
            return Err(Error::config("check mode needs an output file"));
        }
        self.api_path()?;
        Ok(())
    }

    pub fn api_path(&self) -> Result<Path> {
        syn::parse_str(self.api.trim())
            .map_err(|e| Error::config(format!("invalid api module `{}`: {}", self.api, e)))
    }

    pub fn table(&self) -> Result<CapabilityTable> {
        CapabilityTable::parse_records(&self.types)
    }

    pub fn decorator(&self) -> Result<Decorator> {
        let base = BaseType::parse(&self.base)?;
        Decorator::new(base, self.function.trim(), self.table()?)
    }

    pub fn destination(&self) -> Destination {
        match &self.out {
            Some(path) => Destination::file(path),
            None => Destination::Stdout,
        }
    }
}
