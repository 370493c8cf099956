//! # decorate
//!
//! Capability decorators generated ahead of time.
//!
//! A base value may or may not carry a number of optional capabilities, each
//! a trait with one accessor method. For every non-empty combination of
//! capabilities the generator emits a composite type implementing exactly
//! those traits, and a dispatcher that picks the composite whose combination
//! equals the set of accessors present at the call.
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Input                                                            |
//! |  - Config (CLI flags) / decorate! (proc macro)                    |
//! |  - CapabilityTable: Trait,method,signature records                |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Engine                                                           |
//! |  - powerset: 2^n - 1 combinations, binary counting order          |
//! |  - synth: dispatcher + composite enum/structs + adapters          |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Output                                                           |
//! |  - emit: layout, marker + digest, stdout or file, check mode      |
//! |  - macro: token stream expanded in place                          |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Example
//!
//! ```
//! use decorate::{Config, generate};
//!
//! let config = Config {
//!     package: "meters".into(),
//!     function: "decorate_meter".into(),
//!     base: "api::Meter".into(),
//!     types: vec![
//!         "api::Battery,soc,fn() -> Result<f64, api::Error>".into(),
//!         "api::BatteryRange,range,fn() -> i64".into(),
//!     ],
//!     ..Config::default()
//! };
//!
//! let text = generate(&config).unwrap();
//! assert!(text.contains("pub fn decorate_meter<B: api::Meter>"));
//! assert!(text.contains("pub struct DecorateMeterBatteryBatteryRange<B>"));
//! ```

pub mod capability;
pub mod config;
pub mod emit;
pub mod error;
pub mod powerset;
pub mod synth;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use capability::{BaseType, CapabilityDefinition, CapabilityTable, Signature};
pub use config::Config;
pub use emit::{Destination, emit};
pub use error::{Error, Result};
pub use powerset::{Combination, PresencePattern};
pub use synth::{Branch, Decorator, DispatchPlan, Presence};

/// Generate the complete file text for `config`.
#[tracing::instrument(skip_all, fields(package = %config.package, function = %config.function))]
pub fn generate(config: &Config) -> Result<String> {
    config.validate()?;
    let decorator = config.decorator()?;
    emit::render(config, &decorator)
}

/// Generate, then write to the configured destination, or compare against
/// it in check mode.
pub fn run(config: &Config) -> Result<()> {
    let text = generate(config)?;
    let destination = config.destination();
    match (config.check, destination.path()) {
        (true, Some(path)) => emit::check(&text, path),
        (true, None) => Err(Error::Configuration(
            "check mode needs an output file".to_string(),
        )),
        (false, _) => emit(&text, &destination),
    }
}
