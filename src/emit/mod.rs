//! Source emission
//!
//! Turns the synthesized items into the text of a generated file:
//!
//! ```text
//! // Code generated by decorate; DO NOT EDIT.
//! // Module: meters
//! // Input digest: 3f1c0a9be27d4410
//!
//! use crate::api;
//!
//! pub fn decorate_meter<B: api::Meter>(..) -> DecorateMeter<B> { .. }
//! ..
//! ```
//!
//! and writes it to stdout or a file.

mod layout;

pub use layout::layout;

use std::io::Write;
use std::path::{Path, PathBuf};

use quote::quote;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::synth::Decorator;

/// First line of every generated file.
pub const MARKER: &str = "// Code generated by decorate; DO NOT EDIT.";

/// Hex characters of the input digest kept in the header.
const DIGEST_LEN: usize = 16;

/// Where generated text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// A file destination; `.rs` is appended unless the name already ends
    /// in it.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.extension().is_some_and(|ext| ext == "rs") {
            return Destination::File(path);
        }
        let mut name = path.into_os_string();
        name.push(".rs");
        Destination::File(PathBuf::from(name))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Destination::Stdout => None,
            Destination::File(path) => Some(path),
        }
    }
}

/// BLAKE3 over the canonical input: module, api, function, base and every
/// normalized record, one per line.
pub fn digest(config: &Config, decorator: &Decorator) -> String {
    let mut hasher = blake3::Hasher::new();
    let mut line = |text: &str| {
        hasher.update(text.as_bytes());
        hasher.update(b"\n");
    };
    line(config.package.trim());
    line(config.api.trim());
    line(&decorator.function().to_string());
    line(decorator.base().name());
    for def in decorator.table() {
        line(&def.to_record());
    }
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..DIGEST_LEN].to_string()
}

/// Complete file text: header, import and laid-out items, terminated by one
/// line break.
pub fn render(config: &Config, decorator: &Decorator) -> Result<String> {
    let api = config.api_path()?;
    let items = decorator.synthesize()?;
    let file = quote! {
        use #api;
        #items
    };

    syn::parse2::<syn::File>(file.clone())
        .map_err(|e| Error::synthesis(format!("generated items do not parse: {}", e)))?;

    let text = format!(
        "{}\n// Module: {}\n// Input digest: {}\n\n{}",
        MARKER,
        config.package.trim(),
        digest(config, decorator),
        layout(file)
    );

    let mut text = text.trim().to_string();
    text.push('\n');
    Ok(text)
}

/// Write `text` to `destination`.
pub fn emit(text: &str, destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| Error::Emission {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
        }
        Destination::File(path) => {
            std::fs::write(path, text).map_err(|source| Error::Emission {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote generated source");
        }
    }
    Ok(())
}

/// Compare `text` with the file at `path` without writing.
pub fn check(text: &str, path: &Path) -> Result<()> {
    let current = match std::fs::read_to_string(path) {
        Ok(current) => current,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::Stale {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Error::Emission {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if current == text {
        tracing::info!(path = %path.display(), "generated source is up to date");
        Ok(())
    } else {
        Err(Error::Stale {
            path: path.to_path_buf(),
        })
    }
}
