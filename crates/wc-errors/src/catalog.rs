// SPDX-License-Identifier: MIT OR Apache-2.0
//! TOML catalogs of application error codes.
//!
//! A catalog lists the [`Coder`]s an application defines so they can be
//! validated and registered in one step at start-up:
//!
//! ```toml
//! [[coder]]
//! code = 1000
//! http_status = 500
//! message = "ConfigurationNotValid error"
//! reference = "https://example.com/errors#1000"
//! ```

use crate::coder::{self, Coder, RegistryError, UNKNOWN_CODE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading, validating or registering a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("catalog file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The content is not a valid TOML catalog.
    #[error("failed to parse catalog: {reason}")]
    ParseError {
        /// Parser detail.
        reason: String,
    },

    /// One or more entries are unusable.
    #[error("catalog validation failed: {reasons:?}")]
    ValidationError {
        /// Every problem found.
        reasons: Vec<String>,
    },

    /// An entry clashed with the live registry.
    #[error("catalog registration failed: {0}")]
    Registry(#[from] RegistryError),
}

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// One `[[coder]]` table.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct CoderEntry {
    /// Integer error code; `0` and `1` are reserved.
    pub code: i32,
    /// HTTP status the code maps to.
    #[serde(default = "default_http_status")]
    pub http_status: u16,
    /// Externally safe message.
    pub message: String,
    /// Documentation reference.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reference: String,
}

fn default_http_status() -> u16 {
    500
}

impl From<&CoderEntry> for Coder {
    fn from(entry: &CoderEntry) -> Self {
        Coder::new(entry.code, entry.http_status, entry.message.clone())
            .with_reference(entry.reference.clone())
    }
}

/// A set of coders declared in configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct CoderCatalog {
    /// Declared coders, in file order.
    #[serde(default, rename = "coder")]
    pub coders: Vec<CoderEntry>,
}

impl CoderCatalog {
    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        toml::from_str::<Self>(content).map_err(|e| CatalogError::ParseError {
            reason: e.to_string(),
        })
    }

    /// Read and parse a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|_| CatalogError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Check every entry, reporting all problems at once.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut reasons = Vec::new();
        let mut seen = BTreeSet::new();

        for entry in &self.coders {
            let code = entry.code;
            if code == 0 || code == UNKNOWN_CODE {
                reasons.push(format!("code {code} is reserved"));
            }
            if !seen.insert(code) {
                reasons.push(format!("code {code} is declared more than once"));
            }
            if entry.message.trim().is_empty() {
                reasons.push(format!("code {code}: message must not be empty"));
            }
            if !(100..=599).contains(&entry.http_status) {
                reasons.push(format!(
                    "code {code}: http_status {} out of range (100..=599)",
                    entry.http_status
                ));
            }
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::ValidationError { reasons })
        }
    }

    /// Validate, then register every entry.
    ///
    /// Returns the number of coders registered. A clash with an already
    /// registered code leaves the registry untouched.
    pub fn register_all(&self) -> Result<usize, CatalogError> {
        self.validate()?;
        coder::try_register_all(self.coders.iter().map(Coder::from).collect())?;
        tracing::info!(count = self.coders.len(), "registered error catalog");
        Ok(self.coders.len())
    }
}

/// JSON Schema describing the catalog format.
pub fn catalog_schema() -> schemars::Schema {
    schemars::schema_for!(CoderCatalog)
}
