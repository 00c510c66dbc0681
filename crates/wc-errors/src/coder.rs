// SPDX-License-Identifier: MIT OR Apache-2.0
//! Process-wide registry of integer error codes.
//!
//! Applications register their [`Coder`]s during start-up; afterwards the
//! registry is read-mostly and every lookup is total: codes that were never
//! registered resolve to the reserved [`unknown`] coder.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, PoisonError, RwLock};

/// Code of the reserved fallback coder.
pub const UNKNOWN_CODE: i32 = 1;

/// Message of the reserved fallback coder.
pub const UNKNOWN_MESSAGE: &str = "An internal server error occurred";

static REGISTRY: LazyLock<RwLock<HashMap<i32, Coder>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

// ---------------------------------------------------------------------------
// Coder
// ---------------------------------------------------------------------------

/// Metadata attached to an integer error code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coder {
    code: i32,
    http_status: u16,
    message: String,
    #[serde(default)]
    reference: String,
}

impl Coder {
    /// Describe `code` with the HTTP status and externally safe message it
    /// maps to.
    pub fn new(code: i32, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            http_status,
            message: message.into(),
            reference: String::new(),
        }
    }

    /// Attach a documentation reference for the code.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Integer code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// HTTP status the code maps to.
    pub fn http_status(&self) -> u16 {
        self.http_status
    }

    /// Externally safe message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Documentation reference, possibly empty.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for Coder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The reserved coder returned for unregistered codes.
pub fn unknown() -> Coder {
    Coder::new(UNKNOWN_CODE, 500, UNKNOWN_MESSAGE)
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Programmer errors detected while registering a [`Coder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The code already has a coder.
    #[error("error code {code} is already registered")]
    Duplicate {
        /// Offending code.
        code: i32,
    },

    /// `0` means "no code" and `1` is the unknown coder.
    #[error("error code {code} is reserved")]
    Reserved {
        /// Offending code.
        code: i32,
    },

    /// A coder must carry a message.
    #[error("error code {code} has an empty message")]
    EmptyMessage {
        /// Offending code.
        code: i32,
    },
}

/// Reject codes and messages no coder may use.
pub(crate) fn check(coder: &Coder) -> Result<(), RegistryError> {
    if coder.code == 0 || coder.code == UNKNOWN_CODE {
        return Err(RegistryError::Reserved { code: coder.code });
    }
    if coder.message.trim().is_empty() {
        return Err(RegistryError::EmptyMessage { code: coder.code });
    }
    Ok(())
}

/// Register `coder`, reporting problems as a value.
pub fn try_register(coder: Coder) -> Result<(), RegistryError> {
    check(&coder)?;
    let mut codes = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if codes.contains_key(&coder.code) {
        return Err(RegistryError::Duplicate { code: coder.code });
    }
    tracing::debug!(
        code = coder.code,
        http_status = coder.http_status,
        "registered error coder"
    );
    codes.insert(coder.code, coder);
    Ok(())
}

/// Register every coder in `coders`, or none of them.
///
/// All entries are checked against the registry under one write lock
/// before the first insert.
pub fn try_register_all(coders: Vec<Coder>) -> Result<(), RegistryError> {
    for coder in &coders {
        check(coder)?;
    }
    let mut codes = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    let mut batch = std::collections::HashSet::with_capacity(coders.len());
    for coder in &coders {
        if codes.contains_key(&coder.code) || !batch.insert(coder.code) {
            return Err(RegistryError::Duplicate { code: coder.code });
        }
    }
    for coder in coders {
        tracing::debug!(
            code = coder.code,
            http_status = coder.http_status,
            "registered error coder"
        );
        codes.insert(coder.code, coder);
    }
    Ok(())
}

/// Register `coder`.
///
/// # Panics
///
/// Panics on a duplicate, reserved or message-less code. Registration runs at
/// start-up, so these are treated as programmer errors.
pub fn register(coder: Coder) {
    if let Err(err) = try_register(coder) {
        panic!("{err}");
    }
}

/// The coder registered for `code`, or [`unknown`].
pub fn lookup(code: i32) -> Coder {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&code)
        .cloned()
        .unwrap_or_else(unknown)
}

/// Whether `code` has a registered coder.
pub fn is_registered(code: i32) -> bool {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&code)
}

/// Every registered code, ascending.
pub fn registered_codes() -> Vec<i32> {
    let mut codes: Vec<i32> = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .collect();
    codes.sort_unstable();
    codes
}
