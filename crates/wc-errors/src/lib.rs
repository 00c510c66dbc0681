// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors with stack traces, integer codes and cause chains.
//!
//! An [`Error`] pairs a message with an optional cause, an optional code
//! resolved through the process-wide [`coder`] registry, and a
//! [`StackTrace`] captured where the chain first needed provenance.
//! Wrapping an error that already carries a stack never captures another
//! one, so the trace always points at the original fault site.
//!
//! ```
//! use wc_errors::{coder, inspect, Coder, Format, ResultExt};
//!
//! const ERR_EOF: i32 = 1002;
//! coder::register(Coder::new(ERR_EOF, 500, "End of input"));
//!
//! fn read_config() -> Result<String, wc_errors::Error> {
//!     let raw: Result<String, std::io::Error> = Err(std::io::Error::other("read: end of input"));
//!     raw.wrapc(ERR_EOF, "could not read configuration file")
//! }
//!
//! let err = read_config().unwrap_err();
//! assert_eq!(err.to_string(), "could not read configuration file");
//! assert_eq!(inspect::code(&err), ERR_EOF);
//! assert_eq!(err.coder().message(), "End of input");
//!
//! let json = err.display(Format::Json).to_string();
//! assert!(json.starts_with(r#"[{"message":"could not read configuration file","code":1002"#));
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod coder;
mod error;
mod ext;
pub mod format;
pub mod inspect;
#[macro_use]
mod macros;
pub mod stack;

pub use catalog::{CatalogError, CoderCatalog, CoderEntry};
pub use coder::{Coder, RegistryError, UNKNOWN_CODE};
pub use error::{Error, new, with_code, with_message, with_stack, wrap, wrapc};
pub use ext::ResultExt;
pub use format::{Format, Formatted, log_error};
pub use stack::{Frame, FrameInfo, StackTrace};

/// Convenience result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
