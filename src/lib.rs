// SPDX-License-Identifier: MIT OR Apache-2.0
//! Umbrella crate re-exporting the workspace libraries.
//!
//! ```
//! use wecoding_common::errors::{inspect, ResultExt};
//! use wecoding_common::field::{FieldError, Path};
//!
//! let res: Result<(), FieldError> = Err(FieldError::required(&Path::new("name"), ""));
//! let err = res.wrap("validating request").unwrap_err();
//! assert!(inspect::find::<FieldError>(&err).is_some());
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use wc_errors as errors;
pub use wc_field as field;
