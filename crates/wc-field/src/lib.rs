// SPDX-License-Identifier: MIT OR Apache-2.0
//! Field paths and structured field validation errors.
//!
//! Validation code reports every problem it finds as a [`FieldError`]
//! anchored at a [`Path`], collects them in an [`ErrorList`] and hands the
//! caller a single [`Aggregate`] error.
//!
//! ```
//! use wc_field::{ErrorList, FieldError, Path};
//!
//! let containers = Path::new("spec").child("containers");
//! let mut errs = ErrorList::new();
//! errs.push(FieldError::invalid(&containers.index(0).child("port"), 70000, "must be below 65536"));
//! errs.push(FieldError::required(&containers.index(1).child("image"), ""));
//!
//! let agg = errs.to_aggregate().unwrap();
//! assert_eq!(
//!     agg.to_string(),
//!     "[spec.containers[0].port: Invalid value: 70000: must be below 65536, \
//!      spec.containers[1].image: Required value]"
//! );
//! ```
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod errors;
mod name;
mod path;

pub use errors::{Aggregate, ErrorList, ErrorType, ErrorTypeMatcher, FieldError, Matcher};
pub use name::{is_dns1123_subdomain, is_qualified_name};
pub use path::Path;
