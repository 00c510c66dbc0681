// SPDX-License-Identifier: MIT OR Apache-2.0
//! Short, verbose, detail and JSON renderings of an error chain.
//!
//! All renderings are deterministic for a given chain; only frame
//! resolution depends on the symbols available at run time.

use crate::coder::{self, UNKNOWN_CODE};
use crate::error::Error;
use crate::inspect;
use crate::stack::StackTrace;
use serde::{Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt;

/// How to render an error chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// The outermost non-empty message.
    #[default]
    Short,
    /// Every link's message followed by its frames, one item per line.
    Verbose,
    /// One `text - #k [location] (code) external` segment per link.
    Detail,
    /// A JSON array with one object per link.
    Json,
}

/// A `Display` adapter pairing an error with a [`Format`].
pub struct Formatted<'a> {
    err: &'a (dyn StdError + 'static),
    format: Format,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Format::Short => write!(f, "{}", self.err),
            Format::Verbose => write_verbose(f, self.err),
            Format::Detail => write_detail(f, self.err),
            Format::Json => {
                let json = serde_json::to_string(&JsonChain(self.err)).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Pair `err` with `format` for use in `format!` and friends.
pub fn display<'a>(err: &'a (dyn StdError + 'static), format: Format) -> Formatted<'a> {
    Formatted { err, format }
}

/// Render `err` to a string.
pub fn render(err: &(dyn StdError + 'static), format: Format) -> String {
    display(err, format).to_string()
}

// ---------------------------------------------------------------------------
// Per-link facts
// ---------------------------------------------------------------------------

struct Link<'a> {
    /// Short form, with fallback through empty messages.
    text: String,
    /// The link's own message, possibly empty.
    own: String,
    code: Option<i32>,
    stack: Option<&'a StackTrace>,
}

impl<'a> Link<'a> {
    fn of(link: &'a (dyn StdError + 'static)) -> Self {
        match link.downcast_ref::<Error>() {
            Some(err) => Self {
                text: err.to_string(),
                own: err.message().to_owned(),
                code: err.code(),
                stack: err.stack(),
            },
            None => {
                let text = link.to_string();
                Self {
                    own: text.clone(),
                    text,
                    code: None,
                    stack: None,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Verbose / detail
// ---------------------------------------------------------------------------

pub(crate) fn write_verbose(
    f: &mut fmt::Formatter<'_>,
    err: &(dyn StdError + 'static),
) -> fmt::Result {
    let mut first = true;
    let mut line = |f: &mut fmt::Formatter<'_>, item: &dyn fmt::Display| {
        if !std::mem::take(&mut first) {
            f.write_str("\n")?;
        }
        write!(f, "{item:#}")
    };
    for link in inspect::chain(err) {
        let link = Link::of(link);
        if !link.own.is_empty() {
            line(f, &link.own)?;
        }
        for frame in link.stack.map(StackTrace::frames).unwrap_or_default() {
            line(f, frame)?;
        }
    }
    Ok(())
}

fn write_detail(f: &mut fmt::Formatter<'_>, err: &(dyn StdError + 'static)) -> fmt::Result {
    let depth = inspect::chain(err).count();
    for (i, link) in inspect::chain(err).enumerate() {
        if i > 0 {
            f.write_str("; ")?;
        }
        let link = Link::of(link);
        let k = depth - 1 - i;
        let code = link.code.unwrap_or(UNKNOWN_CODE);
        let external = match link.code {
            Some(c) => coder::lookup(c).message().to_owned(),
            None => link.text.clone(),
        };
        match link.stack.and_then(StackTrace::top).map(|frame| frame.info()) {
            Some(at) => write!(
                f,
                "{} - #{k} [{}:{} ({})] ({code}) {external}",
                link.text, at.file, at.line, at.function
            )?,
            None => write!(f, "{} - #{k} ({code}) {external}", link.text)?,
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonLink<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a StackTrace>,
}

struct JsonChain<'a>(&'a (dyn StdError + 'static));

impl Serialize for JsonChain<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(inspect::chain(self.0).map(|link| {
            let link = Link::of(link);
            JsonLink {
                message: link.text,
                code: link.code,
                stack: link.stack,
            }
        }))
    }
}

/// Serializes as the JSON chain list, outermost link first.
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonChain(self).serialize(serializer)
    }
}

/// The chain of `err` as a JSON array.
pub fn to_json(err: &(dyn StdError + 'static)) -> serde_json::Value {
    serde_json::to_value(JsonChain(err)).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Emit one `error` event describing `err` and its whole chain.
pub fn log_error(err: &(dyn StdError + 'static)) {
    let chain = serde_json::to_string(&JsonChain(err)).unwrap_or_default();
    tracing::error!(
        code = inspect::code(err),
        error = %err,
        chain = %chain,
        "error reported"
    );
}
