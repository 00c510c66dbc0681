// SPDX-License-Identifier: MIT OR Apache-2.0
//! The chain-capable [`Error`] value and its constructors.

use crate::coder::{self, Coder};
use crate::format::{self, Format, Formatted};
use crate::inspect::{self, Chain};
use crate::stack::StackTrace;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// An immutable error carrying a message, an optional code, an optional
/// captured stack and an optional cause.
///
/// Cloning is cheap and clones compare equal: equality is identity of the
/// shared allocation, so a cause found deep in a chain is `==` the value
/// that was wrapped.
///
/// ```
/// use wc_errors::{inspect, new, with_message, with_stack};
///
/// let err = new("root cause");
/// let w1 = with_message(err.clone(), "step one");
/// let w2 = with_stack(w1.clone());
///
/// assert_eq!(w2.to_string(), "step one");
/// assert!(inspect::is(&w2, &err));
/// assert!(w2.stack().is_none());
/// ```
#[derive(Clone)]
pub struct Error {
    inner: Arc<Inner>,
}

struct Inner {
    message: String,
    code: Option<i32>,
    stack: Option<StackTrace>,
    cause: Option<Cause>,
}

#[derive(Clone)]
pub(crate) enum Cause {
    Chain(Error),
    Foreign(Arc<dyn StdError + Send + Sync>),
}

impl Cause {
    /// Link an [`Error`] directly; box anything else.
    pub(crate) fn from_error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
        match boxed.downcast::<Error>() {
            Ok(own) => Self::Chain(*own),
            Err(foreign) => Self::Foreign(Arc::from(foreign)),
        }
    }

    fn as_dyn(&self) -> &(dyn StdError + 'static) {
        match self {
            Self::Chain(err) => err,
            Self::Foreign(err) => &**err,
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(err) => fmt::Debug::fmt(err, f),
            Self::Foreign(err) => fmt::Debug::fmt(err, f),
        }
    }
}

impl Error {
    fn build(
        message: String,
        code: Option<i32>,
        stack: Option<StackTrace>,
        cause: Option<Cause>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                message,
                code: code.filter(|&c| c != 0),
                stack,
                cause,
            }),
        }
    }

    /// This link's own message; empty for pure stack wrappers.
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// The code attached to this link, if any.
    pub fn code(&self) -> Option<i32> {
        self.inner.code
    }

    /// The stack captured by this link, if any.
    pub fn stack(&self) -> Option<&StackTrace> {
        self.inner.stack.as_ref()
    }

    /// The direct cause.
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.cause.as_ref().map(Cause::as_dyn)
    }

    /// Every link, starting with `self`.
    pub fn chain(&self) -> Chain<'_> {
        inspect::chain(self)
    }

    /// The innermost link.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        inspect::root_cause(self)
    }

    /// The stack of the outermost link that captured one.
    pub fn nearest_stack(&self) -> Option<&StackTrace> {
        self.chain()
            .filter_map(|link| link.downcast_ref::<Error>())
            .find_map(Error::stack)
    }

    /// The outermost code in the chain, or [`coder::UNKNOWN_CODE`].
    pub fn nearest_code(&self) -> i32 {
        inspect::code(self)
    }

    /// The registered coder for [`Error::nearest_code`].
    pub fn coder(&self) -> Coder {
        coder::lookup(self.nearest_code())
    }

    /// Render with an explicit [`Format`].
    pub fn display(&self, format: Format) -> Formatted<'_> {
        format::display(self, format)
    }

    /// The chain as a JSON array, one object per link.
    pub fn to_json(&self) -> serde_json::Value {
        format::to_json(self)
    }

    fn has_stack_in_chain(err: &(dyn StdError + 'static)) -> bool {
        inspect::chain(err).any(|link| {
            link.downcast_ref::<Error>()
                .is_some_and(|e| e.inner.stack.is_some())
        })
    }
}

/// `{}` is the short form; `{:#}` is the verbose form with stacks.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return format::write_verbose(f, self);
        }
        match &self.inner.cause {
            Some(cause) if self.inner.message.is_empty() => write!(f, "{}", cause.as_dyn()),
            _ => f.write_str(&self.inner.message),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Error");
        d.field("message", &self.inner.message);
        if let Some(code) = self.inner.code {
            d.field("code", &code);
        }
        if let Some(stack) = &self.inner.stack {
            d.field("stack", stack);
        }
        if let Some(cause) = &self.inner.cause {
            d.field("cause", cause);
        }
        d.finish()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Error {}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause()
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// A new chain root with a stack captured at the caller.
#[inline(never)]
pub fn new(message: impl Into<String>) -> Error {
    Error::build(message.into(), None, Some(StackTrace::capture(1)), None)
}

/// A new chain root carrying `code`, with a stack captured at the caller.
#[inline(never)]
pub fn with_code(code: i32, message: impl Into<String>) -> Error {
    Error::build(message.into(), Some(code), Some(StackTrace::capture(1)), None)
}

/// Annotate `cause` with `message` without touching stacks.
pub fn with_message<E>(cause: E, message: impl Into<String>) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    Error::build(message.into(), None, None, Some(Cause::from_error(cause)))
}

/// Make sure the chain carries a stack, capturing one here if it does not.
#[inline(never)]
pub fn with_stack<E>(cause: E) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    link(Cause::from_error(cause), String::new(), None, 2)
}

/// Annotate `cause` with `message`, capturing a stack here if the chain has
/// none.
#[inline(never)]
pub fn wrap<E>(cause: E, message: impl Into<String>) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    link(Cause::from_error(cause), message.into(), None, 2)
}

/// Like [`wrap`], also attaching `code`. The new code shadows any code
/// further down the chain for [`inspect::code`].
#[inline(never)]
pub fn wrapc<E>(cause: E, code: i32, message: impl Into<String>) -> Error
where
    E: StdError + Send + Sync + 'static,
{
    link(Cause::from_error(cause), message.into(), Some(code), 2)
}

/// Shared tail of the wrapping constructors. `skip` counts the frames
/// between this function and the user's call site, this one included.
#[inline(never)]
pub(crate) fn link(cause: Cause, message: String, code: Option<i32>, skip: usize) -> Error {
    let stack = if Error::has_stack_in_chain(cause.as_dyn()) {
        None
    } else {
        Some(StackTrace::capture(skip))
    };
    Error::build(message, code, stack, Some(cause))
}
