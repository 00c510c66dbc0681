// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wrapping on `Result`, where `Ok` stands for "no error".

use crate::coder::UNKNOWN_CODE;
use crate::error::{self, Cause, Error};
use crate::inspect;
use std::error::Error as StdError;

/// Wrap the error side of a `Result`, leaving `Ok` untouched.
///
/// This is how "wrapping no error is a no-op" reads in Rust: call sites can
/// annotate a result unconditionally.
///
/// ```
/// use wc_errors::ResultExt;
///
/// fn read() -> Result<u32, std::io::Error> {
///     Err(std::io::Error::other("read: end of input"))
/// }
///
/// let ok: Result<u32, std::io::Error> = Ok(7);
/// assert_eq!(ok.wrap("never seen").unwrap(), 7);
///
/// let err = read().wrap("could not read configuration file").unwrap_err();
/// assert_eq!(err.to_string(), "could not read configuration file");
/// assert!(err.stack().is_some());
/// ```
pub trait ResultExt<T> {
    /// [`error::wrap`] the error.
    fn wrap(self, message: impl Into<String>) -> Result<T, Error>;

    /// [`error::wrap`] with a lazily built message.
    fn wrap_with<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// [`error::wrapc`] the error.
    fn wrapc(self, code: i32, message: impl Into<String>) -> Result<T, Error>;

    /// [`error::with_message`] the error.
    fn with_message(self, message: impl Into<String>) -> Result<T, Error>;

    /// [`error::with_stack`] the error.
    fn with_stack(self) -> Result<T, Error>;

    /// [`inspect::code`] of the error, [`UNKNOWN_CODE`] for `Ok`.
    fn error_code(&self) -> i32;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[inline(never)]
    fn wrap(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(error::link(Cause::from_error(err), message.into(), None, 2)),
        }
    }

    #[inline(never)]
    fn wrap_with<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(error::link(
                Cause::from_error(err),
                message().into(),
                None,
                2,
            )),
        }
    }

    #[inline(never)]
    fn wrapc(self, code: i32, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(error::link(
                Cause::from_error(err),
                message.into(),
                Some(code),
                2,
            )),
        }
    }

    fn with_message(self, message: impl Into<String>) -> Result<T, Error> {
        self.map_err(|err| error::with_message(err, message))
    }

    #[inline(never)]
    fn with_stack(self) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(error::link(Cause::from_error(err), String::new(), None, 2)),
        }
    }

    fn error_code(&self) -> i32 {
        match self {
            Ok(_) => UNKNOWN_CODE,
            Err(err) => inspect::code(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{new, with_code};
    use std::io;

    fn failing() -> Result<(), io::Error> {
        Err(io::Error::other("read: end of input"))
    }

    fn fine() -> Result<u8, io::Error> {
        Ok(3)
    }

    #[test]
    fn ok_passes_through() {
        assert_eq!(fine().wrap("context").unwrap(), 3);
        assert_eq!(fine().wrapc(94_001, "context").unwrap(), 3);
        assert_eq!(fine().with_message("context").unwrap(), 3);
        assert_eq!(fine().with_stack().unwrap(), 3);
        assert_eq!(fine().wrap_with(|| -> String { unreachable!() }).unwrap(), 3);
    }

    #[test]
    fn ok_has_unknown_code() {
        assert_eq!(fine().error_code(), UNKNOWN_CODE);
    }

    #[test]
    fn err_is_wrapped() {
        let err = failing().wrap("could not read").unwrap_err();
        assert_eq!(err.to_string(), "could not read");
        assert!(err.stack().is_some());
        assert!(inspect::find::<io::Error>(&err).is_some());
    }

    #[test]
    fn wrap_with_builds_message_lazily() {
        let path = "app.toml";
        let err = failing().wrap_with(|| format!("reading {path}")).unwrap_err();
        assert_eq!(err.to_string(), "reading app.toml");
    }

    #[test]
    fn wrapc_sets_code() {
        let res = failing().wrapc(94_101, "decode");
        assert_eq!(res.error_code(), 94_101);
    }

    #[test]
    fn with_message_keeps_stackless() {
        let err = failing().with_message("ctx").unwrap_err();
        assert!(err.nearest_stack().is_none());
    }

    #[test]
    fn rewrapping_own_error_does_not_recapture() {
        let res: Result<(), Error> = Err(new("root"));
        let err = res.with_stack().unwrap_err();
        assert!(err.stack().is_none());
        assert!(err.nearest_stack().is_some());
    }

    #[test]
    fn error_code_of_err() {
        let res: Result<(), Error> = Err(with_code(94_201, "coded"));
        assert_eq!(res.error_code(), 94_201);
    }

    #[test]
    fn wrap_points_at_call_site() {
        let err = failing().wrap("here").unwrap_err();
        let top = err.stack().and_then(|s| s.top()).unwrap();
        assert!(
            top.function().contains("wrap_points_at_call_site"),
            "top frame was {}",
            top.function()
        );
    }
}
