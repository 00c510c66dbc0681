// SPDX-License-Identifier: MIT OR Apache-2.0
//! Formatted variants of the constructors.

/// [`new`](crate::new) with a formatted message.
///
/// ```
/// let err = wc_errors::newf!("port {} already in use", 8080);
/// assert_eq!(err.to_string(), "port 8080 already in use");
/// ```
#[macro_export]
macro_rules! newf {
    ($($arg:tt)+) => {
        $crate::new(::std::format!($($arg)+))
    };
}

/// [`with_message`](crate::with_message) with a formatted message.
#[macro_export]
macro_rules! with_messagef {
    ($cause:expr, $($arg:tt)+) => {
        $crate::with_message($cause, ::std::format!($($arg)+))
    };
}

/// [`wrap`](crate::wrap) with a formatted message.
///
/// ```
/// let io = std::io::Error::other("eof");
/// let err = wc_errors::wrapf!(io, "reading {}", "app.toml");
/// assert_eq!(err.to_string(), "reading app.toml");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($cause:expr, $($arg:tt)+) => {
        $crate::wrap($cause, ::std::format!($($arg)+))
    };
}

/// [`with_code`](crate::with_code) with a formatted message.
#[macro_export]
macro_rules! with_codef {
    ($code:expr, $($arg:tt)+) => {
        $crate::with_code($code, ::std::format!($($arg)+))
    };
}

/// [`wrapc`](crate::wrapc) with a formatted message.
#[macro_export]
macro_rules! wrapcf {
    ($cause:expr, $code:expr, $($arg:tt)+) => {
        $crate::wrapc($cause, $code, ::std::format!($($arg)+))
    };
}
