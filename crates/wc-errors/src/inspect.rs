// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chain inspection: unwrap, is, as and code lookups.
//!
//! Every function walks [`std::error::Error::source`], so chains that mix
//! [`Error`] links with foreign errors are traversed transparently.

use crate::coder::{self, Coder, UNKNOWN_CODE};
use crate::error::Error;
use std::error::Error as StdError;

/// Iterator over an error and its causes, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walk `err` and its causes.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// The direct cause of `err`, `None` at the chain root.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// The innermost link of the chain.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current
}

/// Whether any link is of type `T` and equal to `target`.
///
/// [`Error`] compares by identity, foreign errors by their own `PartialEq`.
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    chain(err).any(|link| link.downcast_ref::<T>().is_some_and(|link| link == target))
}

/// The first link whose concrete type is `T`.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(err).find_map(|link| link.downcast_ref::<T>())
}

/// Copy the first link of type `T` into `target`.
///
/// Returns `false` and leaves `target` untouched when no link matches.
pub fn as_target<T>(err: &(dyn StdError + 'static), target: &mut T) -> bool
where
    T: StdError + Clone + 'static,
{
    match find::<T>(err) {
        Some(found) => {
            *target = found.clone();
            true
        }
        None => false,
    }
}

/// The outermost code in the chain, or [`UNKNOWN_CODE`] when no link
/// carries one.
pub fn code(err: &(dyn StdError + 'static)) -> i32 {
    chain(err)
        .filter_map(|link| link.downcast_ref::<Error>())
        .find_map(Error::code)
        .unwrap_or(UNKNOWN_CODE)
}

/// Whether any link carries `code`.
pub fn is_code(err: &(dyn StdError + 'static), code: i32) -> bool {
    chain(err)
        .filter_map(|link| link.downcast_ref::<Error>())
        .any(|link| link.code() == Some(code))
}

/// The registered coder for [`code`].
pub fn parse_coder(err: &(dyn StdError + 'static)) -> Coder {
    coder::lookup(code(err))
}
