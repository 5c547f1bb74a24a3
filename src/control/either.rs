//! The outcome of one normalization or loop step.
//!
//! `Either` is used in two places, with the same reading of its variants:
//!
//! - [`Free::resume`](super::Free::resume) returns `Left(step)` while an
//!   effect step is pending and `Right(value)` once the program has finished.
//! - [`MonadRec::tail_rec_m`](super::MonadRec::tail_rec_m) step functions
//!   return `Left(state)` to go round again and `Right(result)` to stop.
//!
//! `Left` always means "not done yet".
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::{Either, Free};
//!
//! let program = Free::<Option<()>, i32>::lift_f(Some(1)).map(|n| n + 1);
//!
//! let pending = program.resume();
//! assert!(pending.is_left());
//!
//! let rest = pending.left().flatten().map(Free::resume);
//! assert_eq!(rest.and_then(Either::right), Some(2));
//! ```

use std::fmt;

/// `Left` for work still to do, `Right` for a final result.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    /// A pending step, or a state to loop on.
    Left(L),
    /// A final result.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` for `Left`.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` for `Right`.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// The pending side, if any.
    #[inline]
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(pending) => Some(pending),
            Self::Right(_) => None,
        }
    }

    /// The finished side, if any.
    #[inline]
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(done) => Some(done),
        }
    }

    /// Maps the pending side, leaving a final result alone.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::{Either, Free};
    ///
    /// let program = Free::<Option<()>, &str>::lift_f(Some("step"));
    /// let described = program.resume().map_left(|step| step.is_some());
    /// assert_eq!(described.left(), Some(true));
    /// ```
    #[inline]
    pub fn map_left<T, F>(self, function: F) -> Either<T, R>
    where
        F: FnOnce(L) -> T,
    {
        match self {
            Self::Left(pending) => Either::Left(function(pending)),
            Self::Right(done) => Either::Right(done),
        }
    }

    /// Maps the final result, leaving a pending side alone.
    #[inline]
    pub fn map_right<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Self::Left(pending) => Either::Left(pending),
            Self::Right(done) => Either::Right(function(done)),
        }
    }

    /// Collapses both sides into one value.
    #[inline]
    pub fn fold<T, F, G>(self, on_pending: F, on_done: G) -> T
    where
        F: FnOnce(L) -> T,
        G: FnOnce(R) -> T,
    {
        match self {
            Self::Left(pending) => on_pending(pending),
            Self::Right(done) => on_done(done),
        }
    }
}

impl<L: fmt::Debug, R: fmt::Debug> fmt::Debug for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(pending) => formatter.debug_tuple("Left").field(pending).finish(),
            Self::Right(done) => formatter.debug_tuple("Right").field(done).finish(),
        }
    }
}

impl<L, R> From<Either<L, R>> for Result<R, L> {
    /// `Right` is `Ok`; a `Left` that was never resolved is `Err`.
    #[inline]
    fn from(either: Either<L, R>) -> Self {
        either.fold(Err, Ok)
    }
}
