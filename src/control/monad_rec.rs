//! Tail-recursive monads - the capability a host computation must provide.
//!
//! [`Free::run_in_host`](super::Free::run_in_host) lets the step interpreter
//! perform host-level effects: it returns `M::WithType<Free<..>>` instead of a
//! bare computation. To drive an unbounded number of steps without growing the
//! call stack, the host must be able to iterate a state machine natively.
//! That is `MonadRec`: given a step function returning `Left(next_state)` or
//! `Right(result)` inside the host, `tail_rec_m` iterates in constant stack.
//!
//! # Laws
//!
//! ```text
//! M::tail_rec_m(s, |s| M::pure(Either::Right(f(s)))) == M::pure(f(s))
//! M::tail_rec_m(s, step) == step(s) >>= either(|s| M::tail_rec_m(s, step), M::pure)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::{Either, MonadRec};
//!
//! // Sum 1..=100_000 with early failure on overflow, in constant stack.
//! let total = <Option<()>>::tail_rec_m((1u64, 0u64), |(n, sum)| {
//!     let sum = sum.checked_add(n)?;
//!     Some(if n == 100_000 { Either::Right(sum) } else { Either::Left((n + 1, sum)) })
//! });
//! assert_eq!(total, Some(5_000_050_000));
//! ```

use super::either::Either;
use crate::typeclass::{Functor, Identity};

/// A host computation type supporting value injection and stack-safe iteration.
pub trait MonadRec: Functor {
    /// Lifts a plain value into the host.
    fn pure<B: 'static>(value: B) -> Self::WithType<B>;

    /// Iterates `step` from `initial` until it yields `Right`.
    ///
    /// Implementations must loop rather than recurse, and must stop at the
    /// first host-level failure (`None`, `Err`) without calling `step` again.
    fn tail_rec_m<S, B, Step>(initial: S, step: Step) -> Self::WithType<B>
    where
        S: 'static,
        B: 'static,
        Step: FnMut(S) -> Self::WithType<Either<S, B>>;
}

impl<A> MonadRec for Identity<A> {
    #[inline]
    fn pure<B: 'static>(value: B) -> Identity<B> {
        Identity(value)
    }

    fn tail_rec_m<S, B, Step>(initial: S, mut step: Step) -> Identity<B>
    where
        S: 'static,
        B: 'static,
        Step: FnMut(S) -> Identity<Either<S, B>>,
    {
        let mut state = initial;
        loop {
            match step(state).into_inner() {
                Either::Left(next) => state = next,
                Either::Right(result) => return Identity(result),
            }
        }
    }
}

impl<A> MonadRec for Option<A> {
    #[inline]
    fn pure<B: 'static>(value: B) -> Option<B> {
        Some(value)
    }

    fn tail_rec_m<S, B, Step>(initial: S, mut step: Step) -> Option<B>
    where
        S: 'static,
        B: 'static,
        Step: FnMut(S) -> Option<Either<S, B>>,
    {
        let mut state = initial;
        loop {
            match step(state)? {
                Either::Left(next) => state = next,
                Either::Right(result) => return Some(result),
            }
        }
    }
}

impl<T, E> MonadRec for Result<T, E> {
    #[inline]
    fn pure<B: 'static>(value: B) -> Result<B, E> {
        Ok(value)
    }

    fn tail_rec_m<S, B, Step>(initial: S, mut step: Step) -> Result<B, E>
    where
        S: 'static,
        B: 'static,
        Step: FnMut(S) -> Result<Either<S, B>, E>,
    {
        let mut state = initial;
        loop {
            match step(state)? {
                Either::Left(next) => state = next,
                Either::Right(result) => return Ok(result),
            }
        }
    }
}
