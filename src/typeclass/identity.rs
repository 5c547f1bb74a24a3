//! The identity functor: a host computation with no effect of its own.
//!
//! [`Free::run`](crate::control::Free::run) is
//! [`Free::run_in_host`](crate::control::Free::run_in_host) at `Identity<()>`:
//! the interpreter answers every step directly and the loop never stops
//! early.

use super::TypeConstructor;

/// Wraps a value and adds nothing.
///
/// # Examples
///
/// ```rust
/// use freestep::control::Free;
/// use freestep::typeclass::Identity;
///
/// let program = Free::<Option<()>, i32>::lift_f(Some(21)).map(|n| n * 2);
/// let Identity(value) = program.run_in_host::<Identity<()>, _>(|step| {
///     Identity(step.unwrap_or(Free::pure(0)))
/// });
/// assert_eq!(value, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identity<A>(pub A);

impl<A> Identity<A> {
    /// Unwraps the value.
    #[inline]
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> TypeConstructor for Identity<A> {
    type Inner = A;
    type WithType<B> = Identity<B>;
}
