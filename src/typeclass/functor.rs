//! Functor type class - mapping over the payload of a type constructor.
//!
//! `Functor` is the capability the direct path of [`Free`](crate::control::Free)
//! requires of an effect vocabulary: to attach a pending continuation to the
//! nested computation inside one effect step, the normalizer maps over it.
//! Vocabularies without a mapping operation go through
//! [`Coyoneda`](crate::control::Coyoneda) instead, which is a `Functor` for any
//! type constructor.
//!
//! The operation is an associated function of the *witness* (see
//! [`TypeConstructor`]), not a method, so that `F::fmap` maps
//! `F::WithType<X>` to `F::WithType<Y>` through the same witness `F`.
//!
//! # Laws
//!
//! ## Identity Law
//!
//! ```text
//! F::fmap(fa, |x| x) == fa
//! ```
//!
//! ## Composition Law
//!
//! ```text
//! F::fmap(F::fmap(fa, f), g) == F::fmap(fa, |x| g(f(x)))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use freestep::typeclass::Functor;
//!
//! let transformed = <Option<()>>::fmap(Some(5), |n: i32| n.to_string());
//! assert_eq!(transformed, Some("5".to_string()));
//! ```

use super::higher::TypeConstructor;
use super::identity::Identity;

/// A type constructor whose payload can be mapped.
///
/// The mapping function is `FnOnce`: an effect step carries at most one
/// payload of the mapped type. Continuations in this crate are consumed
/// exactly once, and the function handed to `fmap` by the normalizer owns one.
///
/// # Examples
///
/// A user-defined effect vocabulary:
///
/// ```rust
/// use freestep::typeclass::{Functor, TypeConstructor};
///
/// enum Console<Next> {
///     Print(String, Next),
///     Read(Box<dyn FnOnce(String) -> Next>),
/// }
///
/// impl<Next> TypeConstructor for Console<Next> {
///     type Inner = Next;
///     type WithType<B> = Console<B>;
/// }
///
/// impl<Next> Functor for Console<Next> {
///     fn fmap<X, Y, G>(fx: Console<X>, function: G) -> Console<Y>
///     where
///         G: FnOnce(X) -> Y + 'static,
///         X: 'static,
///         Y: 'static,
///     {
///         match fx {
///             Console::Print(line, next) => Console::Print(line, function(next)),
///             Console::Read(reply) => Console::Read(Box::new(move |line| function(reply(line)))),
///         }
///     }
/// }
/// ```
pub trait Functor: TypeConstructor {
    /// Applies `function` to the payload of `fx`.
    fn fmap<X, Y, G>(fx: Self::WithType<X>, function: G) -> Self::WithType<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static;
}

impl<A> Functor for Option<A> {
    #[inline]
    fn fmap<X, Y, G>(fx: Option<X>, function: G) -> Option<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        fx.map(function)
    }
}

impl<T, E> Functor for Result<T, E> {
    #[inline]
    fn fmap<X, Y, G>(fx: Result<X, E>, function: G) -> Result<Y, E>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        fx.map(function)
    }
}

impl<T> Functor for Box<T> {
    #[inline]
    fn fmap<X, Y, G>(fx: Box<X>, function: G) -> Box<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        Box::new(function(*fx))
    }
}

impl<A> Functor for Identity<A> {
    #[inline]
    fn fmap<X, Y, G>(fx: Identity<X>, function: G) -> Identity<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        Identity(function(fx.0))
    }
}
