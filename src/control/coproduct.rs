//! Closed sums of effect vocabularies and widening into them.
//!
//! A program written against one small vocabulary can be embedded into a
//! larger one. `Coproduct<F, G, X>` is a step drawn from either `F` or `G`;
//! nesting `Coproduct`s in the right position builds sums of any size:
//!
//! ```text
//! Coproduct<Console<()>, Coproduct<State<()>, Log<()>, ()>, ()>
//! ```
//!
//! [`Inject`] proves that a vocabulary is one branch of a sum. Its index
//! parameter ([`Here`], [`There`], [`Itself`]) is a type-level position that
//! the compiler infers, so user code writes `program.widen()` and never names
//! an index.
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::{Coproduct, Free};
//!
//! let left: Free<Option<()>, i32> = Free::lift_f(Some(1));
//! let right: Free<Box<()>, i32> = Free::lift_f(Box::new(41));
//!
//! type Both = Coproduct<Option<()>, Box<()>, ()>;
//!
//! let program = left
//!     .widen::<Both, _>()
//!     .map2(right.widen::<Both, _>(), |a, b| a + b);
//!
//! let result = program.run(|step| match step {
//!     Coproduct::Left(option) => option.unwrap_or(Free::pure(0)),
//!     Coproduct::Right(boxed) => *boxed,
//! });
//! assert_eq!(result, 42);
//! ```

use std::marker::PhantomData;

use super::free::Free;
use crate::typeclass::{Functor, TypeConstructor};

/// A step of either vocabulary `F` or vocabulary `G`, carrying an `X`.
pub enum Coproduct<F: TypeConstructor, G: TypeConstructor, X> {
    /// A step of the first vocabulary.
    Left(F::WithType<X>),
    /// A step of the second vocabulary.
    Right(G::WithType<X>),
}

impl<F: TypeConstructor, G: TypeConstructor, X> Coproduct<F, G, X> {
    /// Returns `true` if this is a step of the first vocabulary.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a step of the second vocabulary.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }
}

impl<F: TypeConstructor, G: TypeConstructor, X> TypeConstructor for Coproduct<F, G, X> {
    type Inner = X;
    type WithType<B> = Coproduct<F, G, B>;
}

impl<F, G, X> Functor for Coproduct<F, G, X>
where
    F: Functor,
    G: Functor,
{
    fn fmap<A, B, H>(fx: Coproduct<F, G, A>, function: H) -> Coproduct<F, G, B>
    where
        H: FnOnce(A) -> B + 'static,
        A: 'static,
        B: 'static,
    {
        match fx {
            Coproduct::Left(step) => Coproduct::Left(F::fmap(step, function)),
            Coproduct::Right(step) => Coproduct::Right(G::fmap(step, function)),
        }
    }
}

/// Position of a vocabulary as the left branch of a `Coproduct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Here;

/// Position of a vocabulary inside the right branch of a `Coproduct`, at
/// position `I` there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct There<I>(PhantomData<I>);

/// Position of a vocabulary that is the whole sum, such as the last branch
/// of a nested `Coproduct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Itself;

/// Evidence that `F` is a branch of `Self` at position `Index`.
///
/// # Laws
///
/// `project` inverts `inject`, and gives back any other branch untouched:
///
/// ```text
/// Self::project(Self::inject(fx)) == Ok(fx)
/// ```
pub trait Inject<F: TypeConstructor, Index>: TypeConstructor {
    /// Embeds a step of `F` into `Self`.
    fn inject<X>(step: F::WithType<X>) -> Self::WithType<X>;

    /// Recovers a step of `F`, or returns the wider step unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err(step)` when `step` belongs to another branch.
    fn project<X>(step: Self::WithType<X>) -> Result<F::WithType<X>, Self::WithType<X>>;
}

impl<F: TypeConstructor> Inject<F, Itself> for F {
    #[inline]
    fn inject<X>(step: F::WithType<X>) -> F::WithType<X> {
        step
    }

    #[inline]
    fn project<X>(step: F::WithType<X>) -> Result<F::WithType<X>, F::WithType<X>> {
        Ok(step)
    }
}

impl<F: TypeConstructor, G: TypeConstructor, X> Inject<F, Here> for Coproduct<F, G, X> {
    #[inline]
    fn inject<Y>(step: F::WithType<Y>) -> Coproduct<F, G, Y> {
        Coproduct::Left(step)
    }

    fn project<Y>(step: Coproduct<F, G, Y>) -> Result<F::WithType<Y>, Coproduct<F, G, Y>> {
        match step {
            Coproduct::Left(step) => Ok(step),
            other @ Coproduct::Right(_) => Err(other),
        }
    }
}

impl<F, H, G, X, I> Inject<F, There<I>> for Coproduct<H, G, X>
where
    F: TypeConstructor,
    H: TypeConstructor,
    G: Inject<F, I>,
{
    #[inline]
    fn inject<Y>(step: F::WithType<Y>) -> Coproduct<H, G, Y> {
        Coproduct::Right(G::inject(step))
    }

    fn project<Y>(step: Coproduct<H, G, Y>) -> Result<F::WithType<Y>, Coproduct<H, G, Y>> {
        match step {
            Coproduct::Right(step) => G::project(step).map_err(Coproduct::Right),
            other @ Coproduct::Left(_) => Err(other),
        }
    }
}

impl<F, A> Free<F, A>
where
    F: Functor + 'static,
    A: 'static,
{
    /// Re-tags every step as a step of the wider vocabulary `G`.
    ///
    /// The resulting program issues the same steps, injected into `G`, in the
    /// same order, and produces the same value under an interpreter that
    /// answers the injected steps as the original interpreter would.
    pub fn widen<G, Index>(self) -> Free<G, A>
    where
        G: Inject<F, Index> + Functor + 'static,
    {
        self.transform::<G, _>(|step| G::inject(step))
    }
}
