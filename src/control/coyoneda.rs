//! Coyoneda - a free functor over any type constructor.
//!
//! [`Free`] needs to map over the payload of an effect step. Many natural
//! vocabularies cannot provide that: a request such as `Get<String>` names the
//! type of its *answer*, not a slot holding a continuation. `Coyoneda<F, A>`
//! pairs such a request `F::WithType<X>` with a pending conversion `X -> A`,
//! hiding `X`. Mapping only composes the conversion, so `Coyoneda<F, _>` is a
//! [`Functor`] for every `F`, and `Free<Coyoneda<F, ()>, A>` works for any
//! request type.
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::{Coyoneda, Free};
//! use freestep::typeclass::TypeConstructor;
//!
//! // A request for a value of type `T`; it has no mapping operation.
//! struct Ask<T>(&'static str, std::marker::PhantomData<T>);
//!
//! impl<T> TypeConstructor for Ask<T> {
//!     type Inner = T;
//!     type WithType<B> = Ask<B>;
//! }
//!
//! fn ask<T: 'static>(key: &'static str) -> Free<Coyoneda<Ask<()>, ()>, T> {
//!     Free::lift_coyoneda(Ask(key, std::marker::PhantomData))
//! }
//!
//! let program = ask::<i32>("width").map2(ask::<i32>("height"), |w, h| w * h);
//!
//! let area = program.run(|step| {
//!     step.handle::<i32, _>(|Ask(key, _)| if key == "width" { 6 } else { 7 })
//!         .unwrap_or_else(|request| panic!("unexpected {request:?}"))
//! });
//! assert_eq!(area, 42);
//! ```

use std::any::{Any, type_name};
use std::fmt;

use super::free::{Free, restore};
use crate::typeclass::{Functor, TypeConstructor};

type Erased = Box<dyn Any>;

/// A request of some hidden answer type, seen through its type constructor.
trait HiddenRequest<F: TypeConstructor> {
    fn lower_erased(self: Box<Self>) -> F::WithType<Erased>
    where
        F: Functor;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Erased;

    fn type_name(&self) -> &'static str;
}

struct Request<F: TypeConstructor, X> {
    request: F::WithType<X>,
}

impl<F, X> HiddenRequest<F> for Request<F, X>
where
    F: TypeConstructor + 'static,
    X: 'static,
{
    fn lower_erased(self: Box<Self>) -> F::WithType<Erased>
    where
        F: Functor,
    {
        F::fmap(self.request, |answer: X| Box::new(answer) as Erased)
    }

    fn as_any(&self) -> &dyn Any {
        &self.request
    }

    fn into_any(self: Box<Self>) -> Erased {
        Box::new(self.request)
    }

    fn type_name(&self) -> &'static str {
        type_name::<F::WithType<X>>()
    }
}

/// A hidden request `F::WithType<X>` paired with a conversion `X -> A`.
///
/// # Type Parameters
///
/// * `F` - The witness of the request type constructor.
/// * `A` - The type the answer is converted to.
///
/// # Laws
///
/// `Coyoneda` is a lawful functor for every `F`, and lowering is transparent
/// whenever `F` is a functor:
///
/// - `Coyoneda::lift(fa).lower() == fa`
/// - `Coyoneda::lift(fa).map(g).lower() == F::fmap(fa, g)`
pub struct Coyoneda<F: TypeConstructor, A> {
    request: Box<dyn HiddenRequest<F>>,
    convert: Box<dyn FnOnce(Erased) -> A>,
}

impl<F, A> Coyoneda<F, A>
where
    F: TypeConstructor + 'static,
    A: 'static,
{
    /// Wraps a request with the identity conversion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Coyoneda;
    ///
    /// let lifted: Coyoneda<Option<()>, i32> = Coyoneda::lift(Some(41));
    /// assert_eq!(lifted.map(|n| n + 1).lower(), Some(42));
    /// ```
    pub fn lift(request: F::WithType<A>) -> Self {
        Self {
            request: Box::new(Request::<F, A> { request }),
            convert: Box::new(restore::<A>),
        }
    }

    /// Composes `function` after the pending conversion. The request is not
    /// touched.
    pub fn map<B, G>(self, function: G) -> Coyoneda<F, B>
    where
        B: 'static,
        G: FnOnce(A) -> B + 'static,
    {
        let Self { request, convert } = self;
        Coyoneda {
            request,
            convert: Box::new(move |answer| function(convert(answer))),
        }
    }

    /// Maps the conversion into the request using `F`'s own mapping
    /// operation.
    pub fn lower(self) -> F::WithType<A>
    where
        F: Functor,
    {
        F::fmap(self.request.lower_erased(), self.convert)
    }

    /// Returns `true` if the hidden request has type `F::WithType<X>`.
    #[must_use]
    pub fn is_request<X: 'static>(&self) -> bool {
        self.request.as_any().is::<F::WithType<X>>()
    }

    /// Answers the hidden request if it has type `F::WithType<X>`.
    ///
    /// On a match, `respond` turns the request into its answer, and the
    /// pending conversion is applied to produce an `A`. Otherwise the
    /// `Coyoneda` is returned unchanged so another handler can try.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when the hidden request is not a
    /// `F::WithType<X>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Coyoneda;
    ///
    /// let lifted = Coyoneda::<Box<()>, String>::lift(Box::new(String::from("four")))
    ///     .map(|text| text.len());
    ///
    /// let lifted = lifted.handle::<i32, _>(|_| 0).unwrap_err();
    /// assert_eq!(lifted.handle::<String, _>(|text| *text).ok(), Some(4));
    /// ```
    pub fn handle<X, R>(self, respond: R) -> Result<A, Self>
    where
        X: 'static,
        R: FnOnce(F::WithType<X>) -> X,
    {
        if !self.is_request::<X>() {
            return Err(self);
        }
        let Self { request, convert } = self;
        let request = restore::<F::WithType<X>>(request.into_any());
        Ok(convert(Box::new(respond(request))))
    }

    /// The name of the hidden request type, for diagnostics.
    #[must_use]
    pub fn request_type_name(&self) -> &'static str {
        self.request.type_name()
    }
}

impl<F: TypeConstructor, A> TypeConstructor for Coyoneda<F, A> {
    type Inner = A;
    type WithType<B> = Coyoneda<F, B>;
}

impl<F, A> Functor for Coyoneda<F, A>
where
    F: TypeConstructor + 'static,
{
    #[inline]
    fn fmap<X, Y, G>(fx: Coyoneda<F, X>, function: G) -> Coyoneda<F, Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        fx.map(function)
    }
}

impl<F: TypeConstructor, A> fmt::Debug for Coyoneda<F, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Coyoneda")
            .field(&self.request.type_name())
            .finish()
    }
}

impl<F, A> Free<Coyoneda<F, ()>, A>
where
    F: TypeConstructor + 'static,
    A: 'static,
{
    /// Lifts a request of any type constructor into a computation whose
    /// result is the request's answer.
    pub fn lift_coyoneda(request: F::WithType<A>) -> Self {
        Self::lift_f(Coyoneda::lift(request))
    }

    /// Lowers every step back into `F`, for vocabularies that do have a
    /// mapping operation.
    pub fn lower_coyoneda(self) -> Free<F, A>
    where
        F: Functor,
    {
        self.transform::<F, _>(Coyoneda::lower)
    }
}
