//! Stack-safe free construction over an arbitrary effect vocabulary.
//!
//! `Free<F, A>` describes a program that produces an `A` by issuing effect
//! steps drawn from the vocabulary named by the witness `F`. A step of the
//! vocabulary carrying a continuation of type `X` has type `F::WithType<X>`.
//! Programs are plain data: nothing happens until a driver hands each pending
//! step to a user-supplied step interpreter.
//!
//! # Stack Safety
//!
//! Neither composition nor interpretation uses the call stack in proportion to
//! the size of a program:
//!
//! - [`Free::flat_map`] on an existing composition pushes onto its queue of
//!   continuations in O(1): it never walks or evaluates the chain it extends.
//! - [`Free::resume`] is a single loop over a mutable "current computation"
//!   slot. A composition met inside a continuation's result has its queue
//!   spliced in front of the outer one.
//! - Dropping a program that was never finished, for example after an
//!   interpreter error, releases its continuations one at a time.
//! - [`Free::run`] and [`Free::run_in_host`] iterate `resume` through the
//!   host's [`MonadRec::tail_rec_m`].
//!
//! A million left-nested binds, a million right-nested binds, and a million
//! interleaved effect steps all run in constant stack.
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::Free;
//! use freestep::typeclass::{Functor, TypeConstructor};
//!
//! // A one-operation logging vocabulary.
//! struct Log<Next> {
//!     message: String,
//!     next: Next,
//! }
//!
//! impl<Next> TypeConstructor for Log<Next> {
//!     type Inner = Next;
//!     type WithType<B> = Log<B>;
//! }
//!
//! impl<Next> Functor for Log<Next> {
//!     fn fmap<X, Y, G>(fx: Log<X>, function: G) -> Log<Y>
//!     where
//!         G: FnOnce(X) -> Y + 'static,
//!         X: 'static,
//!         Y: 'static,
//!     {
//!         Log { message: fx.message, next: function(fx.next) }
//!     }
//! }
//!
//! fn log(message: &str) -> Free<Log<()>, ()> {
//!     Free::lift_f(Log { message: message.to_string(), next: () })
//! }
//!
//! let program = log("a").then(log("b")).map(|()| 42);
//!
//! let mut messages = Vec::new();
//! let result = program.run(|step| {
//!     messages.push(step.message);
//!     step.next
//! });
//!
//! assert_eq!(messages, vec!["a", "b"]);
//! assert_eq!(result, 42);
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use super::continuation_queue::ContinuationQueue;
use super::either::Either;
use super::monad_rec::MonadRec;
use crate::typeclass::{Functor, Identity, TypeConstructor};

pub(crate) type Erased = Box<dyn Any>;

type Thunk<F> = Box<dyn FnOnce() -> Free<F, Erased>>;

/// Restores a value erased to `Box<dyn Any>` by this crate.
///
/// # Panics
///
/// Panics if `erased` does not hold a `T`. Every erased value is produced and
/// consumed by paired constructors inside the crate, so a mismatch is a bug
/// here, never a user error.
pub(crate) fn restore<T: 'static>(erased: Erased) -> T {
    *erased
        .downcast::<T>()
        .expect("type-erased value restored at a different type")
}

/// An unevaluated composition: a thunk producing the head computation and
/// the queue of continuations to feed its (erased) result through.
///
/// This is an internal representation exposed only so that [`Free::Bind`] can
/// be named; it has no public operations.
#[doc(hidden)]
pub struct BindChain<F: TypeConstructor> {
    head: Thunk<F>,
    queue: ContinuationQueue<F>,
}

/// A program over the effect vocabulary `F` producing an `A`.
///
/// # Type Parameters
///
/// * `F` - The witness of the effect vocabulary, e.g. `Log<()>`.
/// * `A` - The result type.
///
/// Most operations require `F: Functor + 'static` and `A: 'static` because
/// continuations are stored as boxed closures. Vocabularies without a mapping
/// operation are lifted through [`Coyoneda`](super::Coyoneda).
///
/// # Laws
///
/// Observed through any driver and any interpreter, `Free` satisfies:
///
/// - **Left Identity**: `Free::pure(a).flat_map(f)` behaves as `f(a)`
/// - **Right Identity**: `m.flat_map(Free::pure)` behaves as `m`
/// - **Associativity**: `m.flat_map(f).flat_map(g)` behaves as
///   `m.flat_map(|x| f(x).flat_map(g))`, issuing the same steps in the same
///   order
///
/// # Examples
///
/// ```rust
/// use freestep::control::Free;
///
/// // `Option<()>` as a vocabulary: a step may or may not carry a continuation.
/// let program = Free::<Option<()>, i32>::lift_f(Some(20)).map(|n| n + 22);
///
/// let result = program.run(|step| step.unwrap_or_else(|| Free::pure(0)));
/// assert_eq!(result, 42);
/// ```
pub enum Free<F: TypeConstructor, A> {
    /// A completed computation.
    Pure(A),
    /// One pending effect step wrapping the computation to continue with.
    Suspend(Box<F::WithType<Free<F, A>>>),
    /// An unevaluated composition, rotated away by [`Free::resume`].
    #[doc(hidden)]
    Bind(Box<BindChain<F>>),
}

impl<F: TypeConstructor, A> Free<F, A> {
    /// Creates a completed computation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program: Free<Option<()>, i32> = Free::pure(42);
    /// assert_eq!(program.run(|_| unreachable!()), 42);
    /// ```
    #[inline]
    pub const fn pure(value: A) -> Self {
        Self::Pure(value)
    }

    /// Creates a computation from one effect step whose payload is the
    /// computation to continue with.
    #[inline]
    pub fn suspend(step: F::WithType<Self>) -> Self {
        Self::Suspend(Box::new(step))
    }

    /// Returns `true` if this computation is already completed.
    ///
    /// Only a literal `Pure` counts; a composition that would finish without
    /// issuing a step still reports `false` until it is resumed.
    #[inline]
    pub const fn is_pure(&self) -> bool {
        matches!(self, Self::Pure(_))
    }
}

impl<F, A> Free<F, A>
where
    F: Functor + 'static,
    A: 'static,
{
    fn chain(head: Thunk<F>, queue: ContinuationQueue<F>) -> Self {
        Self::Bind(Box::new(BindChain { head, queue }))
    }

    /// Lifts a single effect step into a computation whose result is the
    /// step's payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program: Free<Option<()>, &str> = Free::lift_f(Some("answer"));
    /// assert_eq!(program.run(|step| step.unwrap_or(Free::pure("none"))), "answer");
    /// ```
    pub fn lift_f(step: F::WithType<A>) -> Self {
        Self::suspend(F::fmap(step, Self::Pure))
    }

    /// Postpones building a computation until a driver reaches it.
    ///
    /// The thunk runs at most once, during normalization.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// fn countdown(n: u64) -> Free<Option<()>, u64> {
    ///     if n == 0 {
    ///         Free::pure(0)
    ///     } else {
    ///         Free::defer(move || countdown(n - 1))
    ///     }
    /// }
    ///
    /// assert_eq!(countdown(1_000_000).run(|_| unreachable!()), 0);
    /// ```
    pub fn defer<T>(thunk: T) -> Self
    where
        T: FnOnce() -> Self + 'static,
    {
        Self::chain(Box::new(move || thunk().erase()), ContinuationQueue::new())
    }

    /// Sequences a continuation after this computation.
    ///
    /// This is the monadic `bind` (>>=) operation. It evaluates nothing: on
    /// an existing composition it installs the continuation in O(1) without
    /// touching the chain it extends.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program = Free::<Option<()>, i32>::pure(20).flat_map(|n| Free::pure(n + 22));
    /// assert_eq!(program.run(|_| unreachable!()), 42);
    /// ```
    pub fn flat_map<B, K>(self, continuation: K) -> Free<F, B>
    where
        B: 'static,
        K: FnOnce(A) -> Free<F, B> + 'static,
    {
        let mut chain = self.into_chain();
        chain
            .queue
            .push(Box::new(move |erased| continuation(restore::<A>(erased)).erase()));
        Free::Bind(chain)
    }

    /// Alias for [`flat_map`](Self::flat_map).
    #[inline]
    pub fn and_then<B, K>(self, continuation: K) -> Free<F, B>
    where
        B: 'static,
        K: FnOnce(A) -> Free<F, B> + 'static,
    {
        self.flat_map(continuation)
    }

    /// Applies a function to the result.
    pub fn map<B, G>(self, function: G) -> Free<F, B>
    where
        B: 'static,
        G: FnOnce(A) -> B + 'static,
    {
        self.flat_map(move |value| Free::Pure(function(value)))
    }

    /// Runs `next` after this computation, discarding this result.
    pub fn then<B: 'static>(self, next: Free<F, B>) -> Free<F, B> {
        self.flat_map(move |_| next)
    }

    /// Combines the results of two computations, issuing this one's steps
    /// first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program = Free::<Option<()>, i32>::lift_f(Some(40))
    ///     .map2(Free::lift_f(Some(2)), |a, b| a + b);
    /// assert_eq!(program.run(|step| step.unwrap_or(Free::pure(0))), 42);
    /// ```
    pub fn map2<B, C, G>(self, other: Free<F, B>, combine: G) -> Free<F, C>
    where
        B: 'static,
        C: 'static,
        G: FnOnce(A, B) -> C + 'static,
    {
        self.flat_map(move |first| other.map(move |second| combine(first, second)))
    }

    /// Applies the function this computation produces to the result of
    /// `argument`. The function's steps are issued first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let function = Free::<Option<()>, _>::pure(|n: i32| n * 2);
    /// let program = function.apply(Free::pure(21));
    /// assert_eq!(program.run(|_| unreachable!()), 42);
    /// ```
    pub fn apply<B, C>(self, argument: Free<F, B>) -> Free<F, C>
    where
        A: FnOnce(B) -> C,
        B: 'static,
        C: 'static,
    {
        self.flat_map(move |function| argument.map(function))
    }

    /// Views this computation as a composition, reusing an existing one.
    fn into_chain(self) -> Box<BindChain<F>> {
        match self.erase() {
            Free::Bind(chain) => chain,
            settled => Box::new(BindChain {
                head: Box::new(move || settled),
                queue: ContinuationQueue::new(),
            }),
        }
    }

    /// Forgets the result type. The erased computation produces the boxed
    /// result; a pending step is only re-tagged when it is reached.
    fn erase(self) -> Free<F, Erased> {
        match self {
            Self::Pure(value) => Free::Pure(Box::new(value)),
            Self::Suspend(step) => Free::chain(
                Box::new(move || Free::Suspend(Box::new(F::fmap(*step, Self::erase)))),
                ContinuationQueue::new(),
            ),
            Self::Bind(chain) => Free::Bind(chain),
        }
    }

    /// Normalizes to either the final value or exactly one pending step.
    ///
    /// Returns `Right(value)` for a completed computation and `Left(step)`
    /// when an effect step must be interpreted first; the step's payload is
    /// the rest of the program. Compositions are rotated in a loop until one
    /// of the two is reached, so the auxiliary stack use is independent of
    /// how the program was composed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::{Either, Free};
    ///
    /// let program = Free::<Option<()>, i32>::pure(1).flat_map(|n| Free::lift_f(Some(n + 1)));
    ///
    /// match program.resume() {
    ///     Either::Left(Some(rest)) => assert!(matches!(rest.resume(), Either::Right(2))),
    ///     _ => panic!("expected one pending step"),
    /// }
    /// ```
    pub fn resume(self) -> Either<F::WithType<Self>, A> {
        let BindChain { head, mut queue } = match self {
            Self::Pure(value) => return Either::Right(value),
            Self::Suspend(step) => return Either::Left(*step),
            Self::Bind(chain) => *chain,
        };
        let mut current = head();

        loop {
            match current {
                Free::Pure(erased) => match queue.pop() {
                    Some(continuation) => current = continuation(erased),
                    None => return Either::Right(restore::<A>(erased)),
                },
                Free::Suspend(step) => {
                    return Either::Left(F::fmap(*step, move |next: Free<F, Erased>| {
                        Self::chain(Box::new(move || next), queue)
                    }));
                }
                Free::Bind(inner) => {
                    let BindChain {
                        head,
                        queue: inner_queue,
                    } = *inner;
                    queue.prepend(inner_queue);
                    current = head();
                }
            }
        }
    }

    /// Runs the computation, answering every effect step with `interpreter`.
    ///
    /// The interpreter receives one step and returns the computation to
    /// continue with, usually the step's payload (possibly after feeding it a
    /// response). This is [`run_in_host`](Self::run_in_host) at
    /// [`Identity`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// fn tick(n: u64) -> Free<Option<()>, u64> {
    ///     if n == 0 {
    ///         Free::pure(0)
    ///     } else {
    ///         Free::<Option<()>, u64>::lift_f(Some(n - 1)).flat_map(tick)
    ///     }
    /// }
    ///
    /// let mut steps = 0;
    /// let result = tick(100_000).run(|step| {
    ///     steps += 1;
    ///     step.unwrap_or(Free::pure(0))
    /// });
    /// assert_eq!((result, steps), (0, 100_000));
    /// ```
    pub fn run<I>(self, mut interpreter: I) -> A
    where
        I: FnMut(F::WithType<Self>) -> Self,
    {
        self.run_in_host::<Identity<()>, _>(move |step| Identity(interpreter(step)))
            .into_inner()
    }

    /// Runs the computation inside the host `M`.
    ///
    /// Each step is answered by `interpreter` with a host computation yielding
    /// the rest of the program. The loop is driven by `M::tail_rec_m`, so it
    /// stops at the first host-level failure and is stack safe for any number
    /// of steps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program = Free::<Option<()>, i32>::lift_f(Some(1))
    ///     .then(Free::<Option<()>, i32>::lift_f(None))
    ///     .then(Free::pure(3));
    ///
    /// // Every step must carry a continuation, otherwise the host fails.
    /// let result = program.run_in_host::<Option<()>, _>(|step| step);
    /// assert_eq!(result, None);
    /// ```
    pub fn run_in_host<M, I>(self, mut interpreter: I) -> M::WithType<A>
    where
        M: MonadRec,
        I: FnMut(F::WithType<Self>) -> M::WithType<Self>,
    {
        let mut steps: u64 = 0;
        M::tail_rec_m::<Self, A, _>(self, move |current: Self| match current.resume() {
            Either::Right(value) => {
                trace!(driver = "run_in_host", steps, "computation finished");
                M::pure(Either::<Self, A>::Right(value))
            }
            Either::Left(step) => {
                steps += 1;
                trace!(driver = "run_in_host", step = steps, "interpreting effect step");
                M::fmap(interpreter(step), Either::<Self, A>::Left)
            }
        })
    }

    /// Runs the computation with a fallible interpreter.
    ///
    /// Stops at the first `Err` and returns it unchanged; no further step is
    /// interpreted.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `interpreter`.
    pub fn try_run<E, I>(self, interpreter: I) -> Result<A, E>
    where
        I: FnMut(F::WithType<Self>) -> Result<Self, E>,
    {
        self.run_in_host::<Result<(), E>, _>(interpreter)
    }

    /// Translates every effect step into the vocabulary `G`.
    ///
    /// `translate` is applied lazily, one step at a time, as a driver of the
    /// resulting computation reaches each step; the walk over the remaining
    /// program is deferred, so arbitrarily long programs translate in constant
    /// stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use freestep::control::Free;
    ///
    /// let program = Free::<Option<()>, i32>::lift_f(Some(41)).map(|n| n + 1);
    /// let boxed: Free<Box<()>, i32> =
    ///     program.transform(|step: Option<Free<Option<()>, i32>>| {
    ///         Box::new(step.unwrap_or(Free::pure(0)))
    ///     });
    /// assert_eq!(boxed.run(|step| *step), 42);
    /// ```
    pub fn transform<G, T>(self, translate: T) -> Free<G, A>
    where
        G: Functor + 'static,
        T: Fn(F::WithType<Self>) -> G::WithType<Self> + 'static,
    {
        self.transform_shared(Rc::new(translate))
    }

    fn transform_shared<G, T>(self, translate: Rc<T>) -> Free<G, A>
    where
        G: Functor + 'static,
        T: Fn(F::WithType<Self>) -> G::WithType<Self> + 'static,
    {
        match self.resume() {
            Either::Right(value) => Free::Pure(value),
            Either::Left(step) => {
                trace!("translating effect step");
                let translated = (*translate)(step);
                Free::suspend(G::fmap(translated, move |next: Self| {
                    Free::defer(move || next.transform_shared(translate))
                }))
            }
        }
    }
}

impl<F: TypeConstructor, A: fmt::Debug> fmt::Debug for Free<F, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pure(value) => formatter.debug_tuple("Pure").field(value).finish(),
            Self::Suspend(_) => formatter.debug_tuple("Suspend").field(&"<step>").finish(),
            Self::Bind(_) => formatter
                .debug_tuple("Bind")
                .field(&"<continuation>")
                .finish(),
        }
    }
}
