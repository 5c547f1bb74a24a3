//! Asynchronous drivers for [`Free`].
//!
//! The host is Rust's `Future`: the step interpreter returns a future per
//! effect step, and the driver awaits it before normalizing the rest of the
//! program. An `async fn` loop is the host's stack-safe iteration primitive,
//! so these drivers need no [`MonadRec`](super::MonadRec) instance.
//!
//! A `Free` is not `Send`, so the futures returned here are not `Send`
//! either. Await them on the caller's task, for example under a
//! current-thread tokio runtime.
//!
//! # Examples
//!
//! ```rust
//! use freestep::control::Free;
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! let program = Free::<Option<()>, i32>::lift_f(Some(40)).map(|n| n + 2);
//!
//! let result = program
//!     .run_async(|step| async move { step.unwrap_or(Free::pure(0)) })
//!     .await;
//! assert_eq!(result, 42);
//! # });
//! ```

use std::future::Future;

use tracing::trace;

use super::either::Either;
use super::free::Free;
use crate::typeclass::Functor;

impl<F, A> Free<F, A>
where
    F: Functor + 'static,
    A: 'static,
{
    /// Runs the computation, awaiting `interpreter`'s answer to each step.
    ///
    /// Dropping the returned future cancels the run: the in-flight step and
    /// the rest of the program are dropped with it.
    pub async fn run_async<I, Fut>(self, mut interpreter: I) -> A
    where
        I: FnMut(F::WithType<Self>) -> Fut,
        Fut: Future<Output = Self>,
    {
        let mut current = self;
        let mut steps: u64 = 0;

        loop {
            match current.resume() {
                Either::Right(value) => {
                    trace!(driver = "run_async", steps, "computation finished");
                    return value;
                }
                Either::Left(step) => {
                    steps += 1;
                    trace!(driver = "run_async", step = steps, "interpreting effect step");
                    current = interpreter(step).await;
                }
            }
        }
    }

    /// Runs the computation with a fallible asynchronous interpreter.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by an interpreter future. No further
    /// step is interpreted after it.
    pub async fn try_run_async<E, I, Fut>(self, mut interpreter: I) -> Result<A, E>
    where
        I: FnMut(F::WithType<Self>) -> Fut,
        Fut: Future<Output = Result<Self, E>>,
    {
        let mut current = self;
        let mut steps: u64 = 0;

        loop {
            match current.resume() {
                Either::Right(value) => {
                    trace!(driver = "try_run_async", steps, "computation finished");
                    return Ok(value);
                }
                Either::Left(step) => {
                    steps += 1;
                    trace!(driver = "try_run_async", step = steps, "interpreting effect step");
                    current = interpreter(step).await?;
                }
            }
        }
    }
}
