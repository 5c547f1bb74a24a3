//! The free construction and its interpreters.
//!
//! - [`Free`]: a program over an effect vocabulary, built by composition
//!   and consumed by a driver in constant stack
//! - [`Either`]: the outcome of one normalization or loop step
//! - [`MonadRec`]: host computations a driver can iterate without recursion
//! - [`Coyoneda`]: lifts request types with no mapping operation
//! - [`Coproduct`] and [`Inject`]: closed sums of vocabularies and widening
//!
//! # Examples
//!
//! ## Interpreting a Program
//!
//! ```rust
//! use freestep::control::{Either, Free};
//!
//! // A program over `Option<()>`: each step either continues or stops.
//! fn sum_to(n: u64, total: u64) -> Free<Option<()>, u64> {
//!     if n == 0 {
//!         Free::pure(total)
//!     } else {
//!         Free::<Option<()>, u64>::lift_f(Some(n)).flat_map(move |k| sum_to(k - 1, total + k))
//!     }
//! }
//!
//! let result = sum_to(100_000, 0).run(|step| step.unwrap_or(Free::pure(0)));
//! assert_eq!(result, 5_000_050_000);
//!
//! // One step at a time.
//! match sum_to(1, 0).resume() {
//!     Either::Left(Some(rest)) => assert!(matches!(rest.resume(), Either::Right(1))),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Fallible Interpreters
//!
//! ```rust
//! use freestep::control::Free;
//!
//! let program = Free::<Option<()>, i32>::lift_f(Some(1)).then(Free::lift_f(Some(2)));
//!
//! let outcome: Result<i32, String> = program.try_run(|step| {
//!     step.ok_or_else(|| "missing continuation".to_string())
//! });
//! assert_eq!(outcome, Ok(2));
//! ```

mod continuation_queue;
mod coproduct;
mod coyoneda;
mod either;
mod free;
#[cfg(feature = "async")]
mod free_async;
mod monad_rec;

pub use coproduct::{Coproduct, Here, Inject, Itself, There};
pub use coyoneda::Coyoneda;
pub use either::Either;
pub use free::Free;
pub use monad_rec::MonadRec;

static_assertions::assert_not_impl_any!(Free<Option<()>, i32>: Send, Sync);
static_assertions::assert_not_impl_any!(Coyoneda<Option<()>, i32>: Send, Sync);
