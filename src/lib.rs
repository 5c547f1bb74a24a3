//! # freestep
//!
//! A stack-safe free monad for Rust: describe a program as data over an
//! effect vocabulary of your own, then run it with an interpreter of your
//! choice, in constant stack however the program was composed.
//!
//! ## Overview
//!
//! - **Free**: `Free<F, A>` with O(1) re-associating `flat_map`, a looping
//!   normalizer (`resume`) and trampolined drivers (`run`, `run_in_host`,
//!   `try_run`)
//! - **Async Drivers**: `run_async` and `try_run_async` for interpreters that
//!   answer steps with futures
//! - **Coyoneda**: lifts request types that have no mapping operation
//! - **Coproduct**: closed sums of vocabularies, and `widen` to embed a
//!   program into one
//!
//! ## Feature Flags
//!
//! - `typeclass`: `TypeConstructor`, `Functor`, `Identity`
//! - `control`: `Free`, `Either`, `MonadRec`, `Coyoneda`, `Coproduct`
//! - `async`: asynchronous drivers
//! - `full`: Enable all features
//!
//! ## Logging
//!
//! Drivers emit `tracing` events at `TRACE` level: one per interpreted step
//! and one on completion. No subscriber is installed by this crate.
//!
//! ## Example
//!
//! ```rust
//! use freestep::prelude::*;
//!
//! let program = Free::<Option<()>, i32>::lift_f(Some(6)).map2(Free::lift_f(Some(7)), |a, b| a * b);
//! assert_eq!(program.run(|step| step.unwrap_or(Free::pure(0))), 42);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use freestep::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "control")]
    pub use crate::control::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "control")]
pub mod control;
