//! Type class traits the free construction is generic over.
//!
//! - [`TypeConstructor`]: names a type constructor through a witness type
//! - [`Functor`]: mapping over the payload of a type constructor
//! - [`Identity`]: the identity functor, the trivial host computation
//!
//! ## Higher-Kinded Types Emulation
//!
//! Rust does not have native support for higher-kinded types (HKT).
//! This library uses Generic Associated Types (GAT) to emulate HKT
//! behavior: an effect vocabulary such as `Option<_>` is named by a
//! witness like `Option<()>`, and `<Option<()>>::WithType<B>` is
//! `Option<B>`.
//!
//! # Examples
//!
//! ```rust
//! use freestep::typeclass::{Functor, Identity};
//!
//! fn double_inside<W: Functor>(value: W::WithType<i32>) -> W::WithType<i32> {
//!     W::fmap(value, |n: i32| n * 2)
//! }
//!
//! assert_eq!(double_inside::<Option<()>>(Some(21)), Some(42));
//! assert_eq!(double_inside::<Identity<()>>(Identity(21)), Identity(42));
//! ```

mod functor;
mod higher;
mod identity;

pub use functor::Functor;
pub use higher::TypeConstructor;
pub use identity::Identity;
