//! Higher-Kinded Type emulation through Generic Associated Types.
//!
//! Rust has no native Higher-Kinded Types: a trait cannot abstract over
//! `Option<_>` as a type constructor. This module names a type constructor
//! through a *witness* type instead. The witness is the constructor applied to
//! any argument (conventionally `()`), and its generic associated type
//! `WithType<B>` recovers the constructor applied to `B`.
//!
//! Every effect vocabulary and every host computation type used by
//! [`Free`](crate::control::Free) is named this way: `Free<Option<()>, i32>` is a
//! computation whose effect steps are `Option<_>` values.
//!
//! # Example
//!
//! ```rust
//! use freestep::typeclass::TypeConstructor;
//!
//! fn transform_type<T: TypeConstructor>(_witness: T) -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let none_string: Option<String> = transform_type(Some(42));
//! assert_eq!(none_string, None);
//! ```

/// A trait representing a type constructor.
///
/// # Associated Types
///
/// - `Inner`: The type argument this witness is currently applied to.
/// - `WithType<B>`: The same type constructor applied to `B`.
///
/// # Laws
///
/// 1. **Consistency**: `<F as TypeConstructor>::WithType<F::Inner>` is `F`.
/// 2. **Closure**: `WithType<B>::WithType<C>` is `WithType<C>`. The compiler
///    cannot check this law, so generic code in this crate only ever reaches
///    other applications through the *original* witness.
pub trait TypeConstructor {
    /// The inner type that this type constructor is applied to.
    type Inner;

    /// The same type constructor applied to a different type `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}

// =============================================================================
// Standard Library Type Implementations
// =============================================================================

impl<A> TypeConstructor for Option<A> {
    type Inner = A;
    type WithType<B> = Option<B>;
}

impl<T, E> TypeConstructor for Result<T, E> {
    type Inner = T;
    type WithType<B> = Result<B, E>;
}

impl<T> TypeConstructor for Box<T> {
    type Inner = T;
    type WithType<B> = Box<B>;
}
