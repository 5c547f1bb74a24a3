//! Property-based tests for Free<F, A> laws.
//!
//! This module verifies that Free satisfies, observed through `run`:
//!
//! - **Monad Laws**: left identity, right identity, associativity; both sides
//!   produce the same value *and* issue the same steps in the same order
//! - **Functor Laws**: identity and composition
//! - **Driver Agreement**: `run`, `run_in_host` and manual `resume` loops
//!   observe the same program

#![cfg(feature = "control")]

use freestep::control::{Either, Free};
use freestep::typeclass::{Functor, Identity, TypeConstructor};
use proptest::prelude::*;

struct Emit<Next> {
    value: i32,
    next: Next,
}

impl<Next> TypeConstructor for Emit<Next> {
    type Inner = Next;
    type WithType<B> = Emit<B>;
}

impl<Next> Functor for Emit<Next> {
    fn fmap<X, Y, G>(fx: Emit<X>, function: G) -> Emit<Y>
    where
        G: FnOnce(X) -> Y + 'static,
        X: 'static,
        Y: 'static,
    {
        Emit {
            value: fx.value,
            next: function(fx.next),
        }
    }
}

type Program<A> = Free<Emit<()>, A>;

fn emit(value: i32) -> Program<i32> {
    Free::lift_f(Emit { value, next: value })
}

/// Emits every value in order and returns their wrapping sum.
fn emit_all(values: Vec<i32>) -> Program<i32> {
    values.into_iter().fold(Free::pure(0), |program, value| {
        program.flat_map(move |total: i32| emit(value).map(move |v| total.wrapping_add(v)))
    })
}

fn observe<A: 'static>(program: Program<A>) -> (Vec<i32>, A) {
    let mut trace = Vec::new();
    let value = program.run(|step| {
        trace.push(step.value);
        step.next
    });
    (trace, value)
}

fn values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-1000i32..1000, 0..12)
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left identity: pure(a).flat_map(f) == f(a)
    #[test]
    fn prop_left_identity(seed in any::<i32>(), steps in values()) {
        let f = {
            let steps = steps.clone();
            move |a: i32| emit_all(steps.clone()).map(move |s| s.wrapping_mul(3).wrapping_add(a))
        };

        let left = observe(Program::pure(seed).flat_map(f.clone()));
        let right = observe(f(seed));
        prop_assert_eq!(left, right);
    }

    /// Right identity: m.flat_map(pure) == m
    #[test]
    fn prop_right_identity(steps in values()) {
        let left = observe(emit_all(steps.clone()).flat_map(Free::pure));
        let right = observe(emit_all(steps));
        prop_assert_eq!(left, right);
    }

    /// Associativity: m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))
    #[test]
    fn prop_associativity(first in values(), second in values(), third in values()) {
        let f = {
            let second = second.clone();
            move |x: i32| emit_all(second.clone()).map(move |s| s.wrapping_sub(x))
        };
        let g = {
            let third = third.clone();
            move |y: i32| emit(y).then(emit_all(third.clone()))
        };

        let left = observe(emit_all(first.clone()).flat_map(f.clone()).flat_map(g.clone()));
        let right = observe(emit_all(first).flat_map(move |x| f(x).flat_map(g)));
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Functor Laws
// =============================================================================

proptest! {
    /// Identity: m.map(|x| x) == m
    #[test]
    fn prop_functor_identity(steps in values()) {
        let left = observe(emit_all(steps.clone()).map(|x| x));
        let right = observe(emit_all(steps));
        prop_assert_eq!(left, right);
    }

    /// Composition: m.map(f).map(g) == m.map(|x| g(f(x)))
    #[test]
    fn prop_functor_composition(steps in values(), offset in any::<i32>()) {
        let f = move |x: i32| x.wrapping_add(offset);
        let g = |x: i32| i64::from(x) * 2;

        let left = observe(emit_all(steps.clone()).map(f).map(g));
        let right = observe(emit_all(steps).map(move |x| g(f(x))));
        prop_assert_eq!(left, right);
    }

    /// map2 sequences both programs and combines their results
    #[test]
    fn prop_map2_is_flat_map_then_map(first in values(), second in values()) {
        let left = observe(emit_all(first.clone()).map2(emit_all(second.clone()), |a, b| (a, b)));
        let right = observe(
            emit_all(first).flat_map(move |a| emit_all(second).map(move |b| (a, b))),
        );
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Driver Agreement
// =============================================================================

fn observe_by_resume(program: Program<i32>) -> (Vec<i32>, i32) {
    let mut trace = Vec::new();
    let mut current = program;
    loop {
        match current.resume() {
            Either::Left(step) => {
                trace.push(step.value);
                current = step.next;
            }
            Either::Right(value) => return (trace, value),
        }
    }
}

proptest! {
    #[test]
    fn prop_resume_loop_matches_run(steps in values()) {
        prop_assert_eq!(observe_by_resume(emit_all(steps.clone())), observe(emit_all(steps)));
    }

    #[test]
    fn prop_identity_host_matches_run(steps in values()) {
        let mut trace = Vec::new();
        let Identity(value) = emit_all(steps.clone()).run_in_host::<Identity<()>, _>(|step| {
            trace.push(step.value);
            Identity(step.next)
        });
        prop_assert_eq!((trace, value), observe(emit_all(steps)));
    }

    #[test]
    fn prop_sum_matches_emitted_values(steps in values()) {
        let expected = steps.iter().fold(0i32, |total, v| total.wrapping_add(*v));
        let (trace, value) = observe(emit_all(steps.clone()));
        prop_assert_eq!(trace, steps);
        prop_assert_eq!(value, expected);
    }
}
