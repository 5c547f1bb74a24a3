//! FIFO queue of the type-erased continuations of one composition.
//!
//! A composition `m.flat_map(f).flat_map(g)...` is stored as its head
//! computation plus the continuations still to run, in order. Extending it
//! pushes onto the back in O(1); the normalizer pops from the front.
//!
//! # Invariants
//!
//! - **FIFO Order**: continuations run in the order they were attached.
//! - **Flat Ownership**: a continuation never owns the one before it, so
//!   dropping an abandoned composition releases one continuation at a time,
//!   in constant stack, however long it is.

use std::collections::VecDeque;

use super::free::{Erased, Free};
use crate::typeclass::TypeConstructor;

/// A continuation from an erased intermediate value to the next erased
/// computation.
pub(crate) type Arrow<F> = Box<dyn FnOnce(Erased) -> Free<F, Erased>>;

/// Continuations waiting on the head of a composition.
///
/// This type does NOT implement `Clone`: every continuation runs at most
/// once.
pub(crate) struct ContinuationQueue<F: TypeConstructor> {
    arrows: VecDeque<Arrow<F>>,
}

impl<F: TypeConstructor> ContinuationQueue<F> {
    /// Creates an empty queue.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            arrows: VecDeque::new(),
        }
    }

    /// Adds a continuation after every queued one.
    #[inline]
    pub(crate) fn push(&mut self, arrow: Arrow<F>) {
        self.arrows.push_back(arrow);
    }

    /// Removes the next continuation to run.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Arrow<F>> {
        self.arrows.pop_front()
    }

    /// Puts every continuation of `front` ahead of this queue's.
    ///
    /// Only the shorter of the two queues is moved.
    pub(crate) fn prepend(&mut self, mut front: Self) {
        if front.arrows.len() >= self.arrows.len() {
            front.arrows.append(&mut self.arrows);
            self.arrows = front.arrows;
        } else {
            while let Some(arrow) = front.arrows.pop_back() {
                self.arrows.push_front(arrow);
            }
        }
    }
}
