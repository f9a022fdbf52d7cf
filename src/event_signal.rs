//! Event Signal - Monotonic counter used as a cross-component trigger.
//!
//! Holds an integer counter and an emit operation that increments it.
//! Consumers compare successive observed values; any change (not the delta)
//! means "event occurred". The numeric content carries no meaning.
//!
//! Used to implement `force_release_lock`: the caller keeps a handle, the
//! widget watches the counter, and every `emit()` ends the current search.
//!
//! # Example
//!
//! ```ignore
//! use search_box::EventSignal;
//!
//! let release = EventSignal::new();
//!
//! // Hand a clone to the widget via LockBehavior::force_release_lock,
//! // then trigger it whenever the search should end early:
//! release.emit();
//! ```

use spark_signals::{signal, Signal};

/// A cloneable trigger handle. Clones share the same underlying counter.
#[derive(Clone)]
pub struct EventSignal {
    counter: Signal<u64>,
}

impl EventSignal {
    /// Create a new signal with the counter at zero (never fired).
    pub fn new() -> Self {
        Self { counter: signal(0) }
    }

    /// Fire the signal by incrementing the counter.
    pub fn emit(&self) {
        let next = self.counter.get().wrapping_add(1);
        self.counter.set(next);
    }

    /// Current counter value.
    ///
    /// Reading this inside a reactive effect establishes a dependency, so the
    /// effect re-runs on every `emit()`.
    pub fn value(&self) -> u64 {
        self.counter.get()
    }
}

impl Default for EventSignal {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::effect;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_starts_at_zero() {
        let sig = EventSignal::new();
        assert_eq!(sig.value(), 0);
    }

    #[test]
    fn test_emit_increments() {
        let sig = EventSignal::new();
        sig.emit();
        assert_eq!(sig.value(), 1);
        sig.emit();
        sig.emit();
        assert_eq!(sig.value(), 3);
    }

    #[test]
    fn test_clones_share_counter() {
        let sig = EventSignal::new();
        let clone = sig.clone();

        clone.emit();
        assert_eq!(sig.value(), 1);
        sig.emit();
        assert_eq!(clone.value(), 2);
    }

    #[test]
    fn test_emit_notifies_effects() {
        let sig = EventSignal::new();
        let observed = Rc::new(Cell::new(0u64));

        let observed_clone = observed.clone();
        let watched = sig.clone();
        let _stop = effect(move || {
            observed_clone.set(watched.value());
        });

        assert_eq!(observed.get(), 0);
        sig.emit();
        assert_eq!(observed.get(), 1);
        sig.emit();
        assert_eq!(observed.get(), 2);
    }
}
