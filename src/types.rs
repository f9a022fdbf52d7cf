//! Shared types - Callbacks, list props, and configuration errors.
//!
//! Callback aliases use `Rc<dyn Fn>` so they can be cloned into closures
//! without ownership issues. This is the standard pattern for event callbacks
//! when callbacks need to be captured in closures.

use std::rc::Rc;

use spark_signals::Signal;
use thiserror::Error;

// =============================================================================
// Callback Types
// =============================================================================

/// List dispatch callback.
///
/// Invoked with the sequence the caller should display. Called on lock
/// release and on every locked search-text change.
pub type DispatchCallback<T> = Rc<dyn Fn(Vec<T>)>;

/// Lock change observer callback (`true` means a search is in progress).
pub type LockChangeCallback = Rc<dyn Fn(bool)>;

// =============================================================================
// List Prop - Reactive list source
// =============================================================================

/// A caller-supplied list that can be static, a signal, or a getter.
///
/// The widget only ever *reads* the list — at lock-acquire time for the
/// working list, and at each pipeline evaluation for the base list. It never
/// subscribes to it: a change to the underlying list does not by itself
/// trigger any widget behavior.
#[derive(Clone)]
pub enum ListProp<T: Clone + PartialEq + 'static> {
    /// Static list (not reactive).
    Static(Vec<T>),
    /// Signal-backed list.
    Signal(Signal<Vec<T>>),
    /// Getter function (called each time the list is needed).
    Getter(Rc<dyn Fn() -> Vec<T>>),
}

impl<T: Clone + PartialEq + 'static> ListProp<T> {
    /// Read the current list contents.
    pub fn get(&self) -> Vec<T> {
        match self {
            ListProp::Static(v) => v.clone(),
            ListProp::Signal(s) => s.get(),
            ListProp::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Default for ListProp<T> {
    fn default() -> Self {
        ListProp::Static(Vec::new())
    }
}

impl<T: Clone + PartialEq + 'static> From<Vec<T>> for ListProp<T> {
    fn from(list: Vec<T>) -> Self {
        ListProp::Static(list)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<Vec<T>>> for ListProp<T> {
    fn from(signal: Signal<Vec<T>>) -> Self {
        ListProp::Signal(signal)
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Contract violations detected once, at widget construction.
///
/// No operation in this crate performs I/O; misconfiguration is the only
/// failure mode, and it is reported before any state is wired up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `pre_process` and `post_process` must be supplied together or not at
    /// all — one without the other would leak enrichment fields into the
    /// restored list (or rank against fields that were never added).
    #[error("pre_process and post_process must be supplied together")]
    UnpairedTransform,

    /// Ranking against zero keys would silently match nothing.
    #[error("sort_behavior.keys must name at least one searchable key")]
    EmptyKeys,
}

// =============================================================================
// Tests
// =============================================================================
