//! # search-box
//!
//! Reactive fuzzy-search input widget with list locking and caching.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The widget owns exactly one piece of transient UI state (the search text)
//! and mediates exactly one caller-owned list between two modes: free editing
//! and locked searching. Every interaction flows through a single explicit
//! state-transition step:
//!
//! ```text
//! change event → lock machine step → lock effects → pipeline (if locked) → dispatch
//! ```
//!
//! While the lock is held the widget is the sole source of truth for the
//! displayed list: every search-text change re-ranks the full base list and
//! dispatches the result. When the search ends (text cleared, or the
//! force-release signal fires) the caller's list is restored — either the
//! snapshot taken at lock-acquire time (cache mode) or the unfiltered base
//! list.
//!
//! ## Modules
//!
//! - [`event_signal`] - Monotonic counter used as a cross-component trigger
//! - [`lock`] - Lock/cache state machine (`(event, state) -> effects`)
//! - [`rank`] - Ranking collaborator contract and the default tiered ranker
//! - [`pipeline`] - Pre-process → rank → post-process search pipeline
//! - [`widget`] - Outward-facing widget: props, validation, reactive wiring
//! - [`types`] - Callback aliases, list props, configuration errors

pub mod event_signal;
pub mod lock;
pub mod pipeline;
pub mod rank;
pub mod types;
pub mod widget;

// Re-export commonly used items
pub use event_signal::EventSignal;
pub use lock::{LockEffect, LockMachine, RestoreList, SearchEvent};
pub use pipeline::{PostProcess, PreProcess, Transform};
pub use rank::{KeyLookup, Ranker, TieredRanker};
pub use types::{ConfigurationError, DispatchCallback, ListProp, LockChangeCallback};
pub use widget::{
    search_box, ListInfo, LockBehavior, SearchBox, SearchBoxProps, SortBehavior,
    SEARCH_BAR_TEST_ID,
};
