//! Lock/Cache Machine - Search-lock acquisition, release, and list caching.
//!
//! The machine decides when a search session begins and ends, and what list
//! the caller gets back when it ends. It is a single explicit transition
//! function `(event, state) -> effects`, evaluated synchronously, so there is
//! no ordering ambiguity between the text-driven transition, the pipeline,
//! and the force-release trigger: one `step` call processes one event, and
//! everything downstream observes the post-transition state.
//!
//! # State
//!
//! - `search_text` / `previous_search_text` - edge detection is driven by the
//!   pair, tracked explicitly as part of the state record
//! - `locked` - true iff a search is in progress
//! - `cached_list` - snapshot of the caller's working list, written exactly
//!   once per acquire (cache mode only) and consumed exactly once per release
//!
//! # Transitions
//!
//! | previous | current | lock | action |
//! |----------|-----------|-------|---------|
//! | `""` | non-empty | false | acquire: snapshot working list (cache mode), lock, notify |
//! | non-empty | `""` | true | release: restore list, clear text, unlock, notify |
//! | anything else | | | no lock action |
//!
//! A `ForceRelease` event runs the release path unconditionally, regardless
//! of lock state or text. Releasing while already unlocked is benign: the
//! restore list is still produced, but the duplicate unlock notification is
//! suppressed.
//!
//! # Effects
//!
//! `step` returns the side effects for the caller to perform, in order. Only
//! release produces a list restore; acquire only snapshots and flips the
//! lock — the ranked dispatch for the first typed character is the search
//! pipeline's job, run against the post-transition lock state.

use std::mem;

use log::debug;

// =============================================================================
// Events and Effects
// =============================================================================

/// An input to the machine. One event per UI update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The search input's text changed to this value.
    TextChanged(String),
    /// The force-release trigger fired: end the search session now.
    ForceRelease,
}

/// Which list the caller should be restored to on release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreList<T> {
    /// The snapshot taken at lock-acquire time (cache mode).
    Cached(Vec<T>),
    /// The caller's full base list (no cache mode, or no snapshot held).
    FullBase,
}

/// A side effect for the caller to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockEffect<T> {
    /// The lock flag changed; forward to the lock-change observer.
    LockChanged(bool),
    /// Dispatch the named list to the caller.
    Restore(RestoreList<T>),
}

// =============================================================================
// Machine
// =============================================================================

/// The lock/cache state machine. One per widget instance.
pub struct LockMachine<T> {
    cache_mode: bool,
    search_text: String,
    previous_search_text: String,
    locked: bool,
    cached_list: Option<Vec<T>>,
}

impl<T: Clone> LockMachine<T> {
    /// Create an unlocked machine with empty search text.
    pub fn new(cache_mode: bool) -> Self {
        Self {
            cache_mode,
            search_text: String::new(),
            previous_search_text: String::new(),
            locked: false,
            cached_list: None,
        }
    }

    /// Current search text.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Search text as of the previous update.
    pub fn previous_search_text(&self) -> &str {
        &self.previous_search_text
    }

    /// True iff a search session is active.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether a working-list snapshot is currently held.
    pub fn has_snapshot(&self) -> bool {
        self.cached_list.is_some()
    }

    /// Process one event and return the side effects to perform, in order.
    ///
    /// `working_list` is only invoked on acquire, and only in cache mode —
    /// the single point where the caller's working list is read.
    pub fn step(
        &mut self,
        event: SearchEvent,
        working_list: impl FnOnce() -> Vec<T>,
    ) -> Vec<LockEffect<T>> {
        match event {
            SearchEvent::TextChanged(text) => {
                let previous = mem::replace(&mut self.search_text, text);
                self.previous_search_text = previous;

                let was_empty = self.previous_search_text.is_empty();
                let is_empty = self.search_text.is_empty();

                if was_empty && !is_empty && !self.locked {
                    self.acquire(working_list)
                } else if !was_empty && is_empty && self.locked {
                    self.release()
                } else {
                    // Non-empty to different non-empty (or empty to empty):
                    // no lock action.
                    Vec::new()
                }
            }
            SearchEvent::ForceRelease => {
                self.previous_search_text = mem::take(&mut self.search_text);
                self.release()
            }
        }
    }

    /// Acquire the lock: snapshot the working list (cache mode) and flip the
    /// flag. Produces no list dispatch.
    fn acquire(&mut self, working_list: impl FnOnce() -> Vec<T>) -> Vec<LockEffect<T>> {
        if self.cache_mode {
            let snapshot = working_list();
            debug!(
                "search lock acquired, cached {} working items",
                snapshot.len()
            );
            self.cached_list = Some(snapshot);
        } else {
            debug!("search lock acquired");
        }

        self.locked = true;
        vec![LockEffect::LockChanged(true)]
    }

    /// Release the lock: restore the caller's list, clear the text, unlock.
    ///
    /// Safe to run while already unlocked (forced release): the restore still
    /// happens, the duplicate unlock notification does not.
    fn release(&mut self) -> Vec<LockEffect<T>> {
        let restore = match self.cached_list.take() {
            Some(snapshot) if self.cache_mode => RestoreList::Cached(snapshot),
            _ => RestoreList::FullBase,
        };

        self.search_text.clear();

        let was_locked = self.locked;
        self.locked = false;
        debug!(
            "search lock released (was_locked: {}, cache_mode: {})",
            was_locked, self.cache_mode
        );

        let mut effects = vec![LockEffect::Restore(restore)];
        if was_locked {
            effects.push(LockEffect::LockChanged(false));
        }
        effects
    }
}

// =============================================================================
// Tests
// =============================================================================
