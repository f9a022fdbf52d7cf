//! Search Box Widget - Props, validation, and reactive wiring.
//!
//! The outward-facing contract: a single search input whose text drives the
//! lock machine and the search pipeline. The widget owns the search text (a
//! `Signal<String>`, empty at mount) and nothing else — the candidate lists
//! stay caller-owned and are only ever read, never subscribed to.
//!
//! # Event flow
//!
//! Every input-change event enters through [`SearchBox::set_text`] (or the
//! handler from [`SearchBox::change_handler`]): the value signal is updated,
//! the lock machine steps once, its effects run in order, and then — against
//! the post-transition lock state, within the same logical update — the
//! pipeline re-ranks and dispatches. A single step function serves the text
//! path and the force-release path, so the two can never observe an
//! inconsistent (text, lock) pair.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use search_box::{search_box, SearchBoxProps, SortBehavior, LockBehavior, ListInfo};
//!
//! let widget = search_box(SearchBoxProps {
//!     dispatch_new_list: Rc::new(|list| display(list)),
//!     sort_behavior: SortBehavior::new(vec!["name".into()]),
//!     lock_behavior: LockBehavior {
//!         cache_mode: true,
//!         ..Default::default()
//!     },
//!     info: ListInfo {
//!         full_base_list: everyone.into(),
//!         curr_working_list: visible.into(),
//!     },
//!     id: None,
//!     placeholder: None,
//! })?;
//!
//! widget.set_text("ali");   // acquires the lock, dispatches ranked results
//! widget.set_text("");      // releases, restores the cached working list
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use spark_signals::{effect, signal, Signal};

use crate::event_signal::EventSignal;
use crate::lock::{LockEffect, LockMachine, RestoreList, SearchEvent};
use crate::pipeline::{self, PostProcess, PreProcess, Transform};
use crate::rank::{KeyLookup, Ranker, TieredRanker};
use crate::types::{ConfigurationError, DispatchCallback, ListProp, LockChangeCallback};

/// Stable identifier for the rendered input control, for UI test harnesses.
pub const SEARCH_BAR_TEST_ID: &str = "search-bar-test-id";

/// Default placeholder shown while the input is empty.
const DEFAULT_PLACEHOLDER: &str = "Search";

// =============================================================================
// Props
// =============================================================================

/// Sorting behavior: which keys to rank against, and how to enrich items.
pub struct SortBehavior<T, K = T> {
    /// Field names to rank against. Must name at least one key.
    pub keys: Vec<String>,
    /// Optional: enrich items with extra searchable fields before ranking.
    /// Must be paired with `post_process`.
    pub pre_process: Option<PreProcess<T, K>>,
    /// Optional: strip enrichment fields after ranking.
    /// Must be paired with `pre_process`.
    pub post_process: Option<PostProcess<T, K>>,
    /// Ranking collaborator override. Defaults to [`TieredRanker`].
    pub ranker: Option<Rc<dyn Ranker>>,
}

impl<T, K> SortBehavior<T, K> {
    /// Rank against the given keys with no enrichment and the default ranker.
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            pre_process: None,
            post_process: None,
            ranker: None,
        }
    }
}

/// Lock and cache behavior.
pub struct LockBehavior {
    /// Snapshot the working list at lock-acquire and restore that exact
    /// snapshot at release. Without it, release restores the full base list.
    pub cache_mode: bool,
    /// Observer invoked on every lock transition (`true` means locked).
    pub notify_lock_change: Option<LockChangeCallback>,
    /// Externally-owned trigger that force-releases the lock when emitted.
    pub force_release_lock: Option<EventSignal>,
}

impl Default for LockBehavior {
    fn default() -> Self {
        Self {
            cache_mode: false,
            notify_lock_change: None,
            force_release_lock: None,
        }
    }
}

/// The caller-owned lists the search operates on.
pub struct ListInfo<T: Clone + PartialEq + 'static> {
    /// Full candidate pool. Read at each pipeline evaluation; never mutated.
    pub full_base_list: ListProp<T>,
    /// The caller's currently displayed subset. Read once, at acquire time,
    /// and only in cache mode.
    pub curr_working_list: ListProp<T>,
}

/// Widget construction parameters.
pub struct SearchBoxProps<T: Clone + PartialEq + 'static, K = T> {
    /// Callback invoked with the sequence the caller should display.
    pub dispatch_new_list: DispatchCallback<T>,
    /// Sorting behavior.
    pub sort_behavior: SortBehavior<T, K>,
    /// Lock and cache behavior.
    pub lock_behavior: LockBehavior,
    /// The caller-owned lists.
    pub info: ListInfo<T>,
    /// Element identifier. Defaults to [`SEARCH_BAR_TEST_ID`].
    pub id: Option<String>,
    /// Placeholder text. Defaults to `"Search"`.
    pub placeholder: Option<String>,
}

// =============================================================================
// Internal wiring
// =============================================================================

/// Validated, immutable configuration shared by the event paths.
struct Config<T: Clone + PartialEq + 'static, K> {
    dispatch: DispatchCallback<T>,
    notify_lock_change: Option<LockChangeCallback>,
    keys: Vec<String>,
    ranker: Rc<dyn Ranker>,
    transform: Transform<T, K>,
    full_base_list: ListProp<T>,
    curr_working_list: ListProp<T>,
}

/// Process one event: step the machine, apply its effects in order, then run
/// the pipeline against the post-transition lock state.
fn step<T, K>(
    machine: &Rc<RefCell<LockMachine<T>>>,
    config: &Rc<Config<T, K>>,
    value: &Signal<String>,
    event: SearchEvent,
) where
    T: KeyLookup + Clone + PartialEq + 'static,
    K: KeyLookup + 'static,
{
    // Borrow scope: callbacks below may re-enter through set_text
    let (effects, text, locked) = {
        let mut machine = machine.borrow_mut();
        let effects = machine.step(event, || config.curr_working_list.get());
        (effects, machine.search_text().to_string(), machine.is_locked())
    };

    // Keep the displayed value in sync (release clears the input)
    value.set(text.clone());

    for lock_effect in effects {
        match lock_effect {
            LockEffect::LockChanged(is_locked) => {
                debug!("notify lock change: {}", is_locked);
                if let Some(notify) = &config.notify_lock_change {
                    notify(is_locked);
                }
            }
            LockEffect::Restore(RestoreList::Cached(snapshot)) => {
                (config.dispatch)(snapshot);
            }
            LockEffect::Restore(RestoreList::FullBase) => {
                (config.dispatch)(config.full_base_list.get());
            }
        }
    }

    if locked {
        let ranked = pipeline::run(
            &text,
            &config.keys,
            config.ranker.as_ref(),
            &config.transform,
            config.full_base_list.get(),
        );
        (config.dispatch)(ranked);
    }
}

// =============================================================================
// Search Box
// =============================================================================

/// A mounted search box instance.
///
/// Holds the widget-owned search text and the force-release subscription.
/// State lives for the instance's lifetime and is discarded on
/// [`unmount`](SearchBox::unmount) or drop.
pub struct SearchBox<T: Clone + PartialEq + 'static, K = T> {
    value: Signal<String>,
    id: String,
    placeholder: String,
    machine: Rc<RefCell<LockMachine<T>>>,
    config: Rc<Config<T, K>>,
    stop_force_release: Option<Box<dyn FnOnce()>>,
}

/// Create a search box from the given props.
///
/// Configuration is checked once, here: an unpaired pre/post transform or an
/// empty key set fails fast with a [`ConfigurationError`] before any state is
/// wired up.
pub fn search_box<T, K>(
    props: SearchBoxProps<T, K>,
) -> Result<SearchBox<T, K>, ConfigurationError>
where
    T: KeyLookup + Clone + PartialEq + 'static,
    K: KeyLookup + 'static,
{
    let SearchBoxProps {
        dispatch_new_list,
        sort_behavior,
        lock_behavior,
        info,
        id,
        placeholder,
    } = props;

    if sort_behavior.keys.is_empty() {
        return Err(ConfigurationError::EmptyKeys);
    }
    let transform = Transform::pair(sort_behavior.pre_process, sort_behavior.post_process)?;

    let config = Rc::new(Config {
        dispatch: dispatch_new_list,
        notify_lock_change: lock_behavior.notify_lock_change,
        keys: sort_behavior.keys,
        ranker: sort_behavior
            .ranker
            .unwrap_or_else(|| Rc::new(TieredRanker)),
        transform,
        full_base_list: info.full_base_list,
        curr_working_list: info.curr_working_list,
    });

    let machine = Rc::new(RefCell::new(LockMachine::new(lock_behavior.cache_mode)));
    let value = signal(String::new());

    // Watch the force-release counter. Only the counter is a tracked read —
    // the list props are read inside step(), outside any effect. The first
    // observed non-zero value also releases, matching a trigger that fired
    // before the widget mounted.
    let stop_force_release = lock_behavior.force_release_lock.map(|trigger| {
        let machine = machine.clone();
        let config = config.clone();
        let value = value.clone();
        let mut last_seen: Option<u64> = None;

        let stop = effect(move || {
            let seen = trigger.value();
            let fired = match last_seen {
                None => seen != 0,
                Some(previous) => seen != previous,
            };
            last_seen = Some(seen);

            if fired {
                step(&machine, &config, &value, SearchEvent::ForceRelease);
            }
        });
        Box::new(stop) as Box<dyn FnOnce()>
    });

    Ok(SearchBox {
        value,
        id: id.unwrap_or_else(|| SEARCH_BAR_TEST_ID.to_string()),
        placeholder: placeholder.unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        machine,
        config,
        stop_force_release,
    })
}

impl<T, K> SearchBox<T, K>
where
    T: KeyLookup + Clone + PartialEq + 'static,
    K: KeyLookup + 'static,
{
    /// The input-change entry point: update the search text and run one
    /// synchronous update (lock transition, then pipeline).
    pub fn set_text(&self, text: impl Into<String>) {
        step(
            &self.machine,
            &self.config,
            &self.value,
            SearchEvent::TextChanged(text.into()),
        );
    }

    /// Clear the input. Equivalent to the user deleting all text.
    pub fn clear(&self) {
        self.set_text("");
    }

    /// Change handler for wiring into an input component's `on_change`.
    pub fn change_handler(&self) -> Rc<dyn Fn(&str)> {
        let machine = self.machine.clone();
        let config = self.config.clone();
        let value = self.value.clone();
        Rc::new(move |text: &str| {
            step(
                &machine,
                &config,
                &value,
                SearchEvent::TextChanged(text.to_string()),
            );
        })
    }

    /// Current search text.
    pub fn text(&self) -> String {
        self.value.get()
    }

    /// The search-text signal, for binding the rendered input's display.
    pub fn value_signal(&self) -> Signal<String> {
        self.value.clone()
    }

    /// True iff a search session is active.
    pub fn is_locked(&self) -> bool {
        self.machine.borrow().is_locked()
    }

    /// Element identifier of the rendered input.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Placeholder text of the rendered input.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Unmount: stop the force-release subscription and discard state.
    pub fn unmount(mut self) {
        if let Some(stop) = self.stop_force_release.take() {
            stop();
        }
    }
}

impl<T: Clone + PartialEq + 'static, K> Drop for SearchBox<T, K> {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_force_release.take() {
            stop();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: u32,
        name: String,
    }

    impl Person {
        fn new(id: u32, name: &str) -> Self {
            Self {
                id,
                name: name.to_string(),
            }
        }
    }

    impl KeyLookup for Person {
        fn key_value(&self, key: &str) -> Option<Cow<'_, str>> {
            match key {
                "name" => Some(Cow::Borrowed(&self.name)),
                _ => None,
            }
        }
    }

    /// Records every dispatched list and lock notification.
    #[derive(Default)]
    struct Recorder {
        dispatches: RefCell<Vec<Vec<Person>>>,
        lock_changes: RefCell<Vec<bool>>,
    }

    impl Recorder {
        fn dispatch_callback(self: &Rc<Self>) -> DispatchCallback<Person> {
            let recorder = self.clone();
            Rc::new(move |list| recorder.dispatches.borrow_mut().push(list))
        }

        fn lock_callback(self: &Rc<Self>) -> LockChangeCallback {
            let recorder = self.clone();
            Rc::new(move |locked| recorder.lock_changes.borrow_mut().push(locked))
        }

        fn dispatch_count(&self) -> usize {
            self.dispatches.borrow().len()
        }

        fn last_dispatch(&self) -> Vec<Person> {
            self.dispatches.borrow().last().cloned().unwrap()
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person::new(0, "Alice Anderson"),
            Person::new(1, "Bob Brown"),
            Person::new(2, "Carol Chen"),
            Person::new(3, "Dave Davis"),
        ]
    }

    fn build(
        recorder: &Rc<Recorder>,
        cache_mode: bool,
        working: Vec<Person>,
        force_release: Option<EventSignal>,
    ) -> SearchBox<Person> {
        search_box(SearchBoxProps {
            dispatch_new_list: recorder.dispatch_callback(),
            sort_behavior: SortBehavior::new(vec!["name".to_string()]),
            lock_behavior: LockBehavior {
                cache_mode,
                notify_lock_change: Some(recorder.lock_callback()),
                force_release_lock: force_release,
            },
            info: ListInfo {
                full_base_list: people().into(),
                curr_working_list: working.into(),
            },
            id: None,
            placeholder: None,
        })
        .unwrap()
    }

    #[test]
    fn test_rendered_surface_defaults() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, false, vec![], None);

        assert_eq!(widget.id(), SEARCH_BAR_TEST_ID);
        assert_eq!(widget.placeholder(), "Search");
        assert_eq!(widget.text(), "");
    }

    #[test]
    fn test_idle_invariant() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, true, vec![], None);

        // Empty-to-empty interactions never dispatch or notify
        widget.set_text("");
        widget.set_text("");
        widget.clear();

        assert_eq!(recorder.dispatch_count(), 0);
        assert!(recorder.lock_changes.borrow().is_empty());
        assert!(!widget.is_locked());
    }

    #[test]
    fn test_acquire_on_first_character() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, false, vec![], None);

        widget.set_text("a");

        assert!(widget.is_locked());
        assert_eq!(*recorder.lock_changes.borrow(), vec![true]);
        // Acquire itself does not dispatch; the pipeline does, once
        assert_eq!(recorder.dispatch_count(), 1);
        assert_eq!(recorder.last_dispatch().len(), people().len());
    }

    #[test]
    fn test_locked_text_changes_redispatch() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, false, vec![], None);

        widget.set_text("a");
        widget.set_text("al");
        widget.set_text("ali");

        // One ranked dispatch per text change, one lock notification total
        assert_eq!(recorder.dispatch_count(), 3);
        assert_eq!(*recorder.lock_changes.borrow(), vec![true]);
        assert_eq!(recorder.last_dispatch()[0].name, "Alice Anderson");
    }

    #[test]
    fn test_release_on_clear_without_cache_restores_full_base() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, false, vec![people()[1].clone()], None);

        widget.set_text("dave");
        widget.clear();

        assert!(!widget.is_locked());
        assert_eq!(*recorder.lock_changes.borrow(), vec![true, false]);
        assert_eq!(recorder.last_dispatch(), people());
        assert_eq!(widget.text(), "");
    }

    #[test]
    fn test_release_on_clear_with_cache_restores_snapshot() {
        let recorder = Rc::new(Recorder::default());
        let working = vec![people()[2].clone(), people()[0].clone()];
        let widget = build(&recorder, true, working.clone(), None);

        widget.set_text("dave");
        widget.clear();

        assert_eq!(recorder.last_dispatch(), working);
        assert_eq!(*recorder.lock_changes.borrow(), vec![true, false]);
    }

    #[test]
    fn test_working_list_read_once_at_acquire() {
        let recorder = Rc::new(Recorder::default());
        let reads = Rc::new(RefCell::new(0));

        let reads_clone = reads.clone();
        let working = ListProp::Getter(Rc::new(move || {
            *reads_clone.borrow_mut() += 1;
            vec![Person::new(9, "Snapshot")]
        }));

        let widget = search_box(SearchBoxProps {
            dispatch_new_list: recorder.dispatch_callback(),
            sort_behavior: SortBehavior::<Person>::new(vec!["name".to_string()]),
            lock_behavior: LockBehavior {
                cache_mode: true,
                ..Default::default()
            },
            info: ListInfo {
                full_base_list: people().into(),
                curr_working_list: working,
            },
            id: None,
            placeholder: None,
        })
        .unwrap();

        widget.set_text("a");
        widget.set_text("ab");
        widget.set_text("abc");
        assert_eq!(*reads.borrow(), 1);

        widget.clear();
        assert_eq!(*reads.borrow(), 1);
        assert_eq!(recorder.last_dispatch(), vec![Person::new(9, "Snapshot")]);
    }

    #[test]
    fn test_force_release_ends_search() {
        let recorder = Rc::new(Recorder::default());
        let trigger = EventSignal::new();
        let working = vec![people()[3].clone()];
        let widget = build(&recorder, true, working.clone(), Some(trigger.clone()));

        widget.set_text("carol");
        assert!(widget.is_locked());

        trigger.emit();

        assert!(!widget.is_locked());
        assert_eq!(widget.text(), "");
        assert_eq!(recorder.last_dispatch(), working);
        assert_eq!(*recorder.lock_changes.borrow(), vec![true, false]);
    }

    #[test]
    fn test_force_release_idempotence() {
        let recorder = Rc::new(Recorder::default());
        let trigger = EventSignal::new();
        let widget = build(&recorder, true, vec![], Some(trigger.clone()));

        widget.set_text("bob");
        trigger.emit();
        trigger.emit();

        // One meaningful unlock; the second emit is a benign no-op release
        assert_eq!(*recorder.lock_changes.borrow(), vec![true, false]);
        assert!(!widget.is_locked());
    }

    #[test]
    fn test_force_release_while_unlocked_never_notifies() {
        let recorder = Rc::new(Recorder::default());
        let trigger = EventSignal::new();
        let _widget = build(&recorder, false, vec![], Some(trigger.clone()));

        trigger.emit();
        trigger.emit();

        assert!(recorder.lock_changes.borrow().is_empty());
        // The no-op releases still restore the base list
        assert_eq!(recorder.dispatch_count(), 2);
        assert_eq!(recorder.last_dispatch(), people());
    }

    #[test]
    fn test_pre_fired_trigger_releases_at_mount() {
        let recorder = Rc::new(Recorder::default());
        let trigger = EventSignal::new();
        trigger.emit();

        let _widget = build(&recorder, false, vec![], Some(trigger));

        // First observed non-zero value counts as a change
        assert_eq!(recorder.dispatch_count(), 1);
        assert!(recorder.lock_changes.borrow().is_empty());
    }

    #[test]
    fn test_unmount_stops_force_release_subscription() {
        let recorder = Rc::new(Recorder::default());
        let trigger = EventSignal::new();
        let widget = build(&recorder, false, vec![], Some(trigger.clone()));

        widget.unmount();
        trigger.emit();

        assert_eq!(recorder.dispatch_count(), 0);
    }

    #[test]
    fn test_change_handler_feeds_the_same_machine() {
        let recorder = Rc::new(Recorder::default());
        let widget = build(&recorder, false, vec![], None);

        let on_change = widget.change_handler();
        on_change("alice");

        assert!(widget.is_locked());
        assert_eq!(widget.text(), "alice");
        assert_eq!(recorder.last_dispatch()[0].name, "Alice Anderson");
    }

    #[test]
    fn test_empty_keys_rejected() {
        let recorder = Rc::new(Recorder::default());
        let result: Result<SearchBox<Person>, _> = search_box(SearchBoxProps {
            dispatch_new_list: recorder.dispatch_callback(),
            sort_behavior: SortBehavior::new(Vec::new()),
            lock_behavior: LockBehavior::default(),
            info: ListInfo {
                full_base_list: people().into(),
                curr_working_list: ListProp::default(),
            },
            id: None,
            placeholder: None,
        });

        assert!(matches!(result, Err(ConfigurationError::EmptyKeys)));
    }

    #[test]
    fn test_unpaired_transform_rejected() {
        let recorder = Rc::new(Recorder::default());
        let mut sort_behavior: SortBehavior<Person> =
            SortBehavior::new(vec!["name".to_string()]);
        sort_behavior.pre_process = Some(Rc::new(|list: &[Person]| list.to_vec()));

        let result = search_box(SearchBoxProps {
            dispatch_new_list: recorder.dispatch_callback(),
            sort_behavior,
            lock_behavior: LockBehavior::default(),
            info: ListInfo {
                full_base_list: people().into(),
                curr_working_list: ListProp::default(),
            },
            id: None,
            placeholder: None,
        });

        assert!(matches!(
            result,
            Err(ConfigurationError::UnpairedTransform)
        ));
    }
}
