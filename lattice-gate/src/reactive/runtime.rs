//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects sources with the
//! computations that read them. It owns the dependency edges and pushes
//! change notifications.
//!
//! # How It Works
//!
//! 1. When a memo, computed or effect is created, it registers with the
//!    runtime.
//!
//! 2. When a computation reads a source, the runtime records the edge.
//!
//! 3. When a source changes, the runtime:
//!    a. Finds all dependent computations
//!    b. Marks them dirty (memos are lazy and recompute on next read)
//!    c. Re-runs each eager computation (computed or effect) it reached,
//!       once, synchronously
//!
//! There is no batching. Every `set` propagates before it returns, unless
//! it is made from inside an eager computation that is being re-run: then
//! it is queued behind the current run.
//!
//! # Thread Safety
//!
//! The tracking context is thread-local. The registry is a process-wide
//! `DashMap` keyed by unique ids, so computations on different threads
//! never see each other's edges.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::trace;

use super::context::ReactiveContext;
use super::subscriber::{SourceId, SubscriberId};

/// A trait for computations that can be notified when dependencies change.
pub trait Reactive: Send + Sync {
    /// Get the subscriber ID for this computation.
    fn subscriber_id(&self) -> SubscriberId;

    /// Mark this computation as needing to re-run.
    fn mark_dirty(&self);

    /// Re-run this computation now (eager computations only).
    fn run(&self);

    /// Check if this computation is eager (computed/effect) or lazy (memo).
    fn is_eager(&self) -> bool;
}

type SubscriberList = SmallVec<[SubscriberId; 4]>;
type SourceList = SmallVec<[SourceId; 8]>;

/// The global reactive runtime.
///
/// This is a singleton that manages all reactive computations in the process.
pub struct Runtime;

// Maps subscriber IDs to weak references so the registry never keeps a
// computation alive.
static REGISTRY: OnceLock<DashMap<SubscriberId, Weak<dyn Reactive>>> = OnceLock::new();
// Edges are stored in both directions so a subscriber can drop its own
// edges without scanning every source.
static SOURCE_SUBSCRIBERS: OnceLock<DashMap<SourceId, SubscriberList>> = OnceLock::new();
static SUBSCRIBER_SOURCES: OnceLock<DashMap<SubscriberId, SourceList>> = OnceLock::new();

fn get_registry() -> &'static DashMap<SubscriberId, Weak<dyn Reactive>> {
    REGISTRY.get_or_init(DashMap::new)
}

fn get_source_subscribers() -> &'static DashMap<SourceId, SubscriberList> {
    SOURCE_SUBSCRIBERS.get_or_init(DashMap::new)
}

fn get_subscriber_sources() -> &'static DashMap<SubscriberId, SourceList> {
    SUBSCRIBER_SOURCES.get_or_init(DashMap::new)
}

/// Per-thread propagation state.
///
/// Eager computations reached while a change propagates are queued once and
/// run after every dirty flag is set, so a computation reachable along
/// several paths runs once per change.
#[derive(Default)]
struct Propagation {
    /// Nesting depth of `notify_source_change` calls that are still marking.
    depth: usize,
    /// Whether this thread is already draining the queue.
    flushing: bool,
    queue: IndexSet<SubscriberId>,
}

thread_local! {
    static PROPAGATION: RefCell<Propagation> = RefCell::new(Propagation::default());
}

struct MarkingGuard;

impl MarkingGuard {
    fn enter() -> Self {
        PROPAGATION.with(|p| p.borrow_mut().depth += 1);
        Self
    }
}

impl Drop for MarkingGuard {
    fn drop(&mut self) {
        PROPAGATION.with(|p| p.borrow_mut().depth -= 1);
    }
}

struct FlushGuard;

impl FlushGuard {
    /// Claims the queue for this call, unless marking is still in progress
    /// or an outer call is already draining it.
    fn try_enter() -> Option<Self> {
        PROPAGATION.with(|p| {
            let mut p = p.borrow_mut();
            if p.depth > 0 || p.flushing {
                None
            } else {
                p.flushing = true;
                Some(Self)
            }
        })
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        PROPAGATION.with(|p| {
            let mut p = p.borrow_mut();
            p.flushing = false;
            // Left over only when a computation panicked mid-flush.
            p.queue.clear();
        });
    }
}

impl Runtime {
    /// Register a computation with the runtime.
    ///
    /// The caller is responsible for calling [`Runtime::unregister`] when the
    /// computation is dropped or disposed.
    pub fn register<R>(reactive: &Arc<R>)
    where
        R: Reactive + 'static,
    {
        let weak: Weak<dyn Reactive> = Arc::downgrade(reactive) as Weak<dyn Reactive>;
        get_registry().insert(reactive.subscriber_id(), weak);
    }

    /// Unregister a computation and drop all of its edges.
    pub fn unregister(id: SubscriberId) {
        get_registry().remove(&id);
        Self::clear_dependencies(id);
    }

    /// Record that a subscriber depends on a source.
    ///
    /// Called automatically when a source is read within a reactive context.
    pub fn add_dependency(source_id: SourceId, subscriber_id: SubscriberId) {
        {
            let mut subscribers = get_source_subscribers().entry(source_id).or_default();
            if subscribers.contains(&subscriber_id) {
                return;
            }
            subscribers.push(subscriber_id);
        }

        get_subscriber_sources()
            .entry(subscriber_id)
            .or_default()
            .push(source_id);
    }

    /// Remove all dependencies for a subscriber.
    ///
    /// Called before re-running a computation to clear stale dependencies.
    pub fn clear_dependencies(subscriber_id: SubscriberId) {
        let Some((_, sources)) = get_subscriber_sources().remove(&subscriber_id) else {
            return;
        };

        for source_id in sources {
            if let Some(mut subscribers) = get_source_subscribers().get_mut(&source_id) {
                subscribers.retain(|s| *s != subscriber_id);
            }
        }
    }

    /// Record a read of `source_id` by the running computation, if any.
    pub fn track(source_id: SourceId) {
        if let Some(subscriber_id) = ReactiveContext::current_subscriber() {
            Self::add_dependency(source_id, subscriber_id);
        }
    }

    /// Number of subscribers currently depending on a source.
    pub fn subscriber_count(source_id: SourceId) -> usize {
        get_source_subscribers()
            .get(&source_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Forget a source that will never be read again.
    pub fn remove_source(source_id: SourceId) {
        let Some((_, subscribers)) = get_source_subscribers().remove(&source_id) else {
            return;
        };

        for subscriber_id in subscribers {
            if let Some(mut sources) = get_subscriber_sources().get_mut(&subscriber_id) {
                sources.retain(|s| *s != source_id);
            }
        }
    }

    /// Notify all subscribers that a source changed.
    ///
    /// Every dependent is marked dirty first (memos pass the change on to
    /// their own readers), then the eager computations reached run once
    /// each, in the order they were reached. A change made while this
    /// thread is already running eager computations is queued behind them.
    pub fn notify_source_change(source_id: SourceId) {
        let subscriber_ids: SubscriberList = match get_source_subscribers().get(&source_id) {
            Some(subs) => subs.clone(),
            None => return,
        };

        if subscriber_ids.is_empty() {
            return;
        }

        trace!(source = ?source_id, subscribers = subscriber_ids.len(), "source changed");

        // Upgrade first so no map guard is held while user code runs.
        let reactives: Vec<Arc<dyn Reactive>> = subscriber_ids
            .iter()
            .filter_map(|id| get_registry().get(id).and_then(|weak| weak.upgrade()))
            .collect();

        {
            let _marking = MarkingGuard::enter();
            for reactive in reactives {
                reactive.mark_dirty();
                if reactive.is_eager() {
                    PROPAGATION.with(|p| p.borrow_mut().queue.insert(reactive.subscriber_id()));
                }
            }
        }

        Self::flush();
    }

    fn flush() {
        let Some(_flushing) = FlushGuard::try_enter() else {
            return;
        };

        while let Some(id) = PROPAGATION.with(|p| p.borrow_mut().queue.shift_remove_index(0)) {
            let reactive = get_registry().get(&id).and_then(|weak| weak.upgrade());
            if let Some(reactive) = reactive {
                reactive.run();
            }
        }
    }
}

/// Holds a computation's "running" flag and clears it on drop, including
/// while unwinding out of a panicking computation.
pub(crate) struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    /// Returns `None` if the flag was already set.
    pub(crate) fn try_enter(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
