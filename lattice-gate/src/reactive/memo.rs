//! Memo Implementation
//!
//! A Memo is a cached derived value that re-evaluates only when its
//! dependencies change.
//!
//! # How Memos Work
//!
//! 1. On first access, the memo runs its computation and caches the result.
//!
//! 2. When accessed again, if no dependency has changed, returns the cache.
//!
//! 3. When a dependency changes, the memo is marked dirty and its own
//!    dependents are notified, so an effect reading the memo re-runs and
//!    pulls the fresh value.
//!
//! 4. On next access, the memo recomputes.
//!
//! # Previous Value
//!
//! The computation receives the memo's previous result. The first run sees
//! the `initial` option (or `None`). The slot is written only after a run
//! completes, so a panicking computation leaves the last good value in place
//! and the memo stays dirty.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::context::ReactiveContext;
use super::error::{ReactiveError, Result};
use super::options::ComputationOptions;
use super::runtime::{Reactive, Runtime};
use super::subscriber::{SourceId, SubscriberId};

/// Dirty state for a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// The cached value is up-to-date.
    Clean,

    /// The memo needs to recompute on next read.
    Dirty,
}

type ComputeFn<T> = Box<dyn Fn(Option<T>) -> T + Send + Sync>;

struct MemoInner<T> {
    source_id: SourceId,
    subscriber_id: SubscriberId,
    name: String,
    compute: ComputeFn<T>,
    /// Last result, seeded with the `initial` option.
    value: Mutex<Option<T>>,
    state: Mutex<MemoState>,
    /// Bumped by every `mark_dirty`; a run that overlapped one stays dirty.
    version: AtomicU64,
    /// Held for the length of a run so threads never compute concurrently.
    compute_lock: Mutex<()>,
    run_count: AtomicUsize,
}

impl<T> MemoInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn cached(&self) -> Option<T> {
        if *self.state.lock() == MemoState::Clean {
            self.value.lock().clone()
        } else {
            None
        }
    }

    /// Run the computation. The caller holds `compute_lock`.
    fn recompute(&self) -> T {
        let version = self.version.load(Ordering::SeqCst);
        Runtime::clear_dependencies(self.subscriber_id);

        let previous = self.value.lock().clone();
        let next = {
            let _ctx = ReactiveContext::enter(self.subscriber_id);
            (self.compute)(previous)
        };

        *self.value.lock() = Some(next.clone());
        {
            let mut state = self.state.lock();
            if self.version.load(Ordering::SeqCst) == version {
                *state = MemoState::Clean;
            }
        }
        let runs = self.run_count.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(memo = %self.name, runs, "memo recomputed");

        next
    }
}

impl<T> Reactive for MemoInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn mark_dirty(&self) {
        let was_clean = {
            let mut state = self.state.lock();
            self.version.fetch_add(1, Ordering::SeqCst);
            std::mem::replace(&mut *state, MemoState::Dirty) == MemoState::Clean
        };

        // Readers of this memo must re-pull it.
        if was_clean {
            Runtime::notify_source_change(self.source_id);
        }
    }

    fn run(&self) {}

    fn is_eager(&self) -> bool {
        false
    }
}

impl<T> Drop for MemoInner<T> {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
        Runtime::remove_source(self.source_id);
    }
}

/// A cached derived value that recomputes only when dependencies change.
///
/// # Example
///
/// ```rust
/// use lattice_gate::reactive::{Memo, Signal};
///
/// let count = Signal::new(2);
/// let doubled = Memo::new({
///     let count = count.clone();
///     move |_prev| count.get() * 2
/// });
///
/// assert_eq!(doubled.get(), 4);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<MemoInner<T>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new memo with the given computation function.
    ///
    /// The computation is not run immediately. It runs on first access.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        Self::with_options(compute, ComputationOptions::new())
    }

    /// Create a memo with a name and/or an initial previous value.
    pub fn with_options<F>(compute: F, options: ComputationOptions<T>) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        let subscriber_id = SubscriberId::new();
        let source_id = SourceId::new();
        let name = options.display_name("memo", subscriber_id.as_u64());

        let inner = Arc::new(MemoInner {
            source_id,
            subscriber_id,
            name,
            compute: Box::new(compute),
            value: Mutex::new(options.initial),
            state: Mutex::new(MemoState::Dirty),
            version: AtomicU64::new(0),
            compute_lock: Mutex::new(()),
            run_count: AtomicUsize::new(0),
        });
        Runtime::register(&inner);
        debug!(memo = %inner.name, "memo created");

        Self { inner }
    }

    /// Get the memo's source ID.
    pub fn id(&self) -> SourceId {
        self.inner.source_id
    }

    /// Get the subscriber ID for this memo.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.inner.subscriber_id
    }

    /// Get the current value, recomputing if necessary.
    ///
    /// # Panics
    ///
    /// Panics if the memo is read from inside its own computation.
    pub fn get(&self) -> T {
        self.try_get().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Get the current value, reporting a cycle instead of panicking.
    ///
    /// A cycle is a read from inside this memo's own computation on the
    /// same thread. A read from another thread while a run is in progress
    /// waits for that run and returns its result.
    pub fn try_get(&self) -> Result<T> {
        if ReactiveContext::is_running(self.inner.subscriber_id) {
            return Err(ReactiveError::Cycle {
                name: self.inner.name.clone(),
            });
        }

        Runtime::track(self.inner.source_id);

        if let Some(value) = self.inner.cached() {
            return Ok(value);
        }

        let _computing = self.inner.compute_lock.lock();
        if let Some(value) = self.inner.cached() {
            return Ok(value);
        }

        Ok(self.inner.recompute())
    }

    /// Mark the memo as needing recomputation.
    pub fn mark_dirty(&self) {
        self.inner.mark_dirty();
    }

    /// Get the current dirty state.
    pub fn state(&self) -> MemoState {
        *self.inner.state.lock()
    }

    /// Check if the memo has a cached or initial value.
    pub fn has_value(&self) -> bool {
        self.inner.value.lock().is_some()
    }

    /// Number of completed computations.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::Relaxed)
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Memo<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .field("has_value", &self.has_value())
            .field("run_count", &self.run_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
