//! Effect Implementation
//!
//! An Effect is a side-effecting computation that runs whenever its
//! dependencies change.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its function immediately to establish
//!    initial dependencies.
//!
//! 2. When any dependency changes, the effect re-runs synchronously.
//!
//! 3. Before re-running, the effect clears its old dependencies and tracks
//!    new ones during execution.
//!
//! The effect function receives whatever it returned last time (`None` on
//! the first run unless an `initial` option was given). Effects that only
//! act on the outside world return `()`.
//!
//! # Differences from Memo
//!
//! - Memos are lazy (compute on access); effects are eager.
//! - An effect's value is not readable. [`Computed`](super::Computed) is the
//!   eager variant whose value can be read.
//!
//! The effect stops running when it is disposed or when every handle to it
//! has been dropped.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::context::ReactiveContext;
use super::options::ComputationOptions;
use super::runtime::{Reactive, Runtime, RunningGuard};
use super::subscriber::{SourceId, SubscriberId};

type RunFn<T> = Box<dyn Fn(Option<T>) -> T + Send + Sync>;

/// Back-to-back reruns allowed before a self-triggering computation is
/// stopped.
const MAX_RERUNS: usize = 100;

/// Shared state of an eager computation (effect or computed).
pub(crate) struct EagerInner<T> {
    pub(crate) source_id: SourceId,
    subscriber_id: SubscriberId,
    pub(crate) name: String,
    run: RunFn<T>,
    /// Last result, seeded with the `initial` option.
    pub(crate) value: Mutex<Option<T>>,
    disposed: AtomicBool,
    running: AtomicBool,
    /// Set when a run is requested while one is in progress.
    pending: AtomicBool,
    run_count: AtomicUsize,
}

impl<T> EagerInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn create<F>(kind: &str, run: F, options: ComputationOptions<T>) -> Arc<Self>
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        let subscriber_id = SubscriberId::new();
        let inner = Arc::new(Self {
            source_id: SourceId::new(),
            subscriber_id,
            name: options.display_name(kind, subscriber_id.as_u64()),
            run: Box::new(run),
            value: Mutex::new(options.initial),
            disposed: AtomicBool::new(false),
            running: AtomicBool::new(false),
            pending: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        });
        Runtime::register(&inner);
        debug!(computation = %inner.name, "{kind} created");
        inner
    }

    /// Run the function within a tracking context.
    ///
    /// A request that arrives while a run is in progress (from inside the
    /// run or from another thread) is not dropped: the running caller runs
    /// again once the current run returns.
    pub(crate) fn execute(&self) {
        loop {
            if self.is_disposed() {
                return;
            }

            let Some(running) = RunningGuard::try_enter(&self.running) else {
                self.pending.store(true, Ordering::SeqCst);
                trace!(computation = %self.name, "run requested while running");
                return;
            };

            let mut reruns = 0;
            loop {
                self.pending.store(false, Ordering::SeqCst);
                self.run_once();
                if !self.pending.load(Ordering::SeqCst) || self.is_disposed() {
                    break;
                }
                reruns += 1;
                if reruns >= MAX_RERUNS {
                    warn!(computation = %self.name, reruns, "computation keeps triggering itself; stopped");
                    self.pending.store(false, Ordering::SeqCst);
                    break;
                }
            }
            drop(running);

            Runtime::notify_source_change(self.source_id);

            // Another thread may have asked for a run after the last check.
            if !self.pending.load(Ordering::SeqCst) {
                return;
            }
        }
    }

    fn run_once(&self) {
        Runtime::clear_dependencies(self.subscriber_id);

        let previous = self.value.lock().clone();
        let next = {
            let _ctx = ReactiveContext::enter(self.subscriber_id);
            (self.run)(previous)
        };

        *self.value.lock() = Some(next);
        let runs = self.run_count.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(computation = %self.name, runs, "computation ran");
    }

    pub(crate) fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            Runtime::unregister(self.subscriber_id);
            debug!(computation = %self.name, "disposed");
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub(crate) fn run_count(&self) -> usize {
        self.run_count.load(Ordering::Relaxed)
    }
}

impl<T> Reactive for EagerInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn mark_dirty(&self) {}

    fn run(&self) {
        self.execute();
    }

    fn is_eager(&self) -> bool {
        true
    }
}

impl<T> Drop for EagerInner<T> {
    fn drop(&mut self) {
        Runtime::unregister(self.subscriber_id);
        Runtime::remove_source(self.source_id);
    }
}

/// A side-effecting computation that runs when dependencies change.
///
/// Keep the handle alive for as long as the effect should run.
///
/// # Example
///
/// ```rust
/// use lattice_gate::reactive::{Effect, Signal};
///
/// let count = Signal::new(0);
/// let effect = Effect::new({
///     let count = count.clone();
///     move |runs: Option<u32>| {
///         let _ = count.get();
///         runs.unwrap_or(0) + 1
///     }
/// });
///
/// count.set(5);
/// assert_eq!(effect.run_count(), 2);
/// ```
pub struct Effect<T = ()>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<EagerInner<T>>,
}

impl<T> Effect<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new effect with the given function.
    ///
    /// The function runs immediately to establish initial dependencies.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        Self::with_options(run, ComputationOptions::new())
    }

    /// Create an effect with a name and/or an initial previous value.
    pub fn with_options<F>(run: F, options: ComputationOptions<T>) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        let effect = Self::new_lazy_with_options(run, options);
        effect.execute();
        effect
    }

    /// Create a new effect without running it.
    ///
    /// No dependency is tracked until [`Effect::execute`] is called.
    pub fn new_lazy<F>(run: F) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        Self::new_lazy_with_options(run, ComputationOptions::new())
    }

    fn new_lazy_with_options<F>(run: F, options: ComputationOptions<T>) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        Self {
            inner: EagerInner::create("effect", run, options),
        }
    }

    /// Get the subscriber ID for this effect.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.inner.subscriber_id
    }

    /// Execute the effect function now.
    pub fn execute(&self) {
        self.inner.execute();
    }

    /// Dispose of the effect.
    ///
    /// After disposal, the effect will not run again.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    /// Check if the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count()
    }
}

impl<T> Clone for Effect<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Effect<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.inner.name)
            .field("run_count", &self.run_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
