//! Computed Implementation
//!
//! A Computed is an eager derived value: it runs as soon as it is created and
//! again every time a dependency changes, and its latest result can be read
//! (with tracking) like a signal.
//!
//! Use a [`Memo`](super::Memo) when the value should only be computed on
//! demand, and a Computed when the computation must fire on every change.

use std::fmt::Debug;
use std::sync::Arc;

use super::effect::EagerInner;
use super::error::{ReactiveError, Result};
use super::options::ComputationOptions;
use super::runtime::Runtime;
use super::subscriber::SourceId;

/// An eager, readable derived value.
///
/// ```rust
/// use lattice_gate::reactive::{Computed, Signal};
///
/// let name = Signal::new("ada".to_string());
/// let greeting = Computed::new({
///     let name = name.clone();
///     move |_prev| format!("hello {}", name.get())
/// });
///
/// name.set("grace".to_string());
/// assert_eq!(greeting.get(), "hello grace");
/// ```
pub struct Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<EagerInner<T>>,
}

impl<T> Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a computed value. The computation runs immediately.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        Self::with_options(compute, ComputationOptions::new())
    }

    /// Create a computed value with a name and/or an initial previous value.
    pub fn with_options<F>(compute: F, options: ComputationOptions<T>) -> Self
    where
        F: Fn(Option<T>) -> T + Send + Sync + 'static,
    {
        let inner = EagerInner::create("computed", compute, options);
        inner.execute();
        Self { inner }
    }

    /// Get the computed's source ID.
    pub fn id(&self) -> SourceId {
        self.inner.source_id
    }

    /// Get the latest value, registering a dependency if tracking.
    ///
    /// # Panics
    ///
    /// Panics if the computed was disposed or has no value.
    pub fn get(&self) -> T {
        self.try_get().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Get the latest value, reporting disposal (or a computed with no
    /// completed run) instead of panicking.
    pub fn try_get(&self) -> Result<T> {
        if self.inner.is_disposed() {
            return Err(ReactiveError::Disposed {
                name: self.inner.name.clone(),
            });
        }

        Runtime::track(self.inner.source_id);
        self.inner
            .value
            .lock()
            .clone()
            .ok_or_else(|| ReactiveError::Uninitialized {
                name: self.inner.name.clone(),
            })
    }

    /// Stop reacting to changes.
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Get the number of times the computation has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count()
    }
}

impl<T> Clone for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Debug for Computed<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("name", &self.inner.name)
            .field("value", &*self.inner.value.lock())
            .field("run_count", &self.run_count())
            .finish()
    }
}
