//! Reactive Context
//!
//! The reactive context tracks which computation is currently running.
//! This enables automatic dependency tracking: when a source is read,
//! we can register the current computation as a dependent.
//!
//! # Implementation
//!
//! We use a thread-local stack to track the currently executing computation.
//! When entering a reactive context (e.g., running a memo or effect), we push
//! the subscriber onto the stack. When the computation completes, we pop it.
//!
//! Untracked scopes push an entry with no subscriber, so reads inside them
//! register nothing even when an outer computation is running.

use std::cell::RefCell;

use super::subscriber::SubscriberId;

thread_local! {
    /// Running computations, innermost last. `None` marks an untracked scope.
    static CONTEXT_STACK: RefCell<Vec<Option<SubscriberId>>> = RefCell::new(Vec::new());
}

/// Guard that pops the context when dropped.
///
/// This keeps the context stack balanced even if the computation panics.
pub struct ReactiveContext {
    subscriber_id: Option<SubscriberId>,
}

impl ReactiveContext {
    /// Enter a new reactive context for the given subscriber.
    ///
    /// While this context is active, any source that is read will
    /// register the subscriber as a dependent.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        Self::push(Some(subscriber_id))
    }

    /// Enter a scope in which reads are not tracked.
    pub fn enter_untracked() -> Self {
        Self::push(None)
    }

    fn push(subscriber_id: Option<SubscriberId>) -> Self {
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(subscriber_id));
        Self { subscriber_id }
    }

    /// Check if a tracking context is active.
    pub fn is_active() -> bool {
        Self::current_subscriber().is_some()
    }

    /// Get the current subscriber ID, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        CONTEXT_STACK.with(|stack| stack.borrow().last().copied().flatten())
    }

    /// Whether `subscriber_id` is running anywhere on this thread's stack,
    /// including below an untracked scope.
    pub fn is_running(subscriber_id: SubscriberId) -> bool {
        CONTEXT_STACK.with(|stack| stack.borrow().contains(&Some(subscriber_id)))
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry, self.subscriber_id,
                    "ReactiveContext mismatch: expected {:?}, got {:?}",
                    self.subscriber_id, entry
                );
            }
        });
    }
}

/// Run `f` without registering any dependency on the current computation.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let _ctx = ReactiveContext::enter_untracked();
    f()
}
