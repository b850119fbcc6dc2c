//! # Guaranteed cleanup
//!
//! [`with_cleanup`] runs an action and then a cleanup step exactly once,
//! whatever the action did. The step is held by a [`Deferred`] guard, so it
//! also runs if the action panics.

use crate::error::{Error, Result};

/// Scope guard that runs its cleanup at most once: explicitly via
/// [`Deferred::run`], or on drop.
#[must_use = "dropping the guard runs the cleanup immediately"]
pub struct Deferred<C>
where
    C: FnOnce() -> Result<()>,
{
    cleanup: Option<C>,
}

impl<C> Deferred<C>
where
    C: FnOnce() -> Result<()>,
{
    pub fn new(cleanup: C) -> Self {
        Self {
            cleanup: Some(cleanup),
        }
    }

    /// Run the cleanup now and return its result.
    pub fn run(mut self) -> Result<()> {
        match self.cleanup.take() {
            Some(cleanup) => cleanup(),
            None => Ok(()),
        }
    }
}

impl<C> Drop for Deferred<C>
where
    C: FnOnce() -> Result<()>,
{
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            // Nobody is left to receive the result.
            if let Err(err) = cleanup() {
                tracing::warn!(error = %err, "deferred cleanup failed");
            }
        }
    }
}

/// Shorthand for [`Deferred::new`]
pub fn defer<C>(cleanup: C) -> Deferred<C>
where
    C: FnOnce() -> Result<()>,
{
    Deferred::new(cleanup)
}

/// The action's value plus how its cleanup went.
#[derive(Debug)]
pub struct Cleaned<T> {
    value: T,
    cleanup: Result<()>,
}

impl<T> Cleaned<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn cleanup_error(&self) -> Option<&Error> {
        self.cleanup.as_ref().err()
    }

    pub fn cleanup_succeeded(&self) -> bool {
        self.cleanup.is_ok()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Result<()>) {
        (self.value, self.cleanup)
    }
}

impl<T> Cleaned<Result<T>> {
    /// The action's own result, untouched, and the cleanup error if any.
    pub fn into_result(self) -> (Result<T>, Option<Error>) {
        (self.value, self.cleanup.err())
    }
}

/// Run `action`, then `cleanup` exactly once before returning.
///
/// The cleanup also runs if `action` panics; the panic then continues to
/// unwind. A failing cleanup never replaces the action's value.
pub fn with_cleanup<T, A, C>(action: A, cleanup: C) -> Cleaned<T>
where
    A: FnOnce() -> T,
    C: FnOnce() -> Result<()>,
{
    let guard = defer(cleanup);
    let value = action();
    let cleanup = guard.run();
    if let Err(err) = &cleanup {
        tracing::warn!(error = %err, "cleanup failed");
    }
    Cleaned { value, cleanup }
}
