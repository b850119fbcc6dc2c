//! # Recovery dispatch
//!
//! A [`HandlerTable`] is an ordered list of (matcher, action) pairs. A
//! failure goes to the first entry whose category equals or generalizes the
//! failure's kind, so specific handlers must come before general ones. If
//! nothing matches the failure comes back as [`Unhandled`] and must be
//! propagated.

use crate::error::{Error, ErrorKind, Result};
use std::fmt;

/// What a handler entry accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Failures of this kind or any specialization of it
    Kind(ErrorKind),
    /// Every failure
    Any,
}

impl Matcher {
    pub fn matches(&self, kind: ErrorKind) -> bool {
        match self {
            Matcher::Kind(category) => kind.specializes(*category),
            Matcher::Any => true,
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Kind(kind) => write!(f, "{}", kind),
            Matcher::Any => write!(f, "*"),
        }
    }
}

/// A failure no handler accepted.
#[must_use = "unhandled failures must be propagated"]
#[derive(Debug, thiserror::Error)]
#[error("unhandled {0}")]
pub struct Unhandled(#[source] Error);

impl Unhandled {
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    pub fn error(&self) -> &Error {
        &self.0
    }

    pub fn into_error(self) -> Error {
        self.0
    }
}

impl From<Unhandled> for Error {
    fn from(unhandled: Unhandled) -> Self {
        unhandled.0
    }
}

type Action<'h, T> = Box<dyn Fn(Error) -> T + Send + Sync + 'h>;

struct Handler<'h, T> {
    matcher: Matcher,
    action: Action<'h, T>,
}

/// Ordered handler table. Immutable once built.
pub struct HandlerTable<'h, T> {
    handlers: Vec<Handler<'h, T>>,
}

impl<'h, T> HandlerTable<'h, T> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler for `kind` and its specializations
    pub fn on(mut self, kind: ErrorKind, action: impl Fn(Error) -> T + Send + Sync + 'h) -> Self {
        self.handlers.push(Handler {
            matcher: Matcher::Kind(kind),
            action: Box::new(action),
        });
        self
    }

    /// Append a handler that accepts anything left over
    pub fn otherwise(mut self, action: impl Fn(Error) -> T + Send + Sync + 'h) -> Self {
        self.handlers.push(Handler {
            matcher: Matcher::Any,
            action: Box::new(action),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Matchers in evaluation order
    pub fn matchers(&self) -> impl Iterator<Item = Matcher> + '_ {
        self.handlers.iter().map(|h| h.matcher)
    }

    /// Index of the handler a failure of `kind` would go to
    pub fn select(&self, kind: ErrorKind) -> Option<usize> {
        self.handlers.iter().position(|h| h.matcher.matches(kind))
    }

    /// Give `err` to the first matching handler.
    pub fn recover(&self, err: Error) -> std::result::Result<T, Unhandled> {
        match self.select(err.kind()) {
            Some(index) => {
                let handler = &self.handlers[index];
                tracing::debug!(
                    kind = %err.kind(),
                    matcher = %handler.matcher,
                    index,
                    "dispatching failure"
                );
                Ok((handler.action)(err))
            }
            None => {
                tracing::debug!(kind = %err.kind(), "no handler matched");
                Err(Unhandled(err))
            }
        }
    }

    /// Pass a success through; route a failure to its handler.
    pub fn handle(&self, result: Result<T>) -> std::result::Result<T, Unhandled> {
        result.or_else(|err| self.recover(err))
    }
}

impl<T> Default for HandlerTable<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HandlerTable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|h| h.matcher))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fail(kind: ErrorKind) -> Result<&'static str> {
        Err(Error::new(kind, "test failure"))
    }

    fn io_table() -> HandlerTable<'static, &'static str> {
        HandlerTable::new()
            .on(ErrorKind::ResourceNotFound, |_| "not found")
            .on(ErrorKind::ResourceAccessFailure, |_| "io")
    }

    #[test]
    fn test_success_passes_through() {
        assert_eq!(io_table().handle(Ok("value")).unwrap(), "value");
    }

    #[test]
    fn test_most_specific_first() {
        let table = io_table();
        assert_eq!(table.handle(fail(ErrorKind::ResourceNotFound)).unwrap(), "not found");
        assert_eq!(table.select(ErrorKind::ResourceNotFound), Some(0));
    }

    #[test]
    fn test_specialization_reaches_general_handler() {
        let table = HandlerTable::new().on(ErrorKind::ResourceAccessFailure, |_| "io");
        assert_eq!(table.handle(fail(ErrorKind::ResourceNotFound)).unwrap(), "io");
        assert_eq!(table.handle(fail(ErrorKind::PrematureEndOfInput)).unwrap(), "io");
    }

    #[test]
    fn test_general_failure_skips_narrow_handler() {
        let table = HandlerTable::new().on(ErrorKind::ResourceNotFound, |_| "not found");
        let unhandled = table.handle(fail(ErrorKind::ResourceAccessFailure)).unwrap_err();
        assert_eq!(unhandled.kind(), ErrorKind::ResourceAccessFailure);
    }

    #[test]
    fn test_general_first_shadows_specific() {
        let table = HandlerTable::new()
            .on(ErrorKind::ResourceAccessFailure, |_| "io")
            .on(ErrorKind::ResourceNotFound, |_| "not found");
        assert_eq!(table.handle(fail(ErrorKind::ResourceNotFound)).unwrap(), "io");
    }

    #[test]
    fn test_only_one_handler_runs() {
        let calls = AtomicUsize::new(0);
        let table = HandlerTable::new()
            .on(ErrorKind::ArithmeticFault, |_| calls.fetch_add(1, Ordering::SeqCst))
            .on(ErrorKind::ArithmeticFault, |_| calls.fetch_add(100, Ordering::SeqCst))
            .otherwise(|_| calls.fetch_add(1000, Ordering::SeqCst));

        table.handle(Err(Error::bare(ErrorKind::ArithmeticFault))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_receives_the_error() {
        let table = HandlerTable::new()
            .on(ErrorKind::InvalidArgumentFault, |e: Error| e.message().to_string());
        let detail = table
            .handle(Err(Error::invalid_argument("Age cannot be negative")))
            .unwrap();
        assert_eq!(detail, "Age cannot be negative");
    }

    #[test]
    fn test_unhandled_propagates_to_outer_table() {
        let inner = HandlerTable::new().on(ErrorKind::FormatParseFault, |_| "inner");
        let outer = HandlerTable::new().otherwise(|e: Error| {
            assert_eq!(e.kind(), ErrorKind::ArithmeticFault);
            "outer"
        });

        let unhandled = inner.handle(fail(ErrorKind::ArithmeticFault)).unwrap_err();
        assert_eq!(outer.handle(Err(unhandled.into())).unwrap(), "outer");
    }

    #[test]
    fn test_otherwise_respects_order() {
        let table = HandlerTable::new()
            .otherwise(|_| "any")
            .on(ErrorKind::NullReferenceFault, |_| "null");
        assert_eq!(table.select(ErrorKind::NullReferenceFault), Some(0));
        assert_eq!(table.handle(fail(ErrorKind::NullReferenceFault)).unwrap(), "any");
    }

    #[test]
    fn test_selection_is_deterministic() {
        let table = io_table();
        for kind in ErrorKind::ALL {
            let first = table.select(kind);
            for _ in 0..5 {
                assert_eq!(table.select(kind), first);
            }
        }
        assert_eq!(table.select(ErrorKind::PrematureEndOfInput), Some(1));
        assert_eq!(table.select(ErrorKind::ArithmeticFault), None);
    }

    #[test]
    fn test_empty_table_handles_nothing() {
        let table: HandlerTable<'_, ()> = HandlerTable::default();
        assert!(table.is_empty());
        assert!(table.handle(Err(Error::bare(ErrorKind::UnclassifiedFault))).is_err());
    }

    #[test]
    fn test_debug_lists_matchers() {
        let debug = format!("{:?}", io_table());
        assert!(debug.contains("ResourceNotFound"));
        assert_eq!(io_table().matchers().count(), 2);
    }
}
