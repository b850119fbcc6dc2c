//! The main Error type for faultkit

use crate::{classify, ErrorKind, RawFailure};
use std::fmt;

/// A classified failure: its most specific [`ErrorKind`], an optional
/// detail, the operation that raised it, and the raw failure underneath.
///
/// ```rust
/// use faultkit_error::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::ResourceNotFound, "nonexistent.txt")
///     .with_operation("ops::read_file")
///     .with_context("path", "nonexistent.txt");
///
/// assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
/// assert!(err.is(ErrorKind::ResourceAccessFailure));
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Failure of `kind` with a human-readable detail
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Failure of `kind` with no detail
    pub fn bare(kind: ErrorKind) -> Self {
        Self::new(kind, String::new())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Empty when no detail was given
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        if self.message.is_empty() {
            None
        } else {
            Some(&self.message)
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// The raw failure this was classified from
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    /// True if this failure would be accepted by a handler for `kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind.specializes(kind)
    }

    /// Record the raising operation. An operation set earlier is kept in
    /// context under "called", innermost first.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the underlying failure. Debug builds assert it is set once.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }
}

/// `Kind at op, context { k: v } => detail`
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        writeln!(f)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Classification entry points
// =============================================================================

impl From<RawFailure> for Error {
    fn from(raw: RawFailure) -> Self {
        Error::new(classify(&raw), raw.to_string()).set_source(raw)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::from(RawFailure::Io(err)).with_operation("io")
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an UnclassifiedFault error
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnclassifiedFault, message)
    }

    /// Create an InvalidArgumentFault error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgumentFault, message)
    }

    /// Create a ResourceNotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self::new(ErrorKind::ResourceNotFound, format!("'{}' not found", resource))
            .with_context("resource", resource)
    }

    /// Create an ExternalServiceFailure error
    pub fn service_failed(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalServiceFailure, reason)
            .with_context("service", service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::ResourceNotFound, "nonexistent.txt not found");
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert_eq!(err.message(), "nonexistent.txt not found");
        assert_eq!(err.detail(), Some("nonexistent.txt not found"));
    }

    #[test]
    fn test_bare_error_has_no_detail() {
        let err = Error::bare(ErrorKind::NullReferenceFault);
        assert_eq!(err.detail(), None);
        assert_eq!(err.to_string(), "NullReferenceFault");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::ExternalServiceFailure, "connection refused")
            .with_operation("ops::connect")
            .with_context("host", "localhost")
            .with_context("port", "3306");

        assert_eq!(err.operation(), "ops::connect");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("host", "localhost".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::ResourceAccessFailure, "write failed")
            .with_operation("store::write")
            .with_operation("ops::write_file");

        assert_eq!(err.operation(), "ops::write_file");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "store::write".to_string()));
    }

    #[test]
    fn test_is_follows_specialization() {
        let err = Error::new(ErrorKind::PrematureEndOfInput, "eof");
        assert!(err.is(ErrorKind::PrematureEndOfInput));
        assert!(err.is(ErrorKind::ResourceAccessFailure));
        assert!(!err.is(ErrorKind::ResourceNotFound));

        let err = Error::new(ErrorKind::ResourceAccessFailure, "denied");
        assert!(!err.is(ErrorKind::ResourceNotFound));
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::InvalidArgumentFault, "Age cannot be negative")
            .with_operation("ops::set_age")
            .with_context("age", "-5");

        let display = format!("{}", err);
        assert!(display.contains("InvalidArgumentFault"));
        assert!(display.contains("ops::set_age"));
        assert!(display.contains("age: -5"));
        assert!(display.ends_with("=> Age cannot be negative"));
    }

    #[test]
    fn test_from_raw_failure_classifies() {
        let err = Error::from(RawFailure::DivideByZero);
        assert_eq!(err.kind(), ErrorKind::ArithmeticFault);
        assert_eq!(err.message(), "division by zero");
        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_from_io_error() {
        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "nonexistent.txt"));
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert_eq!(err.operation(), "io");

        let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.kind(), ErrorKind::ResourceAccessFailure);
    }

    #[test]
    fn test_convenience_constructors() {
        let err = Error::not_found("test.dat");
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert!(err.message().contains("test.dat"));

        let err = Error::service_failed("mysql", "Communications link failure");
        assert_eq!(err.kind(), ErrorKind::ExternalServiceFailure);
        assert_eq!(err.context()[0], ("service", "mysql".to_string()));

        let err = Error::unclassified("???");
        assert_eq!(err.kind(), ErrorKind::UnclassifiedFault);
    }

    #[test]
    fn test_set_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = Error::new(ErrorKind::ResourceNotFound, "config.json not found")
            .set_source(io_err);

        assert!(err.source_ref().is_some());
        assert!(std::error::Error::source(&err).is_some());
    }
}
