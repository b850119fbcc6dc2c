//! faultkit-core error helpers
//!
//! Re-exports faultkit-error and provides constructors for the failures the
//! core operations raise. Each one goes through [`RawFailure`] so the kind
//! always comes from `classify`.

use std::io;
use std::path::Path;

// Re-export the core error types
pub use faultkit_error::{classify, Error, ErrorKind, RawFailure, Result};

// =============================================================================
// Resource errors
// =============================================================================

/// Create a ResourceAccessFailure for a write to a restricted location
pub fn write_denied(path: &Path) -> Error {
    let raw = io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{}: permission denied", path.display()),
    );
    Error::from(RawFailure::Io(raw)).with_context("path", path.display().to_string())
}

/// Wrap an io error raised while touching `path`
pub fn io_failed(path: &Path, err: io::Error) -> Error {
    let raw = io::Error::new(err.kind(), format!("{}: {}", path.display(), err));
    Error::from(RawFailure::Io(raw)).with_context("path", path.display().to_string())
}

/// Create a PrematureEndOfInput error
pub fn end_of_input(path: &Path, offset: usize) -> Error {
    let raw = io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("reached end of {} at byte {}", path.display(), offset),
    );
    Error::from(RawFailure::Io(raw))
        .with_context("path", path.display().to_string())
        .with_context("offset", offset.to_string())
}

// =============================================================================
// Collaborator errors
// =============================================================================

/// Create an ExternalServiceFailure error
pub fn service_failed(reason: impl Into<String>) -> Error {
    Error::from(RawFailure::Service(reason.into()))
}

/// Create a SymbolResolutionFailure error
pub fn symbol_not_found(name: impl Into<String>) -> Error {
    let name = name.into();
    Error::from(RawFailure::Symbol(name.clone())).with_context("symbol", name)
}

// =============================================================================
// Programming faults
// =============================================================================

/// Create an ArithmeticFault for a zero divisor
pub fn division_by_zero(dividend: i64) -> Error {
    Error::from(RawFailure::DivideByZero).with_context("dividend", dividend.to_string())
}

/// Create an ArithmeticFault for an overflowing operation
pub fn overflow(expression: impl Into<String>) -> Error {
    Error::from(RawFailure::Overflow(expression.into()))
}

/// Create a NullReferenceFault error
pub fn null_reference(what: impl Into<String>) -> Error {
    Error::from(RawFailure::NullReference(what.into()))
}

/// Create an IndexOutOfRangeFault error
pub fn index_out_of_range(index: i64, len: usize) -> Error {
    Error::from(RawFailure::IndexOutOfRange { index, len })
        .with_context("index", index.to_string())
        .with_context("len", len.to_string())
}

/// Create a TypeCoercionFault error
pub fn type_mismatch(actual: &'static str, requested: &'static str) -> Error {
    Error::from(RawFailure::TypeMismatch { actual, requested })
}

// =============================================================================
// Input errors
// =============================================================================

/// Create an InvalidArgumentFault error
pub fn invalid_argument(message: impl Into<String>) -> Error {
    Error::from(RawFailure::InvalidArgument(message.into()))
}

/// Create a FormatParseFault error for a bad integer literal
pub fn parse_int_failed(input: &str, source: std::num::ParseIntError) -> Error {
    Error::from(RawFailure::ParseInt {
        input: input.to_string(),
        source,
    })
    .with_context("input", input)
}

/// Create a FormatParseFault error for malformed structured input
pub fn format_parse(what: impl Into<String>, source: impl Into<anyhow::Error>) -> Error {
    Error::from(RawFailure::Malformed {
        what: what.into(),
        source: source.into(),
    })
}
