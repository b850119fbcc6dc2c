//! Raw failures reported by collaborators, and their classification

use crate::ErrorKind;
use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// A failure as reported by an operation or collaborator, before it is
/// classified into an [`ErrorKind`].
#[derive(Debug, Error)]
pub enum RawFailure {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid number format {input:?}: {source}")]
    ParseInt {
        input: String,
        #[source]
        source: ParseIntError,
    },

    #[error("{what}: {source}")]
    Malformed {
        what: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0}")]
    Service(String),

    #[error("symbol not found: {0}")]
    Symbol(String),

    #[error("division by zero")]
    DivideByZero,

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("null reference: {0}")]
    NullReference(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("cannot view {actual} as {requested}")]
    TypeMismatch {
        actual: &'static str,
        requested: &'static str,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Classify a raw failure into exactly one most-specific kind.
///
/// Total and deterministic: the same failure always yields the same kind,
/// and anything unrecognized becomes [`ErrorKind::UnclassifiedFault`].
pub fn classify(raw: &RawFailure) -> ErrorKind {
    match raw {
        RawFailure::Io(err) => classify_io(err.kind()),
        RawFailure::ParseInt { .. } | RawFailure::Malformed { .. } => {
            ErrorKind::FormatParseFault
        }
        RawFailure::Service(_) => ErrorKind::ExternalServiceFailure,
        RawFailure::Symbol(_) => ErrorKind::SymbolResolutionFailure,
        RawFailure::DivideByZero | RawFailure::Overflow(_) => ErrorKind::ArithmeticFault,
        RawFailure::NullReference(_) => ErrorKind::NullReferenceFault,
        RawFailure::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRangeFault,
        RawFailure::TypeMismatch { .. } => ErrorKind::TypeCoercionFault,
        RawFailure::InvalidArgument(_) => ErrorKind::InvalidArgumentFault,
        RawFailure::Other(_) => ErrorKind::UnclassifiedFault,
    }
}

fn classify_io(kind: io::ErrorKind) -> ErrorKind {
    match kind {
        io::ErrorKind::NotFound => ErrorKind::ResourceNotFound,
        io::ErrorKind::UnexpectedEof => ErrorKind::PrematureEndOfInput,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::TimedOut
        | io::ErrorKind::AddrNotAvailable => ErrorKind::ExternalServiceFailure,
        _ => ErrorKind::ResourceAccessFailure,
    }
}
