//! Error kinds and their specificity ordering

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a classified failure.
///
/// The set is closed. Categories form a specificity ordering through
/// [`ErrorKind::parent`]: a `ResourceNotFound` failure is also a
/// `ResourceAccessFailure`, but not the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    // =========================================================================
    // Resource errors
    // =========================================================================
    /// General I/O failure against a resource
    ResourceAccessFailure,

    /// The resource does not exist
    ResourceNotFound,

    /// Input ended before the expected amount was read
    PrematureEndOfInput,

    // =========================================================================
    // Collaborator errors
    // =========================================================================
    /// An external service (e.g. a database) could not be reached or refused
    ExternalServiceFailure,

    /// A named symbol could not be located
    SymbolResolutionFailure,

    // =========================================================================
    // Programming faults
    // =========================================================================
    /// Division by zero or arithmetic overflow
    ArithmeticFault,

    /// An absent value was dereferenced
    NullReferenceFault,

    /// Index outside `[0, len)`
    IndexOutOfRangeFault,

    /// A value cannot be viewed as the requested type
    TypeCoercionFault,

    // =========================================================================
    // Input errors
    // =========================================================================
    /// Input violates a precondition
    InvalidArgumentFault,

    /// Input is not a valid literal of the expected format
    FormatParseFault,

    /// Anything classification did not recognize
    UnclassifiedFault,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::ResourceAccessFailure,
        ErrorKind::ResourceNotFound,
        ErrorKind::PrematureEndOfInput,
        ErrorKind::ExternalServiceFailure,
        ErrorKind::SymbolResolutionFailure,
        ErrorKind::ArithmeticFault,
        ErrorKind::NullReferenceFault,
        ErrorKind::IndexOutOfRangeFault,
        ErrorKind::TypeCoercionFault,
        ErrorKind::InvalidArgumentFault,
        ErrorKind::FormatParseFault,
        ErrorKind::UnclassifiedFault,
    ];

    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // Resource
            ErrorKind::ResourceAccessFailure => "ResourceAccessFailure",
            ErrorKind::ResourceNotFound => "ResourceNotFound",
            ErrorKind::PrematureEndOfInput => "PrematureEndOfInput",

            // Collaborators
            ErrorKind::ExternalServiceFailure => "ExternalServiceFailure",
            ErrorKind::SymbolResolutionFailure => "SymbolResolutionFailure",

            // Programming faults
            ErrorKind::ArithmeticFault => "ArithmeticFault",
            ErrorKind::NullReferenceFault => "NullReferenceFault",
            ErrorKind::IndexOutOfRangeFault => "IndexOutOfRangeFault",
            ErrorKind::TypeCoercionFault => "TypeCoercionFault",

            // Input
            ErrorKind::InvalidArgumentFault => "InvalidArgumentFault",
            ErrorKind::FormatParseFault => "FormatParseFault",
            ErrorKind::UnclassifiedFault => "UnclassifiedFault",
        }
    }

    /// The immediate generalization of this kind, if any.
    pub fn parent(&self) -> Option<ErrorKind> {
        match self {
            ErrorKind::ResourceNotFound | ErrorKind::PrematureEndOfInput => {
                Some(ErrorKind::ResourceAccessFailure)
            }
            ErrorKind::FormatParseFault => Some(ErrorKind::InvalidArgumentFault),
            _ => None,
        }
    }

    /// This kind followed by each of its generalizations, most specific first.
    pub fn ancestors(self) -> impl Iterator<Item = ErrorKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// True if `self` equals `other` or is a specialization of it.
    ///
    /// A handler registered for `other` accepts every failure for which this
    /// returns true.
    pub fn specializes(self, other: ErrorKind) -> bool {
        self.ancestors().any(|kind| kind == other)
    }

    /// The most general kind this one belongs to
    pub fn root(self) -> ErrorKind {
        self.ancestors().last().unwrap_or(self)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
