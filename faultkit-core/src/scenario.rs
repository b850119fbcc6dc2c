//! The failure demonstrations

use crate::dispatch::HandlerTable;
use crate::error::{self, Error, ErrorKind, Result};
use crate::harness::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a scenario's failure is usually thought of. Presentation only: both
/// groups are classified and dispatched the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    /// Failures of the environment a caller should expect
    Expected,
    /// Faults that usually point at a bug or bad input
    Runtime,
}

impl Group {
    pub fn title(&self) -> &'static str {
        match self {
            Group::Expected => "Expected failures",
            Group::Runtime => "Runtime faults",
        }
    }
}

/// One demonstration: an operation that fails in a known way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    RestrictedWrite,
    MissingFile,
    ReadPastEnd,
    UnreachableService,
    UnknownSymbol,
    DivideByZero,
    NullReference,
    IndexOutOfBounds,
    InvalidCoercion,
    InvalidArgument,
    NumberFormat,
}

impl Scenario {
    /// Every scenario, in demonstration order
    pub const ALL: [Scenario; 11] = [
        Scenario::RestrictedWrite,
        Scenario::MissingFile,
        Scenario::ReadPastEnd,
        Scenario::UnreachableService,
        Scenario::UnknownSymbol,
        Scenario::DivideByZero,
        Scenario::NullReference,
        Scenario::IndexOutOfBounds,
        Scenario::InvalidCoercion,
        Scenario::InvalidArgument,
        Scenario::NumberFormat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::RestrictedWrite => "restricted-write",
            Scenario::MissingFile => "missing-file",
            Scenario::ReadPastEnd => "read-past-end",
            Scenario::UnreachableService => "unreachable-service",
            Scenario::UnknownSymbol => "unknown-symbol",
            Scenario::DivideByZero => "divide-by-zero",
            Scenario::NullReference => "null-reference",
            Scenario::IndexOutOfBounds => "index-out-of-bounds",
            Scenario::InvalidCoercion => "invalid-coercion",
            Scenario::InvalidArgument => "invalid-argument",
            Scenario::NumberFormat => "number-format",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::RestrictedWrite => "write to a location that refuses writes",
            Scenario::MissingFile => "read a file that does not exist",
            Scenario::ReadPastEnd => "read a second integer from a file holding one",
            Scenario::UnreachableService => "connect to a database that is not there",
            Scenario::UnknownSymbol => "resolve a symbol nobody registered",
            Scenario::DivideByZero => "integer division by zero",
            Scenario::NullReference => "take the length of an absent string",
            Scenario::IndexOutOfBounds => "index past the end of an array",
            Scenario::InvalidCoercion => "view a number as a string",
            Scenario::InvalidArgument => "set a negative age",
            Scenario::NumberFormat => "parse a non-numeric string",
        }
    }

    pub fn group(&self) -> Group {
        match self {
            Scenario::RestrictedWrite
            | Scenario::MissingFile
            | Scenario::ReadPastEnd
            | Scenario::UnreachableService
            | Scenario::UnknownSymbol => Group::Expected,
            _ => Group::Runtime,
        }
    }

    /// The kind this scenario is expected to fail with
    pub fn expected_kind(&self) -> ErrorKind {
        match self {
            Scenario::RestrictedWrite => ErrorKind::ResourceAccessFailure,
            Scenario::MissingFile => ErrorKind::ResourceNotFound,
            Scenario::ReadPastEnd => ErrorKind::PrematureEndOfInput,
            Scenario::UnreachableService => ErrorKind::ExternalServiceFailure,
            Scenario::UnknownSymbol => ErrorKind::SymbolResolutionFailure,
            Scenario::DivideByZero => ErrorKind::ArithmeticFault,
            Scenario::NullReference => ErrorKind::NullReferenceFault,
            Scenario::IndexOutOfBounds => ErrorKind::IndexOutOfRangeFault,
            Scenario::InvalidCoercion => ErrorKind::TypeCoercionFault,
            Scenario::InvalidArgument => ErrorKind::InvalidArgumentFault,
            Scenario::NumberFormat => ErrorKind::FormatParseFault,
        }
    }

    /// Handler categories, in evaluation order
    pub fn handler_kinds(&self) -> &'static [ErrorKind] {
        match self {
            Scenario::RestrictedWrite => &[ErrorKind::ResourceAccessFailure],
            Scenario::MissingFile => &[ErrorKind::ResourceNotFound, ErrorKind::ResourceAccessFailure],
            Scenario::ReadPastEnd => {
                &[ErrorKind::PrematureEndOfInput, ErrorKind::ResourceAccessFailure]
            }
            Scenario::UnreachableService => &[ErrorKind::ExternalServiceFailure],
            Scenario::UnknownSymbol => &[ErrorKind::SymbolResolutionFailure],
            Scenario::DivideByZero => &[ErrorKind::ArithmeticFault],
            Scenario::NullReference => &[ErrorKind::NullReferenceFault],
            Scenario::IndexOutOfBounds => &[ErrorKind::IndexOutOfRangeFault],
            Scenario::InvalidCoercion => &[ErrorKind::TypeCoercionFault],
            Scenario::InvalidArgument => &[ErrorKind::InvalidArgumentFault],
            Scenario::NumberFormat => &[ErrorKind::FormatParseFault],
        }
    }

    /// The handler table for this scenario
    pub fn handlers(&self) -> HandlerTable<'static, Outcome> {
        self.handler_kinds()
            .iter()
            .fold(HandlerTable::new(), |table, &category| {
                table.on(category, move |err: Error| Outcome::handled(category, err))
            })
    }

    /// Whether the scenario removes what it wrote once it is done
    pub fn has_cleanup(&self) -> bool {
        matches!(self, Scenario::RestrictedWrite | Scenario::ReadPastEnd)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| {
                error::invalid_argument(format!("unknown scenario '{}'", s))
                    .with_operation("scenario::from_str")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.name().parse::<Scenario>().unwrap(), scenario);
        }
        let err = "bogus".parse::<Scenario>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentFault);
    }

    #[test]
    fn test_tables_accept_expected_kind() {
        for scenario in Scenario::ALL {
            let table = scenario.handlers();
            assert_eq!(
                table.select(scenario.expected_kind()),
                Some(0),
                "{scenario} should route its own failure to its first handler"
            );
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_io_handler() {
        let table = Scenario::MissingFile.handlers();
        assert_eq!(table.select(ErrorKind::ResourceAccessFailure), Some(1));
        assert_eq!(table.select(ErrorKind::ArithmeticFault), None);
    }

    #[test]
    fn test_groups() {
        assert_eq!(Scenario::UnknownSymbol.group(), Group::Expected);
        assert_eq!(Scenario::DivideByZero.group(), Group::Runtime);
        let expected = Scenario::ALL.iter().filter(|s| s.group() == Group::Expected).count();
        assert_eq!(expected, 5);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Scenario::ReadPastEnd).unwrap();
        assert_eq!(json, "\"read-past-end\"");
    }
}
