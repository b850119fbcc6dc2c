//! # Demonstration harness
//!
//! Runs each scenario as wrapper → dispatcher → cleanup and records what
//! happened. A failure no handler accepts is reported as
//! [`Outcome::Unhandled`] and the next scenario still runs.

use crate::cleanup::with_cleanup;
use crate::config::HarnessConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::ops;
use crate::scenario::{Group, Scenario};
use crate::service::{Credentials, ServiceEndpoint, TcpEndpoint};
use crate::store::Store;
use crate::symbol::{SymbolResolver, SymbolTable};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// What a scenario's operation ended in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// The operation succeeded
    Completed { summary: String },
    /// A handler accepted the failure
    Handled {
        handler: ErrorKind,
        kind: ErrorKind,
        detail: String,
    },
    /// No handler accepted the failure
    Unhandled { kind: ErrorKind, detail: String },
}

impl Outcome {
    pub fn handled(handler: ErrorKind, err: Error) -> Self {
        Outcome::Handled {
            handler,
            kind: err.kind(),
            detail: detail_of(&err),
        }
    }

    pub fn unhandled(err: &Error) -> Self {
        Outcome::Unhandled {
            kind: err.kind(),
            detail: detail_of(err),
        }
    }

    /// The failure kind, if the operation failed
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Completed { .. } => None,
            Outcome::Handled { kind, .. } | Outcome::Unhandled { kind, .. } => Some(*kind),
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, Outcome::Unhandled { .. })
    }
}

fn detail_of(err: &Error) -> String {
    err.detail().unwrap_or(err.kind().as_str()).to_string()
}

/// How a scenario's cleanup went
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CleanupStatus {
    Completed,
    Failed { detail: String },
}

impl From<Result<()>> for CleanupStatus {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => CleanupStatus::Completed,
            Err(err) => CleanupStatus::Failed {
                detail: detail_of(&err),
            },
        }
    }
}

/// The record of one scenario run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub scenario: Scenario,
    pub group: Group,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<CleanupStatus>,
}

impl Report {
    /// Human-readable lines, in the order things happened
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![match &self.outcome {
            Outcome::Completed { summary } => format!("{} completed: {}", self.scenario, summary),
            Outcome::Handled { handler, detail, .. } => format!("{} handled: {}", handler, detail),
            Outcome::Unhandled { kind, detail } => format!("Unhandled {}: {}", kind, detail),
        }];

        match &self.cleanup {
            Some(CleanupStatus::Completed) => lines.push(format!(
                "{} operation completed (whether successful or not)",
                self.scenario
            )),
            Some(CleanupStatus::Failed { detail }) => {
                lines.push(format!("{} cleanup failed: {}", self.scenario, detail))
            }
            None => {}
        }

        lines
    }
}

/// Runs scenarios against a set of collaborators
pub struct Harness {
    config: HarnessConfig,
    store: Store,
    endpoint: Box<dyn ServiceEndpoint>,
    resolver: Box<dyn SymbolResolver>,
}

impl Harness {
    /// File store in the scratch directory, TCP endpoint, builtin symbols
    pub fn new(config: HarnessConfig) -> Result<Self> {
        let store = config
            .files
            .restricted
            .iter()
            .fold(Store::file(&config.files.scratch_dir)?, |store, prefix| {
                store.with_restricted(prefix.clone())
            });
        let endpoint = TcpEndpoint::new(Duration::from_millis(config.database.connect_timeout_ms));
        Ok(Self::with_parts(config, store, endpoint, SymbolTable::builtin()))
    }

    /// Use the given collaborators
    pub fn with_parts(
        config: HarnessConfig,
        store: Store,
        endpoint: impl ServiceEndpoint + 'static,
        resolver: impl SymbolResolver + 'static,
    ) -> Self {
        Self {
            config,
            store,
            endpoint: Box::new(endpoint),
            resolver: Box::new(resolver),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run one scenario
    pub fn run(&self, scenario: Scenario) -> Report {
        tracing::debug!(%scenario, "running scenario");
        let table = scenario.handlers();
        let dispatch = || match table.handle(self.attempt(scenario)) {
            Ok(outcome) => outcome,
            Err(unhandled) => {
                tracing::warn!(%scenario, error = %unhandled.error(), "unhandled failure");
                Outcome::unhandled(unhandled.error())
            }
        };

        let (outcome, cleanup) = if scenario.has_cleanup() {
            // Files that were already there are not ours to remove.
            let created = self
                .scratch_file(scenario)
                .filter(|path| !self.store.exists(path));
            let (outcome, cleanup) = with_cleanup(dispatch, || self.cleanup(created)).into_parts();
            (outcome, Some(CleanupStatus::from(cleanup)))
        } else {
            (dispatch(), None)
        };

        Report {
            scenario,
            group: scenario.group(),
            outcome,
            cleanup,
        }
    }

    /// Run scenarios in order; one failing never stops the rest
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<Report> {
        scenarios.iter().map(|&scenario| self.run(scenario)).collect()
    }

    fn attempt(&self, scenario: Scenario) -> Result<Outcome> {
        let files = &self.config.files;
        let inputs = &self.config.inputs;

        let summary = match scenario {
            Scenario::RestrictedWrite => {
                let written =
                    ops::write_file(&self.store, &files.restricted_target, b"This will fail")?;
                format!("wrote {} bytes to {}", written, files.restricted_target.display())
            }
            Scenario::MissingFile => {
                let bytes = ops::read_file(&self.store, &files.missing_file)?;
                format!("read {} bytes from {}", bytes.len(), files.missing_file.display())
            }
            Scenario::ReadPastEnd => {
                let second = ops::read_past_end(&self.store, &files.data_file, files.data_value)?;
                format!("read a second integer {}", second)
            }
            Scenario::UnreachableService => {
                let database = &self.config.database;
                let credentials = Credentials::new(&database.user, &database.password);
                let connection =
                    ops::connect(self.endpoint.as_ref(), &database.url, &credentials)?;
                format!("connected to {}", connection)
            }
            Scenario::UnknownSymbol => {
                let symbol = ops::resolve_symbol(self.resolver.as_ref(), &inputs.symbol)?;
                format!("resolved {}", symbol.name)
            }
            Scenario::DivideByZero => {
                let quotient = ops::divide(inputs.dividend, inputs.divisor)?;
                format!("{} / {} = {}", inputs.dividend, inputs.divisor, quotient)
            }
            Scenario::NullReference => {
                let len = ops::string_length(inputs.reference.as_deref())?;
                format!("string length is {}", len)
            }
            Scenario::IndexOutOfBounds => {
                let position = ops::check_index(inputs.array_len, inputs.index)?;
                format!("element {} of {} is 0", position, inputs.array_len)
            }
            Scenario::InvalidCoercion => {
                let text: &str = ops::cast(&inputs.coerce_value)?;
                format!("viewed value as string {:?}", text)
            }
            Scenario::InvalidArgument => {
                ops::set_age(inputs.age)?;
                format!("age {} accepted", inputs.age)
            }
            Scenario::NumberFormat => {
                let number = ops::parse_int(&inputs.numeric_input)?;
                format!("parsed {}", number)
            }
        };

        Ok(Outcome::Completed { summary })
    }

    /// The file a scenario writes
    fn scratch_file(&self, scenario: Scenario) -> Option<&Path> {
        let files = &self.config.files;
        match scenario {
            Scenario::RestrictedWrite => Some(&files.restricted_target),
            Scenario::ReadPastEnd => Some(&files.data_file),
            _ => None,
        }
    }

    fn cleanup(&self, created: Option<&Path>) -> Result<()> {
        match created {
            Some(path) => self.store.remove(path),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StaticEndpoint;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn memory_harness(config: HarnessConfig) -> Harness {
        Harness::with_parts(
            config,
            Store::memory().with_restricted("/root"),
            StaticEndpoint::unreachable(),
            SymbolTable::builtin(),
        )
    }

    #[test]
    fn test_every_scenario_is_handled_by_its_first_handler() {
        let harness = memory_harness(HarnessConfig::default());
        let reports = harness.run_all(&Scenario::ALL);
        assert_eq!(reports.len(), Scenario::ALL.len());

        for report in &reports {
            match &report.outcome {
                Outcome::Handled { handler, kind, .. } => {
                    assert_eq!(*kind, report.scenario.expected_kind(), "{}", report.scenario);
                    assert_eq!(*handler, report.scenario.handler_kinds()[0]);
                }
                other => panic!("{} was not handled: {:?}", report.scenario, other),
            }
        }
    }

    #[test]
    fn test_lines() {
        let harness = memory_harness(HarnessConfig::default());

        let report = harness.run(Scenario::InvalidArgument);
        assert_eq!(report.lines(), vec!["InvalidArgumentFault handled: Age cannot be negative"]);

        let report = harness.run(Scenario::RestrictedWrite);
        let lines = report.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ResourceAccessFailure handled: /root/restricted.txt"));
        assert_eq!(
            lines[1],
            "restricted-write operation completed (whether successful or not)"
        );
    }

    #[test]
    fn test_read_past_end_cleans_up() {
        let harness = memory_harness(HarnessConfig::default());
        let report = harness.run(Scenario::ReadPastEnd);

        assert_eq!(report.outcome.kind(), Some(ErrorKind::PrematureEndOfInput));
        assert_eq!(report.cleanup, Some(CleanupStatus::Completed));
        assert!(!harness.store().exists(Path::new("test.dat")));
    }

    #[test]
    fn test_unhandled_does_not_stop_the_run() {
        let mut config = HarnessConfig::default();
        config.database.url = "not a url".to_string();
        let harness = memory_harness(config);

        let reports =
            harness.run_all(&[Scenario::UnreachableService, Scenario::DivideByZero]);
        assert!(reports[0].outcome.is_unhandled());
        assert_eq!(reports[0].outcome.kind(), Some(ErrorKind::InvalidArgumentFault));
        assert!(reports[0].lines()[0].starts_with("Unhandled InvalidArgumentFault: "));
        assert_eq!(reports[1].outcome.kind(), Some(ErrorKind::ArithmeticFault));
    }

    #[test]
    fn test_successful_inputs_complete() {
        let mut config = HarnessConfig::default();
        config.files.restricted_target = PathBuf::from("/tmp/allowed.txt");
        config.inputs.symbol = "java.lang.String".to_string();
        config.inputs.divisor = 2;
        config.inputs.reference = Some("hello".to_string());
        config.inputs.index = 4;
        config.inputs.coerce_value = serde_json::json!("text");
        config.inputs.age = 5;
        config.inputs.numeric_input = "123".to_string();

        let harness = Harness::with_parts(
            config,
            Store::memory(),
            StaticEndpoint::new().with_database("nonexistentdb"),
            SymbolTable::builtin(),
        );

        let completes = [
            Scenario::RestrictedWrite,
            Scenario::UnreachableService,
            Scenario::UnknownSymbol,
            Scenario::DivideByZero,
            Scenario::NullReference,
            Scenario::IndexOutOfBounds,
            Scenario::InvalidCoercion,
            Scenario::InvalidArgument,
            Scenario::NumberFormat,
        ];
        for report in harness.run_all(&completes) {
            assert!(
                matches!(report.outcome, Outcome::Completed { .. }),
                "{} did not complete: {:?}",
                report.scenario,
                report.outcome
            );
        }

        let report = harness.run(Scenario::NumberFormat);
        assert_eq!(report.lines(), vec!["number-format completed: parsed 123"]);
        // The restricted-write cleanup removed the file it wrote.
        assert!(!harness.store().exists(Path::new("/tmp/allowed.txt")));
    }

    #[test]
    fn test_file_backed_harness() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = HarnessConfig::default();
        config.files.scratch_dir = temp_dir.path().to_path_buf();
        config.files.restricted = vec![temp_dir.path().join("locked")];
        config.files.restricted_target = temp_dir.path().join("locked/restricted.txt");

        let harness = Harness::new(config).unwrap();
        let report = harness.run(Scenario::MissingFile);
        assert_eq!(report.outcome.kind(), Some(ErrorKind::ResourceNotFound));

        let report = harness.run(Scenario::RestrictedWrite);
        assert_eq!(report.outcome.kind(), Some(ErrorKind::ResourceAccessFailure));

        let report = harness.run(Scenario::ReadPastEnd);
        assert_eq!(report.outcome.kind(), Some(ErrorKind::PrematureEndOfInput));
        assert!(!temp_dir.path().join("test.dat").exists());
    }

    #[test]
    fn test_huge_array_len_does_not_abort_the_run() {
        let mut config = HarnessConfig::default();
        config.inputs.array_len = usize::MAX;
        let harness = memory_harness(config);

        let reports = harness.run_all(&[Scenario::IndexOutOfBounds, Scenario::DivideByZero]);
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].outcome,
            Outcome::Completed {
                summary: format!("element 10 of {} is 0", usize::MAX),
            }
        );
        assert_eq!(reports[1].outcome.kind(), Some(ErrorKind::ArithmeticFault));
    }

    #[test]
    fn test_cleanup_keeps_files_it_did_not_create() {
        let mut config = HarnessConfig::default();
        config.files.restricted_target = PathBuf::from("/tmp/existing.txt");
        let harness = Harness::with_parts(
            config,
            Store::memory(),
            StaticEndpoint::unreachable(),
            SymbolTable::builtin(),
        );
        let existing = Path::new("/tmp/existing.txt");
        harness.store().write(existing, b"keep me").unwrap();

        let report = harness.run(Scenario::RestrictedWrite);
        assert!(matches!(report.outcome, Outcome::Completed { .. }));
        assert_eq!(report.cleanup, Some(CleanupStatus::Completed));
        assert!(harness.store().exists(existing));
    }

    #[test]
    fn test_report_serializes() {
        let harness = memory_harness(HarnessConfig::default());
        let json = serde_json::to_value(harness.run(Scenario::DivideByZero)).unwrap();
        assert_eq!(json["scenario"], "divide-by-zero");
        assert_eq!(json["group"], "runtime");
        assert_eq!(json["outcome"]["status"], "handled");
        assert_eq!(json["outcome"]["kind"], "ArithmeticFault");
        assert!(json.get("cleanup").is_none());
    }
}
