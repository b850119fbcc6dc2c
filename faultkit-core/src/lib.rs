//! # faultkit-core
//!
//! Fallible operations that fail in predictable ways, and the machinery to
//! recover from them by kind.
//!
//! ## Core Concepts
//! - **Collaborators**: A store, a service endpoint and a symbol resolver,
//!   each behind a narrow trait
//! - **Operations**: One wrapper per failure scenario, returning a
//!   classified `Error`
//! - **Dispatch**: Ordered handler tables, most specific first
//! - **Cleanup**: A step that runs exactly once whatever the outcome
//! - **Harness**: Runs the scenarios and reports one line per failure

pub mod cleanup;
pub mod coerce;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod harness;
pub mod ops;
pub mod scenario;
pub mod service;
pub mod store;
pub mod symbol;

pub use cleanup::{defer, with_cleanup, Cleaned, Deferred};
pub use coerce::{coerce, type_name, Coerce};
pub use config::{DatabaseConfig, FileConfig, HarnessConfig, InputConfig};
pub use dispatch::{HandlerTable, Matcher, Unhandled};
pub use error::{classify, Error, ErrorKind, RawFailure, Result};
pub use harness::{CleanupStatus, Harness, Outcome, Report};
pub use scenario::{Group, Scenario};
pub use service::{Connection, Credentials, ServiceEndpoint, StaticEndpoint, TcpEndpoint};
pub use store::{FileStore, IntReader, MemoryStore, Store, StoreBackend};
pub use symbol::{Symbol, SymbolResolver, SymbolTable};
