//! # faultkit-error
//!
//! Error taxonomy and classification for faultkit.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what failed (e.g., ResourceNotFound, ArithmeticFault)
//! - **Specificity**: Every kind knows its generalization, so a handler for
//!   `ResourceAccessFailure` also accepts `ResourceNotFound`
//! - **RawFailure**: What collaborators report before classification
//! - **Error Context**: Assist in locating the cause with rich context
//!
//! ## Usage
//!
//! ```rust
//! use faultkit_error::{Error, ErrorKind, RawFailure};
//!
//! fn example() -> Result<(), Error> {
//!     let raw = RawFailure::Symbol("com.nonexistent.Class".into());
//!     Err(Error::from(raw)
//!         .with_operation("ops::resolve_symbol")
//!         .with_context("resolver", "symbol_table"))
//! }
//!
//! let err = example().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::SymbolResolutionFailure);
//! ```
//!
//! ## Principles
//!
//! - All fallible operations return `Result<T, faultkit_error::Error>`
//! - Raw failures are classified exactly once, at the failure site
//! - Broader categories are derived from `ErrorKind::parent`, never stored

mod error;
mod kind;
mod raw;

pub use error::Error;
pub use kind::ErrorKind;
pub use raw::{classify, RawFailure};

/// Result type alias using the faultkit Error
pub type Result<T> = std::result::Result<T, Error>;
