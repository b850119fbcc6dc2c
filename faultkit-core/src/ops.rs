//! # Fallible operations
//!
//! One wrapper per failure scenario. Each attempts an action, returns the
//! value on success, and a classified [`Error`](crate::Error) otherwise.

use crate::coerce::{self, Coerce};
use crate::error::{self, Error, Result};
use crate::service::{self, Connection, Credentials, ServiceEndpoint};
use crate::store::Store;
use crate::symbol::{Symbol, SymbolResolver};
use serde_json::Value;
use std::path::Path;

/// Detail carried by a rejected age
pub const NEGATIVE_AGE: &str = "Age cannot be negative";

// ============================================================================
// Resource access
// ============================================================================

/// Write `contents` to `path`.
pub fn write_file(store: &Store, path: &Path, contents: &[u8]) -> Result<usize> {
    store
        .write(path, contents)
        .map_err(|e| e.with_operation("ops::write_file"))?;
    Ok(contents.len())
}

/// Read the whole file at `path`.
pub fn read_file(store: &Store, path: &Path) -> Result<Vec<u8>> {
    store
        .read(path)
        .map_err(|e| e.with_operation("ops::read_file"))
}

/// Write a single integer, read it back, then read once more.
///
/// The first read returns `value`; the second fails with
/// PrematureEndOfInput. The value of the second read is returned only if
/// the file somehow held more.
pub fn read_past_end(store: &Store, path: &Path, value: i32) -> Result<i32> {
    store
        .write_ints(path, &[value])
        .map_err(|e| e.with_operation("ops::read_past_end"))?;

    let mut reader = store
        .open_ints(path)
        .map_err(|e| e.with_operation("ops::read_past_end"))?;
    let first = reader
        .read_i32()
        .map_err(|e| e.with_operation("ops::read_past_end"))?;
    tracing::debug!(path = %path.display(), first, "read first integer");

    reader
        .read_i32()
        .map_err(|e| e.with_operation("ops::read_past_end"))
}

// ============================================================================
// Collaborators
// ============================================================================

/// Connect to the service at `url`.
pub fn connect(
    endpoint: &dyn ServiceEndpoint,
    url: &str,
    credentials: &Credentials,
) -> Result<Connection> {
    let parsed = service::parse_url(url).map_err(|e| e.with_operation("ops::connect"))?;
    endpoint.connect(&parsed, credentials).map_err(|raw| {
        Error::from(raw)
            .with_operation("ops::connect")
            .with_context("endpoint", endpoint.name())
            .with_context("url", url)
    })
}

/// Resolve a symbol by name.
pub fn resolve_symbol(resolver: &dyn SymbolResolver, name: &str) -> Result<Symbol> {
    resolver.resolve(name).map_err(|raw| {
        Error::from(raw)
            .with_operation("ops::resolve_symbol")
            .with_context("symbol", name)
    })
}

// ============================================================================
// Programming faults
// ============================================================================

/// Integer division that reports a zero divisor instead of panicking.
pub fn divide(dividend: i64, divisor: i64) -> Result<i64> {
    if divisor == 0 {
        return Err(error::division_by_zero(dividend).with_operation("ops::divide"));
    }
    dividend.checked_div(divisor).ok_or_else(|| {
        error::overflow(format!("{} / {}", dividend, divisor)).with_operation("ops::divide")
    })
}

/// Dereference an optional value.
pub fn deref<T>(value: Option<T>, what: &str) -> Result<T> {
    value.ok_or_else(|| error::null_reference(what).with_operation("ops::deref"))
}

/// Length of an optional string.
pub fn string_length(value: Option<&str>) -> Result<usize> {
    deref(value, "string reference is null").map(str::len)
}

fn position(len: usize, index: i64) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < len)
}

/// Check `index` against a sequence of `len` elements without touching one.
pub fn check_index(len: usize, index: i64) -> Result<usize> {
    position(len, index)
        .ok_or_else(|| error::index_out_of_range(index, len).with_operation("ops::check_index"))
}

/// Bounds-checked element access; `index` may be negative.
pub fn element_at<T>(items: &[T], index: i64) -> Result<&T> {
    position(items.len(), index)
        .map(|i| &items[i])
        .ok_or_else(|| {
            error::index_out_of_range(index, items.len()).with_operation("ops::element_at")
        })
}

/// View a dynamic value as `T`.
pub fn cast<'a, T: Coerce<'a>>(value: &'a Value) -> Result<T> {
    coerce::coerce(value).map_err(|e| e.with_operation("ops::cast"))
}

// ============================================================================
// Input validation
// ============================================================================

/// Accept an age; negative ages are rejected.
pub fn set_age(age: i64) -> Result<()> {
    if age < 0 {
        return Err(error::invalid_argument(NEGATIVE_AGE)
            .with_operation("ops::set_age")
            .with_context("age", age.to_string()));
    }
    Ok(())
}

/// Parse a decimal `i32` literal.
pub fn parse_int(input: &str) -> Result<i32> {
    input
        .parse::<i32>()
        .map_err(|e| error::parse_int_failed(input, e).with_operation("ops::parse_int"))
}
