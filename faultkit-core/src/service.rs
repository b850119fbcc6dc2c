//! # Service endpoints
//!
//! Network-service-like collaborators (a database, typically). The core
//! only ever calls `connect` and looks at success or the raw failure.

use crate::error::{self, RawFailure, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use url::Url;

/// Default connect timeout for [`TcpEndpoint`]
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Login credentials for a service
#[derive(Clone, Default)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An established connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub peer: Option<SocketAddr>,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// Service endpoint trait
pub trait ServiceEndpoint: Send + Sync {
    fn connect(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> std::result::Result<Connection, RawFailure>;

    fn name(&self) -> &'static str;
}

/// Parse a service URL. A leading `jdbc:` is accepted and dropped.
pub fn parse_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix("jdbc:").unwrap_or(trimmed);
    let url = Url::parse(stripped).map_err(|e| {
        error::invalid_argument(format!("invalid service url '{}': {}", raw, e))
            .with_operation("service::parse_url")
    })?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(error::invalid_argument(format!("service url '{}' has no host", raw))
            .with_operation("service::parse_url"));
    }
    Ok(url)
}

/// Well-known port for a URL scheme
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "mysql" | "mariadb" => Some(3306),
        "postgres" | "postgresql" => Some(5432),
        "redis" => Some(6379),
        "mongodb" => Some(27017),
        _ => None,
    }
}

fn target(url: &Url) -> std::result::Result<(String, u16, String), RawFailure> {
    let host = url
        .host_str()
        .ok_or_else(|| RawFailure::InvalidArgument(format!("{} has no host", url)))?
        .to_string();
    let port = url
        .port()
        .or_else(|| default_port(url.scheme()))
        .ok_or_else(|| RawFailure::InvalidArgument(format!("{} has no port", url)))?;
    let database = url.path().trim_start_matches('/').to_string();
    Ok((host, port, database))
}

/// Connects over TCP. Reaching the port counts as connected; no wire
/// protocol is spoken.
#[derive(Debug, Clone)]
pub struct TcpEndpoint {
    timeout: Duration,
}

impl TcpEndpoint {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TcpEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl ServiceEndpoint for TcpEndpoint {
    fn connect(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> std::result::Result<Connection, RawFailure> {
        let (host, port, database) = target(url)?;
        let addrs = (host.as_str(), port).to_socket_addrs().map_err(|e| {
            RawFailure::Service(format!("cannot resolve {}:{}: {}", host, port, e))
        })?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_stream) => {
                    return Ok(Connection {
                        host,
                        port,
                        database,
                        user: credentials.user.clone(),
                        peer: Some(addr),
                    })
                }
                Err(e) => last_error = Some(e),
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no addresses resolved".to_string());
        Err(RawFailure::Service(format!(
            "Communications link failure to {}:{}: {}",
            host, port, reason
        )))
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}

/// In-memory endpoint with a fixed set of databases
#[derive(Debug, Clone, Default)]
pub struct StaticEndpoint {
    databases: HashSet<String>,
    unreachable: bool,
}

impl StaticEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// An endpoint that refuses every connection
    pub fn unreachable() -> Self {
        Self {
            databases: HashSet::new(),
            unreachable: true,
        }
    }

    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.databases.insert(name.into());
        self
    }
}

impl ServiceEndpoint for StaticEndpoint {
    fn connect(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> std::result::Result<Connection, RawFailure> {
        let (host, port, database) = target(url)?;
        if self.unreachable {
            return Err(RawFailure::Service(format!(
                "Communications link failure to {}:{}: connection refused",
                host, port
            )));
        }
        if !self.databases.contains(&database) {
            return Err(RawFailure::Service(format!("Unknown database '{}'", database)));
        }
        Ok(Connection {
            host,
            port,
            database,
            user: credentials.user.clone(),
            peer: None,
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify, ErrorKind};
    use std::net::TcpListener;

    fn creds() -> Credentials {
        Credentials::new("user", "password")
    }

    #[test]
    fn test_parse_url_strips_jdbc() {
        let url = parse_url("jdbc:mysql://localhost:3306/nonexistentdb").unwrap();
        assert_eq!(url.scheme(), "mysql");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(3306));
        assert_eq!(url.path(), "/nonexistentdb");
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        let err = parse_url("not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgumentFault);
    }

    #[test]
    fn test_default_port() {
        let url = parse_url("postgres://db.internal/app").unwrap();
        let (_, port, database) = target(&url).unwrap();
        assert_eq!(port, 5432);
        assert_eq!(database, "app");
    }

    #[test]
    fn test_static_endpoint() {
        let endpoint = StaticEndpoint::new().with_database("app");

        let url = parse_url("mysql://localhost:3306/app").unwrap();
        let conn = endpoint.connect(&url, &creds()).unwrap();
        assert_eq!(conn.to_string(), "user@localhost:3306/app");

        let url = parse_url("mysql://localhost:3306/nonexistentdb").unwrap();
        let raw = endpoint.connect(&url, &creds()).unwrap_err();
        assert_eq!(classify(&raw), ErrorKind::ExternalServiceFailure);
        assert_eq!(raw.to_string(), "Unknown database 'nonexistentdb'");
    }

    #[test]
    fn test_unreachable_endpoint() {
        let endpoint = StaticEndpoint::unreachable().with_database("app");
        let url = parse_url("mysql://localhost:3306/app").unwrap();
        let raw = endpoint.connect(&url, &creds()).unwrap_err();
        assert_eq!(classify(&raw), ErrorKind::ExternalServiceFailure);
    }

    #[test]
    fn test_tcp_endpoint_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = parse_url(&format!("mysql://127.0.0.1:{}/nonexistentdb", port)).unwrap();
        let raw = TcpEndpoint::default().connect(&url, &creds()).unwrap_err();
        assert_eq!(classify(&raw), ErrorKind::ExternalServiceFailure);
        assert!(raw.to_string().starts_with("Communications link failure"));
    }

    #[test]
    fn test_tcp_endpoint_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = parse_url(&format!("mysql://127.0.0.1:{}/app", port)).unwrap();

        let conn = TcpEndpoint::default().connect(&url, &creds()).unwrap();
        assert_eq!(conn.database, "app");
        assert_eq!(conn.peer.map(|p| p.port()), Some(port));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", creds());
        assert!(debug.contains("user"));
        assert!(!debug.contains("\"password\""));
        assert!(debug.contains("<redacted>"));
    }
}
