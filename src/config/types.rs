use serde::Deserialize;
use std::fmt;

/// Which protocol channels the process offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Standard input/output only; stdout carries protocol frames.
    Stdio,
    /// Stateless streamable HTTP only.
    Http,
    /// Both channels.
    #[default]
    All,
}

impl TransportMode {
    /// Resolve the mode from the `--stdio` flag and the `MCP_TRANSPORT` value.
    ///
    /// The flag wins; otherwise `stdio` and `http` select their channel and
    /// every other value (or none) offers both.
    pub fn resolve(stdio_flag: bool, transport: Option<&str>) -> Self {
        if stdio_flag {
            return TransportMode::Stdio;
        }

        match transport.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("stdio") => TransportMode::Stdio,
            Some("http") => TransportMode::Http,
            _ => TransportMode::All,
        }
    }

    pub fn serves_stdio(&self) -> bool {
        matches!(self, TransportMode::Stdio | TransportMode::All)
    }

    pub fn serves_http(&self) -> bool {
        matches!(self, TransportMode::Http | TransportMode::All)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
            TransportMode::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(skip)]
    pub mode: TransportMode,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub tandoor: TandoorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Credentials for the Tandoor REST API.
#[derive(Clone, Default, Deserialize)]
pub struct TandoorConfig {
    pub api_url: Option<String>,
    pub api_token: Option<String>,
}

impl fmt::Debug for TandoorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TandoorConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_stdio_flag_wins() {
        assert_eq!(TransportMode::resolve(true, None), TransportMode::Stdio);
        assert_eq!(
            TransportMode::resolve(true, Some("http")),
            TransportMode::Stdio
        );
    }

    #[test]
    fn test_resolve_from_transport_value() {
        assert_eq!(
            TransportMode::resolve(false, Some("stdio")),
            TransportMode::Stdio
        );
        assert_eq!(
            TransportMode::resolve(false, Some(" STDIO ")),
            TransportMode::Stdio
        );
        assert_eq!(
            TransportMode::resolve(false, Some("http")),
            TransportMode::Http
        );
    }

    #[test]
    fn test_resolve_defaults_to_all() {
        assert_eq!(TransportMode::resolve(false, None), TransportMode::All);
        assert_eq!(TransportMode::resolve(false, Some("")), TransportMode::All);
        assert_eq!(
            TransportMode::resolve(false, Some("sse")),
            TransportMode::All
        );
    }

    #[test]
    fn test_mode_channels() {
        assert!(TransportMode::Stdio.serves_stdio());
        assert!(!TransportMode::Stdio.serves_http());
        assert!(!TransportMode::Http.serves_stdio());
        assert!(TransportMode::Http.serves_http());
        assert!(TransportMode::All.serves_stdio());
        assert!(TransportMode::All.serves_http());
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let config = TandoorConfig {
            api_url: Some("http://localhost:8080/api".to_string()),
            api_token: Some("secret-token".to_string()),
        };

        let rendered = format!("{:?}", config);
        assert!(rendered.contains("localhost"));
        assert!(!rendered.contains("secret-token"));
    }
}
