use thiserror::Error;

/// Every way a dispatch can fail.
///
/// All variants reach the caller through the dispatch's completion channel,
/// never as a synchronous return from a `log_*` call.
#[derive(Error, Debug)]
pub enum ShipperError {
    /// Local precondition failure (missing token, unusable endpoint), detected
    /// before any network attempt.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The event or its tags could not be represented on the wire.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Network-layer failure, including the request timeout.
    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The collector answered with a non-2xx status.
    #[error("Server error: HTTP {status}")]
    Server { status: u16, body: String },
}

impl ShipperError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ShipperError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShipperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_server_errors() {
        let err = ShipperError::Server {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_server());
        assert_eq!(err.to_string(), "Server error: HTTP 503");

        let err = ShipperError::Configuration("token not set".to_string());
        assert_eq!(err.status(), None);
        assert!(err.is_configuration());
    }

    #[test]
    fn test_timeout_is_a_transport_error() {
        let err = ShipperError::Transport {
            message: "operation timed out".to_string(),
            timed_out: true,
        };
        assert!(err.is_transport());
        assert!(err.is_timeout());
    }

    #[test]
    fn test_json_error_maps_to_encoding() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ShipperError = json_err.into();
        assert!(err.is_encoding());
    }
}
