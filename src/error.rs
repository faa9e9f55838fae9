use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to the generative endpoint
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Upstream answered with a non-success HTTP status
    #[error("API request failed ({status}): {body}")]
    Upstream { status: StatusCode, body: String },

    /// The HTTP call did not complete
    #[error("Failed to reach API: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered but no text could be found in the response
    #[error("Empty response from API: {0}")]
    EmptyResponse(String),

    /// Response text does not match the requested output contract
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    /// Caller input that cannot be turned into a prompt
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No API key configured for an endpoint that needs one
    #[error("GOOGLE_API_KEY not found in config or environment")]
    MissingApiKey,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl BridgeError {
    /// True for every failure that originated at or on the way to the upstream service.
    ///
    /// `EmptyResponse` counts as an upstream failure: the transport succeeded
    /// but upstream produced nothing usable.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            BridgeError::Upstream { .. } | BridgeError::Transport(_) | BridgeError::EmptyResponse(_)
        )
    }

    /// Raw error body returned by upstream, if any
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            BridgeError::Upstream { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_is_upstream() {
        let err = BridgeError::EmptyResponse("no candidates".to_string());
        assert!(err.is_upstream());
        assert!(err.upstream_body().is_none());
    }

    #[test]
    fn test_upstream_keeps_body() {
        let err = BridgeError::Upstream {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error":"bad key"}"#.to_string(),
        };
        assert!(err.is_upstream());
        assert_eq!(err.upstream_body(), Some(r#"{"error":"bad key"}"#));
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn test_decode_is_not_upstream() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = BridgeError::Decode {
            source,
            raw: "not json".to_string(),
        };
        assert!(!err.is_upstream());
        assert!(!BridgeError::InvalidInput("empty".to_string()).is_upstream());
    }
}
