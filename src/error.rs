use thiserror::Error;

/// Failure of the outbound generative-language call.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gemini API request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Gemini API transport failure: {0}")]
    Transport(String),

    #[error("Gemini API returned no usable content: {0}")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Transport(format!("malformed response body: {err}"))
    }
}

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Booking error: {0}")]
    Booking(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display_carries_status() {
        let err = GatewayError::HttpStatus {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gemini API request failed with status 503: overloaded"
        );
    }

    #[test]
    fn test_gateway_error_converts_into_advisor_error() {
        let err: AdvisorError = GatewayError::EmptyResponse("no candidates".to_string()).into();
        assert!(matches!(
            err,
            AdvisorError::Gateway(GatewayError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_a_transport_failure() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GatewayError = parse_err.into();
        assert!(matches!(err, GatewayError::Transport(_)));
    }
}
