use thiserror::Error;

/// Failure of a single upstream call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The request never produced a response (DNS, connect, reset)
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Upstream answered with HTTP {status}")]
    Status { status: u16 },

    /// The body could not be decoded into the expected shape
    #[error("Parse error: {0}")]
    Payload(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl SourceError {
    /// True when the upstream could not be reached at all
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Transport(_))
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SourceError::Transport(_) => {
                "Unable to reach the data provider. Please check your internet connection.".to_string()
            }
            SourceError::Status { status } if *status == 429 => {
                "The data provider is rate limiting requests. Please try again later.".to_string()
            }
            SourceError::Status { status } => {
                format!("The data provider returned an error (HTTP {status}).")
            }
            SourceError::Payload(_) => "Received unexpected data from the provider.".to_string(),
            SourceError::NotFound(what) => format!("No data found: {what}"),
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Payload(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
            }
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Payload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(SourceError::Transport("reset".into()).is_transport());
        assert!(!SourceError::Status { status: 500 }.is_transport());
        assert!(!SourceError::Payload("eof".into()).is_transport());
    }

    #[test]
    fn test_user_messages() {
        assert!(SourceError::Status { status: 429 }.user_message().contains("rate limiting"));
        assert!(SourceError::Status { status: 503 }.user_message().contains("503"));
        assert_eq!(
            SourceError::NotFound("Unable to geocode".into()).to_string(),
            "Not found: Unable to geocode"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(matches!(SourceError::from(err), SourceError::Payload(_)));
    }
}
