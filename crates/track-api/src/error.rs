use std::fmt::{Display, Formatter};

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, TrackApiError>;

/// Error type for requests issued against the cropper backend.
#[derive(Debug)]
pub enum TrackApiError {
    /// The request never completed (DNS, connect, TLS, timeout, ...).
    Transport {
        url: String,
        message: String,
    },
    /// The server answered with a non-success status.
    Rejected {
        status: u16,
        body: String,
    },
    MalformedPayload {
        context: &'static str,
        source: serde_json::Error,
    },
    Encode(serde_json::Error),
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl TrackApiError {
    /// Returns `true` when the request never reached a server response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl Display for TrackApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { url, message } => {
                write!(f, "request to {url} failed: {message}")
            }
            Self::Rejected { status, body } => {
                if body.trim().is_empty() {
                    write!(f, "server rejected request with status {status}")
                } else {
                    write!(f, "{body}")
                }
            }
            Self::MalformedPayload { context, source } => {
                write!(f, "malformed {context} payload: {source}")
            }
            Self::Encode(err) => write!(f, "request encoding failed: {err}"),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for TrackApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedPayload { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ureq::Error> for TrackApiError {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(status, response) => Self::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Transport {
                url: transport
                    .url()
                    .map(|url| url.to_string())
                    .unwrap_or_default(),
                message: transport.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TrackApiError;

    #[test]
    fn rejected_error_displays_body_verbatim() {
        let error = TrackApiError::Rejected {
            status: 400,
            body: String::from("bad range"),
        };
        assert_eq!(error.to_string(), "bad range");
        assert!(!error.is_transport());
    }

    #[test]
    fn rejected_error_without_body_mentions_status() {
        let error = TrackApiError::Rejected {
            status: 502,
            body: String::from("  \n"),
        };
        assert_eq!(
            error.to_string(),
            "server rejected request with status 502"
        );
    }
}
