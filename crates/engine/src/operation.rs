use crate::error::EngineError;
use crate::track::{Track, TrackId};

/// Server operations driven by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Crop,
    Reset,
    Download,
}

/// Network work handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    LoadTracks {
        user_id: i64,
    },
    Crop {
        track_id: TrackId,
        start_index: usize,
        end_index: usize,
    },
    Reset {
        track_id: TrackId,
    },
    Download {
        track_id: TrackId,
        file_name: String,
    },
}

impl Request {
    /// Operation this request belongs to; `None` for the catalog load.
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Self::LoadTracks { .. } => None,
            Self::Crop { .. } => Some(OperationKind::Crop),
            Self::Reset { .. } => Some(OperationKind::Reset),
            Self::Download { .. } => Some(OperationKind::Download),
        }
    }

    pub fn track_id(&self) -> Option<TrackId> {
        match self {
            Self::LoadTracks { .. } => None,
            Self::Crop { track_id, .. }
            | Self::Reset { track_id }
            | Self::Download { track_id, .. } => Some(*track_id),
        }
    }
}

/// Identity of the track an in-flight operation was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub kind: OperationKind,
    pub index: usize,
    pub track_id: TrackId,
    pub unique_id: String,
}

/// `Idle -> Busy -> Idle`; at most one operation is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OperationState {
    #[default]
    Idle,
    Busy(Ticket),
}

impl OperationState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Self::Idle => None,
            Self::Busy(ticket) => Some(ticket),
        }
    }
}

/// How a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never completed.
    Transport,
    /// The server (or its payload) refused the request.
    Rejected,
}

/// User-facing failure payload, shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl OperationFailure {
    pub fn from_error(error: &EngineError) -> Self {
        let kind = if error.is_transport() {
            FailureKind::Transport
        } else {
            FailureKind::Rejected
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    Track(Track),
    Downloaded,
}

pub type OperationResult = std::result::Result<OperationOutput, OperationFailure>;

/// Worker answer to one [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Catalog(std::result::Result<Vec<Track>, OperationFailure>),
    Operation {
        kind: OperationKind,
        track_id: TrackId,
        result: OperationResult,
    },
}

impl Reply {
    /// Builds the failure reply matching `request`.
    pub fn failed(request: &Request, failure: OperationFailure) -> Self {
        match (request.kind(), request.track_id()) {
            (Some(kind), Some(track_id)) => Self::Operation {
                kind,
                track_id,
                result: Err(failure),
            },
            _ => Self::Catalog(Err(failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use track_api::TrackApiError;

    use super::{FailureKind, OperationFailure, OperationKind, Reply, Request};
    use crate::error::EngineError;

    #[test]
    fn rejected_api_error_keeps_server_text_verbatim() {
        let error = EngineError::Api(TrackApiError::Rejected {
            status: 400,
            body: String::from("bad range"),
        });

        let failure = OperationFailure::from_error(&error);

        assert_eq!(failure.kind, FailureKind::Rejected);
        assert_eq!(failure.message, "bad range");
    }

    #[test]
    fn transport_api_error_maps_to_transport_kind() {
        let error = EngineError::Api(TrackApiError::Transport {
            url: String::from("http://127.0.0.1:9/crop/"),
            message: String::from("connection refused"),
        });

        assert_eq!(
            OperationFailure::from_error(&error).kind,
            FailureKind::Transport
        );
    }

    #[test]
    fn invalid_track_maps_to_rejected_kind() {
        let error = EngineError::InvalidTrack {
            track_id: 1,
            reason: String::from("unique id is empty"),
        };

        assert_eq!(
            OperationFailure::from_error(&error).kind,
            FailureKind::Rejected
        );
    }

    #[test]
    fn failed_reply_mirrors_request_identity() {
        let failure = OperationFailure::transport("worker is gone");

        let reply = Reply::failed(&Request::Reset { track_id: 8 }, failure.clone());
        assert_eq!(
            reply,
            Reply::Operation {
                kind: OperationKind::Reset,
                track_id: 8,
                result: Err(failure.clone()),
            }
        );

        let reply = Reply::failed(&Request::LoadTracks { user_id: 1 }, failure.clone());
        assert_eq!(reply, Reply::Catalog(Err(failure)));
    }
}
