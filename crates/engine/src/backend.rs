use track_api::{CropRequest, TrackApiClient};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::operation::{OperationFailure, OperationKind, OperationOutput, Reply, Request};
use crate::track::{Track, TrackId};

/// Backend operations required by the dispatcher.
pub trait TrackBackend {
    /// Fetches every track owned by `user_id`.
    fn list_tracks(&self, user_id: i64) -> Result<Vec<Track>>;

    /// Crops a track to the inclusive flat-point range and returns the new track.
    fn crop(&self, track_id: TrackId, start_index: usize, end_index: usize) -> Result<Track>;

    /// Restores the original track.
    fn reset(&self, track_id: TrackId) -> Result<Track>;

    /// URL serving the current file for `track_id`.
    fn download_url(&self, track_id: TrackId) -> String;
}

/// Facilities provided by the environment hosting the client.
pub trait HostIntegration {
    /// Identity supplied by the host, if any.
    fn user_id(&self) -> Option<i64> {
        None
    }

    /// Native download of `url`, saved under the suggested `file_name`.
    fn download_file(&self, url: &str, file_name: &str) -> Result<()>;

    /// Opens `url` outside the application.
    fn open_external(&self, url: &str) -> Result<()>;
}

/// HTTP-backed backend used by production wiring.
#[derive(Debug, Clone)]
pub struct HttpTrackBackend {
    client: TrackApiClient,
}

impl HttpTrackBackend {
    pub fn new(client: TrackApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TrackApiClient::new(
            config.server_url.clone(),
            config.request_timeout(),
        ))
    }

    pub fn client(&self) -> &TrackApiClient {
        &self.client
    }
}

impl TrackBackend for HttpTrackBackend {
    fn list_tracks(&self, user_id: i64) -> Result<Vec<Track>> {
        self.client
            .list_tracks(user_id)?
            .into_iter()
            .map(Track::try_from)
            .collect()
    }

    fn crop(&self, track_id: TrackId, start_index: usize, end_index: usize) -> Result<Track> {
        let payload = self.client.crop(&CropRequest {
            track_id,
            start_index,
            end_index,
        })?;
        Track::try_from(payload)
    }

    fn reset(&self, track_id: TrackId) -> Result<Track> {
        Track::try_from(self.client.reset(track_id)?)
    }

    fn download_url(&self, track_id: TrackId) -> String {
        self.client.download_url(track_id)
    }
}

/// Executes [`Request`]s against a backend and turns outcomes into [`Reply`]s.
///
/// Lives on the worker thread; never touches engine state.
#[derive(Debug)]
pub struct Dispatcher<B, H> {
    backend: B,
    host: H,
}

impl<B: TrackBackend, H: HostIntegration> Dispatcher<B, H> {
    pub fn new(backend: B, host: H) -> Self {
        Self { backend, host }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Runs one request to completion. Failures are folded into the reply.
    pub fn execute(&self, request: Request) -> Reply {
        debug!(?request, "executing request");
        match request {
            Request::LoadTracks { user_id } => {
                let result = self.backend.list_tracks(user_id).map_err(|err| {
                    warn!(user_id, error = %err, "track list request failed");
                    OperationFailure::from_error(&err)
                });
                if let Ok(tracks) = &result {
                    info!(user_id, count = tracks.len(), "track list received");
                }
                Reply::Catalog(result)
            }
            Request::Crop {
                track_id,
                start_index,
                end_index,
            } => operation_reply(
                OperationKind::Crop,
                track_id,
                self.backend
                    .crop(track_id, start_index, end_index)
                    .map(OperationOutput::Track),
            ),
            Request::Reset { track_id } => operation_reply(
                OperationKind::Reset,
                track_id,
                self.backend.reset(track_id).map(OperationOutput::Track),
            ),
            Request::Download {
                track_id,
                file_name,
            } => {
                let url = self.backend.download_url(track_id);
                operation_reply(
                    OperationKind::Download,
                    track_id,
                    self.download(&url, &file_name)
                        .map(|()| OperationOutput::Downloaded),
                )
            }
        }
    }

    fn download(&self, url: &str, file_name: &str) -> Result<()> {
        match self.host.download_file(url, file_name) {
            Ok(()) => {
                info!(url, file_name, "track downloaded");
                Ok(())
            }
            Err(err) => {
                warn!(url, error = %err, "host download failed, opening externally");
                self.host.open_external(url)
            }
        }
    }
}

fn operation_reply(
    kind: OperationKind,
    track_id: TrackId,
    result: Result<OperationOutput>,
) -> Reply {
    let result = result.map_err(|err| {
        warn!(?kind, track_id, error = %err, "operation failed");
        OperationFailure::from_error(&err)
    });
    Reply::Operation {
        kind,
        track_id,
        result,
    }
}
