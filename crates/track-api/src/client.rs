use std::io::Write;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, TrackApiError};
use crate::payload::{CropRequest, TrackPayload, TracksPayload};

/// Blocking client for the cropper backend.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use track_api::TrackApiClient;
///
/// let client = TrackApiClient::new("http://127.0.0.1:8080", Duration::from_secs(30));
/// let tracks = client.list_tracks(42).expect("list should succeed");
/// println!("{} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct TrackApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl TrackApiClient {
    /// Creates a client rooted at `base_url`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches every track stored for `user_id`.
    pub fn list_tracks(&self, user_id: i64) -> Result<Vec<TrackPayload>> {
        let url = self.endpoint(&format!("tracks/{user_id}/"));
        debug!(%url, "listing tracks");
        let response = self.agent.get(&url).call()?;
        let payload: TracksPayload = decode_json(response, "track list")?;
        Ok(payload.tracks)
    }

    /// Crops the stored file to the inclusive point range and returns the new track.
    pub fn crop(&self, request: &CropRequest) -> Result<TrackPayload> {
        let url = self.endpoint("crop/");
        let body = serde_json::to_string(request).map_err(TrackApiError::Encode)?;
        debug!(
            %url,
            track_id = request.track_id,
            start_index = request.start_index,
            end_index = request.end_index,
            "requesting crop"
        );
        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body)?;
        decode_json(response, "cropped track")
    }

    /// Restores the original file for `track_id` and returns the reverted track.
    pub fn reset(&self, track_id: i64) -> Result<TrackPayload> {
        let url = self.endpoint(&format!("reset/{track_id}/"));
        debug!(%url, track_id, "requesting reset");
        let response = self.agent.get(&url).call()?;
        decode_json(response, "reset track")
    }

    /// Absolute URL of the downloadable file for `track_id`.
    pub fn download_url(&self, track_id: i64) -> String {
        self.endpoint(&format!("download/{track_id}/"))
    }

    /// Streams the body behind `url` into `writer` and returns the byte count.
    pub fn fetch_file(&self, url: &str, writer: &mut impl Write) -> Result<u64> {
        let response = self.agent.get(url).call()?;
        let mut reader = response.into_reader();
        let copied = std::io::copy(&mut reader, writer).map_err(|source| TrackApiError::Io {
            context: "stream download body",
            source,
        })?;
        debug!(url, bytes = copied, "download finished");
        Ok(copied)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn decode_json<T>(response: ureq::Response, context: &'static str) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = response.into_string().map_err(|source| TrackApiError::Io {
        context: "read response body",
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| TrackApiError::MalformedPayload { context, source })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TrackApiClient;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = TrackApiClient::new("http://localhost:8080/", Duration::from_secs(1));
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.download_url(12),
            "http://localhost:8080/download/12/"
        );
    }
}
