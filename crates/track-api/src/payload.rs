use serde::{Deserialize, Serialize};

/// One `[x, y]` pair as sent by the backend.
pub type PointPayload = [f64; 2];

/// One drawn stroke of a track.
pub type SegmentPayload = Vec<PointPayload>;

/// Track representation returned by `/tracks/`, `/crop/` and `/reset/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPayload {
    pub track_id: i64,
    pub unique_id: String,
    #[serde(default)]
    pub document_id: String,
    pub file_name: String,
    #[serde(default)]
    pub segments: Vec<SegmentPayload>,
}

/// Body of `GET /tracks/{user_id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracksPayload {
    pub tracks: Vec<TrackPayload>,
}

/// Body of `POST /crop/`. Both indices are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRequest {
    pub track_id: i64,
    pub start_index: usize,
    pub end_index: usize,
}
