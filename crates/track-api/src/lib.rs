//! Blocking HTTP client for the track cropper backend.

mod client;
mod error;
mod payload;

pub use client::TrackApiClient;
pub use error::{Result, TrackApiError};
pub use payload::{CropRequest, PointPayload, SegmentPayload, TrackPayload, TracksPayload};
