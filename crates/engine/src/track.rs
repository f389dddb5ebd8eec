use serde::{Deserialize, Serialize};
use track_api::TrackPayload;

use crate::error::{EngineError, Result};

/// Backend identifier of a stored track.
pub type TrackId = i64;

/// Upper bound of the square visualization space on both axes.
pub const VIEWPORT_EXTENT: f64 = 100.0;

/// A point in the `[0, 100]` visualization space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn in_viewport(self) -> bool {
        let inside = |value: f64| value.is_finite() && (0.0..=VIEWPORT_EXTENT).contains(&value);
        inside(self.x) && inside(self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// One contiguous stroke of a track. May be empty.
pub type Segment = Vec<Point>;

/// A loaded track with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub track_id: TrackId,
    pub unique_id: String,
    pub document_id: String,
    pub file_name: String,
    pub segments: Vec<Segment>,
}

impl Track {
    /// Concatenates all segments into the single index space used for selection.
    ///
    /// # Example
    /// ```
    /// use engine::track::{Point, Track};
    ///
    /// let track = Track {
    ///     track_id: 1,
    ///     unique_id: "u".into(),
    ///     document_id: String::new(),
    ///     file_name: "a.gpx".into(),
    ///     segments: vec![
    ///         vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
    ///         vec![],
    ///         vec![Point::new(20.0, 20.0)],
    ///     ],
    /// };
    /// assert_eq!(track.flat_points().len(), 3);
    /// ```
    pub fn flat_points(&self) -> Vec<Point> {
        self.segments.iter().flatten().copied().collect()
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// Non-empty segments, in order. Each one is drawn as its own path.
    pub fn drawable_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|segment| !segment.is_empty())
    }
}

impl TryFrom<TrackPayload> for Track {
    type Error = EngineError;

    fn try_from(value: TrackPayload) -> Result<Self> {
        if value.unique_id.is_empty() {
            return Err(EngineError::InvalidTrack {
                track_id: value.track_id,
                reason: String::from("unique id is empty"),
            });
        }

        let mut segments = Vec::with_capacity(value.segments.len());
        for (segment_index, raw_segment) in value.segments.into_iter().enumerate() {
            let mut segment = Vec::with_capacity(raw_segment.len());
            for (point_index, raw_point) in raw_segment.into_iter().enumerate() {
                let point = Point::from(raw_point);
                if !point.in_viewport() {
                    return Err(EngineError::InvalidTrack {
                        track_id: value.track_id,
                        reason: format!(
                            "point {point_index} of segment {segment_index} is outside the viewport: [{}, {}]",
                            point.x, point.y
                        ),
                    });
                }
                segment.push(point);
            }
            segments.push(segment);
        }

        Ok(Self {
            track_id: value.track_id,
            unique_id: value.unique_id,
            document_id: value.document_id,
            file_name: value.file_name,
            segments,
        })
    }
}
