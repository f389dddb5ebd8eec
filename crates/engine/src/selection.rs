use tracing::debug;

use crate::track::{Point, Track};

/// Which end of the selected range an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Outcome of one bound edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundUpdate {
    pub bound: Bound,
    pub requested: i64,
    pub applied: usize,
}

impl BoundUpdate {
    /// `true` when the applied value differs from what the user typed, in
    /// which case the input must be rewritten with `applied`.
    pub fn is_corrected(&self) -> bool {
        i64::try_from(self.applied).map_or(true, |applied| applied != self.requested)
    }
}

/// Marker positions for both ends of the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Markers {
    pub start: Point,
    pub end: Point,
}

/// Range selection derived from the current track.
///
/// Invariant while `ready` and non-empty:
/// `0 <= start_index <= end_index <= flat_points.len() - 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    flat_points: Vec<Point>,
    start_index: usize,
    end_index: usize,
    ready: bool,
}

impl Selection {
    /// Builds a fresh full-range selection for `track`.
    ///
    /// The result is not ready; call [`Selection::mark_ready`] once the view
    /// has been projected.
    pub fn rebuild(track: &Track) -> Self {
        let flat_points = track.flat_points();
        let end_index = flat_points.len().saturating_sub(1);
        debug!(
            track_id = track.track_id,
            point_count = flat_points.len(),
            "selection rebuilt"
        );
        Self {
            flat_points,
            start_index: 0,
            end_index,
            ready: false,
        }
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Blocks further edits until [`Selection::mark_ready`] is called again.
    pub fn suspend(&mut self) {
        self.ready = false;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn flat_points(&self) -> &[Point] {
        &self.flat_points
    }

    /// Highest valid index, `None` for a track without points.
    pub fn last_index(&self) -> Option<usize> {
        self.flat_points.len().checked_sub(1)
    }

    pub fn start_index(&self) -> Option<usize> {
        self.last_index().map(|_| self.start_index)
    }

    pub fn end_index(&self) -> Option<usize> {
        self.last_index().map(|_| self.end_index)
    }

    /// Moves the start bound, clamped into `[0, end_index]`.
    ///
    /// Returns `None` without touching state when the selection is not
    /// ready or has no points.
    pub fn set_start(&mut self, requested: i64) -> Option<BoundUpdate> {
        if !self.ready {
            debug!(requested, "start edit ignored: selection not ready");
            return None;
        }
        self.last_index()?;

        let applied = clamp_index(requested, 0, self.end_index);
        self.start_index = applied;
        Some(self.report(Bound::Start, requested, applied))
    }

    /// Moves the end bound, clamped into `[start_index, len - 1]`.
    pub fn set_end(&mut self, requested: i64) -> Option<BoundUpdate> {
        if !self.ready {
            debug!(requested, "end edit ignored: selection not ready");
            return None;
        }
        let last = self.last_index()?;

        let applied = clamp_index(requested, self.start_index, last);
        self.end_index = applied;
        Some(self.report(Bound::End, requested, applied))
    }

    pub fn markers(&self) -> Option<Markers> {
        Some(Markers {
            start: *self.flat_points.get(self.start_index)?,
            end: *self.flat_points.get(self.end_index)?,
        })
    }

    /// `true` when the range excludes at least one point.
    pub fn is_partial(&self) -> bool {
        self.last_index()
            .is_some_and(|last| self.start_index > 0 || self.end_index < last)
    }

    pub fn crop_allowed(&self) -> bool {
        self.ready && self.is_partial()
    }

    fn report(&self, bound: Bound, requested: i64, applied: usize) -> BoundUpdate {
        let update = BoundUpdate {
            bound,
            requested,
            applied,
        };
        if update.is_corrected() {
            debug!(?bound, requested, applied, "bound clamped");
        }
        update
    }
}

fn clamp_index(requested: i64, low: usize, high: usize) -> usize {
    usize::try_from(requested).map_or(low, |value| value.clamp(low, high))
}
