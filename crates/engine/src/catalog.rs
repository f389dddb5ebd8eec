use tracing::debug;

use crate::error::{EngineError, Result};
use crate::track::Track;

/// Tracks received at load time plus the currently selected index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
    selected: Option<usize>,
}

impl TrackCatalog {
    /// Replaces the whole catalog.
    ///
    /// Selects the first track when the list is non-empty and returns its
    /// index; returns `None` for an empty list so the caller can show the
    /// no-data state instead.
    pub fn load(&mut self, tracks: Vec<Track>) -> Option<usize> {
        self.tracks = tracks;
        self.selected = None;
        debug!(track_count = self.tracks.len(), "catalog loaded");
        self.select(0)
    }

    /// Clamps `index` into the catalog and makes it current.
    ///
    /// Never fails for out-of-range input; returns `None` only when the
    /// catalog is empty.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        let last = self.tracks.len().checked_sub(1)?;
        let clamped = index.min(last);
        if clamped != index {
            debug!(requested = index, clamped, "track selection clamped");
        }
        self.selected = Some(clamped);
        Some(clamped)
    }

    /// Overwrites one entry in place, keeping order and every other entry.
    pub fn replace(&mut self, index: usize, track: Track) -> Result<()> {
        let len = self.tracks.len();
        let slot = self
            .tracks
            .get_mut(index)
            .ok_or(EngineError::TrackIndexOutOfRange { index, len })?;
        *slot = track;
        Ok(())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&Track> {
        self.selected.and_then(|index| self.tracks.get(index))
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
