use crate::catalog::TrackCatalog;
use crate::ledger::CropLedger;
use crate::operation::OperationState;
use crate::selection::{Markers, Selection};
use crate::track::Point;

/// One row of the track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackListEntry {
    pub index: usize,
    pub file_name: String,
    pub selected: bool,
}

/// Geometry of the selected track: one path per non-empty segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub paths: Vec<Vec<Point>>,
    pub markers: Option<Markers>,
}

/// Bounds and values of the two numeric inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputView {
    pub min: usize,
    pub max: usize,
    pub start: usize,
    pub end: usize,
}

/// Enablement of every interactive control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub crop_enabled: bool,
    pub save_enabled: bool,
    pub reset_enabled: bool,
    pub inputs_enabled: bool,
    pub switch_enabled: bool,
}

impl ControlState {
    /// Pure function of the coordinator state, recomputed after every transition.
    pub fn derive(
        catalog: &TrackCatalog,
        selection: &Selection,
        ledger: &CropLedger,
        operation: &OperationState,
    ) -> Self {
        let Some(track) = catalog.current() else {
            return Self::default();
        };
        let ready = selection.is_ready();

        Self {
            crop_enabled: selection.crop_allowed(),
            save_enabled: ready && ledger.contains(&track.unique_id),
            reset_enabled: ready,
            inputs_enabled: ready && selection.last_index().is_some(),
            switch_enabled: !operation.is_busy(),
        }
    }
}

/// Immutable projection of the coordinator state consumed by front ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub tracks: Vec<TrackListEntry>,
    pub map: Option<MapView>,
    pub inputs: Option<InputView>,
    pub controls: ControlState,
    /// Loading indicator.
    pub busy: bool,
    pub no_data: bool,
}

impl ViewSnapshot {
    pub fn project(
        catalog: &TrackCatalog,
        selection: &Selection,
        ledger: &CropLedger,
        operation: &OperationState,
        no_data: bool,
    ) -> Self {
        let selected = catalog.selected_index();
        let tracks = catalog
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| TrackListEntry {
                index,
                file_name: track.file_name.clone(),
                selected: selected == Some(index),
            })
            .collect();

        let map = catalog.current().map(|track| MapView {
            paths: track.drawable_segments().cloned().collect(),
            markers: selection.markers(),
        });

        let inputs = match (
            selection.last_index(),
            selection.start_index(),
            selection.end_index(),
        ) {
            (Some(max), Some(start), Some(end)) if catalog.current().is_some() => {
                Some(InputView {
                    min: 0,
                    max,
                    start,
                    end,
                })
            }
            _ => None,
        };

        Self {
            tracks,
            map,
            inputs,
            controls: ControlState::derive(catalog, selection, ledger, operation),
            busy: operation.is_busy(),
            no_data,
        }
    }
}
