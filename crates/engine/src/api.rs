use crate::catalog::TrackCatalog;
use crate::error::Result;
use crate::ledger::CropLedger;
use crate::operation::{
    FailureKind, OperationFailure, OperationKind, OperationOutput, OperationResult,
    OperationState, Reply, Request, Ticket,
};
use crate::selection::{Bound, BoundUpdate, Selection};
use crate::track::{Track, TrackId};
use crate::view::ViewSnapshot;
use tracing::{debug, error, info, warn};

/// Notice shown when the initial catalog cannot be fetched.
pub const CATALOG_LOAD_FAILED: &str = "Something went wrong while loading tracks";

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Starts the session by requesting the catalog for `user_id`.
    Start {
        user_id: i64,
    },
    LoadCatalog(Vec<Track>),
    /// Makes the track at `index` current. Out-of-range indices are clamped.
    ///
    /// Ignored while an operation is in flight.
    Select {
        index: usize,
    },
    /// Moves the start bound to `value`.
    ///
    /// The engine clamps `value` into `[0, end]` and emits
    /// `InputCorrected` when the applied value differs from the request.
    ///
    /// # Example
    /// ```ignore
    /// use engine::{Command, Engine};
    ///
    /// let mut engine = Engine::new();
    /// let _ = engine.handle_command(Command::LoadCatalog(tracks));
    /// let _ = engine.handle_command(Command::SetStart { value: 12 });
    /// ```
    SetStart {
        value: i64,
    },
    /// Moves the end bound to `value`, clamped into `[start, len - 1]`.
    SetEnd {
        value: i64,
    },
    Crop,
    Reset,
    Download,
    /// Applies a worker reply.
    Resolve(Reply),
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ViewChanged(ViewSnapshot),
    /// The numeric input for `bound` must be rewritten with `value`.
    InputCorrected { bound: Bound, value: usize },
    /// Network work to hand to the worker.
    Dispatch(Request),
    /// Blocking notification.
    Notify(OperationFailure),
}

/// Catalog, selection and ledger coordinator.
///
/// All transitions are synchronous; network calls leave the engine as
/// [`Event::Dispatch`] and come back as [`Command::Resolve`].
#[derive(Debug, Default)]
pub struct Engine {
    catalog: TrackCatalog,
    selection: Selection,
    ledger: CropLedger,
    operation: OperationState,
    no_data: bool,
}

impl Engine {
    /// Creates an engine with an empty catalog.
    ///
    /// # Example
    /// ```
    /// use engine::{Command, Engine, Event, Request};
    ///
    /// let mut engine = Engine::new();
    /// let events = engine
    ///     .handle_command(Command::Start { user_id: 7 })
    ///     .expect("start never fails");
    /// assert_eq!(
    ///     events,
    ///     vec![Event::Dispatch(Request::LoadTracks { user_id: 7 })]
    /// );
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one command and returns emitted events.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Start { user_id } => {
                info!(user_id, "requesting track catalog");
                Ok(vec![Event::Dispatch(Request::LoadTracks { user_id })])
            }
            Command::LoadCatalog(tracks) => Ok(self.load(tracks)),
            Command::Select { index } => Ok(self.select(index)),
            Command::SetStart { value } => Ok(self.set_bound(Bound::Start, value)),
            Command::SetEnd { value } => Ok(self.set_bound(Bound::End, value)),
            Command::Crop => Ok(self.begin(OperationKind::Crop)),
            Command::Reset => Ok(self.begin(OperationKind::Reset)),
            Command::Download => Ok(self.begin(OperationKind::Download)),
            Command::Resolve(Reply::Catalog(Ok(tracks))) => Ok(self.load(tracks)),
            Command::Resolve(Reply::Catalog(Err(failure))) => Ok(self.catalog_failed(failure)),
            Command::Resolve(Reply::Operation {
                kind,
                track_id,
                result,
            }) => self.resolve(kind, track_id, result),
        }
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn ledger(&self) -> &CropLedger {
        &self.ledger
    }

    pub fn operation(&self) -> &OperationState {
        &self.operation
    }

    /// Projects the current state for rendering.
    pub fn view(&self) -> ViewSnapshot {
        ViewSnapshot::project(
            &self.catalog,
            &self.selection,
            &self.ledger,
            &self.operation,
            self.no_data,
        )
    }

    fn load(&mut self, tracks: Vec<Track>) -> Vec<Event> {
        self.ledger.clear();
        self.operation = OperationState::Idle;
        match self.catalog.load(tracks) {
            Some(_) => {
                self.no_data = false;
                info!(track_count = self.catalog.len(), "catalog ready");
                self.rebuild()
            }
            None => {
                self.no_data = true;
                self.selection = Selection::default();
                info!("catalog is empty");
                vec![Event::ViewChanged(self.view())]
            }
        }
    }

    fn catalog_failed(&mut self, failure: OperationFailure) -> Vec<Event> {
        error!(kind = ?failure.kind, message = %failure.message, "catalog load failed");
        self.no_data = true;
        vec![
            Event::Notify(OperationFailure {
                kind: failure.kind,
                message: String::from(CATALOG_LOAD_FAILED),
            }),
            Event::ViewChanged(self.view()),
        ]
    }

    fn select(&mut self, index: usize) -> Vec<Event> {
        if self.operation.is_busy() {
            debug!(index, "track switch ignored: operation in flight");
            return Vec::new();
        }
        if self.catalog.select(index).is_none() {
            debug!(index, "track switch ignored: catalog is empty");
            return Vec::new();
        }
        self.rebuild()
    }

    /// Rebuilds the selection for the current track and renders it.
    fn rebuild(&mut self) -> Vec<Event> {
        let Some(track) = self.catalog.current() else {
            self.selection = Selection::default();
            return vec![Event::ViewChanged(self.view())];
        };
        self.selection = Selection::rebuild(track);
        self.selection.mark_ready();
        vec![Event::ViewChanged(self.view())]
    }

    fn set_bound(&mut self, bound: Bound, value: i64) -> Vec<Event> {
        let update = match bound {
            Bound::Start => self.selection.set_start(value),
            Bound::End => self.selection.set_end(value),
        };
        let Some(update) = update else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(2);
        if update.is_corrected() {
            events.push(correction(update));
        }
        events.push(Event::ViewChanged(self.view()));
        events
    }

    fn begin(&mut self, kind: OperationKind) -> Vec<Event> {
        if self.operation.is_busy() || !self.selection.is_ready() {
            debug!(?kind, "operation ignored: controls are not ready");
            return Vec::new();
        }
        let (Some(index), Some(track)) = (self.catalog.selected_index(), self.catalog.current())
        else {
            return Vec::new();
        };

        let request = match kind {
            OperationKind::Crop => {
                if !self.selection.crop_allowed() {
                    debug!("crop ignored: selection covers the whole track");
                    return Vec::new();
                }
                let (Some(start_index), Some(end_index)) =
                    (self.selection.start_index(), self.selection.end_index())
                else {
                    debug!("crop ignored: track has no points");
                    return Vec::new();
                };
                Request::Crop {
                    track_id: track.track_id,
                    start_index,
                    end_index,
                }
            }
            OperationKind::Reset => Request::Reset {
                track_id: track.track_id,
            },
            OperationKind::Download => {
                if !self.ledger.contains(&track.unique_id) {
                    debug!(
                        track_id = track.track_id,
                        "download ignored: track has no confirmed crop"
                    );
                    return Vec::new();
                }
                Request::Download {
                    track_id: track.track_id,
                    file_name: track.file_name.clone(),
                }
            }
        };

        let ticket = Ticket {
            kind,
            index,
            track_id: track.track_id,
            unique_id: track.unique_id.clone(),
        };
        info!(?kind, index, track_id = ticket.track_id, "operation dispatched");
        self.selection.suspend();
        self.operation = OperationState::Busy(ticket);

        vec![Event::ViewChanged(self.view()), Event::Dispatch(request)]
    }

    fn resolve(
        &mut self,
        kind: OperationKind,
        track_id: TrackId,
        result: OperationResult,
    ) -> Result<Vec<Event>> {
        let Some(ticket) = self.operation.ticket() else {
            warn!(?kind, track_id, "stale reply ignored: no operation in flight");
            return Ok(Vec::new());
        };
        if ticket.kind != kind || ticket.track_id != track_id {
            warn!(
                ?kind,
                track_id,
                pending_kind = ?ticket.kind,
                pending_track_id = ticket.track_id,
                "stale reply ignored: does not match the operation in flight"
            );
            return Ok(Vec::new());
        }
        let OperationState::Busy(ticket) = std::mem::take(&mut self.operation) else {
            return Ok(Vec::new());
        };

        match result {
            Ok(OperationOutput::Track(track)) if kind != OperationKind::Download => {
                self.apply_track(ticket, track)
            }
            Ok(_) => {
                info!(?kind, track_id, "operation finished");
                self.selection.mark_ready();
                Ok(vec![Event::ViewChanged(self.view())])
            }
            Err(failure) => {
                warn!(
                    ?kind,
                    track_id,
                    transport = failure.kind == FailureKind::Transport,
                    message = %failure.message,
                    "operation failed"
                );
                self.selection.mark_ready();
                Ok(vec![
                    Event::Notify(failure),
                    Event::ViewChanged(self.view()),
                ])
            }
        }
    }

    fn apply_track(&mut self, ticket: Ticket, track: Track) -> Result<Vec<Event>> {
        let still_present = self
            .catalog
            .get(ticket.index)
            .is_some_and(|entry| entry.track_id == ticket.track_id);
        if !still_present {
            warn!(
                index = ticket.index,
                track_id = ticket.track_id,
                "reply discarded: catalog entry changed while the request was in flight"
            );
            self.selection.mark_ready();
            return Ok(vec![Event::ViewChanged(self.view())]);
        }

        match ticket.kind {
            OperationKind::Crop => self.ledger.record(&track.unique_id),
            OperationKind::Reset => {
                self.ledger.discard(&track.unique_id);
                self.ledger.discard(&ticket.unique_id);
            }
            OperationKind::Download => {}
        }
        info!(
            kind = ?ticket.kind,
            index = ticket.index,
            track_id = track.track_id,
            point_count = track.point_count(),
            "track replaced"
        );
        self.catalog.replace(ticket.index, track)?;

        if self.catalog.selected_index() == Some(ticket.index) {
            Ok(self.rebuild())
        } else {
            self.selection.mark_ready();
            Ok(vec![Event::ViewChanged(self.view())])
        }
    }
}

fn correction(update: BoundUpdate) -> Event {
    Event::InputCorrected {
        bound: update.bound,
        value: update.applied,
    }
}

#[cfg(test)]
mod tests {
    use super::{CATALOG_LOAD_FAILED, Command, Engine, Event};
    use crate::operation::{
        FailureKind, OperationFailure, OperationKind, OperationOutput, Reply, Request,
    };
    use crate::selection::Bound;
    use crate::track::{Point, Track};
    use crate::view::ViewSnapshot;

    fn track(track_id: i64, segments: &[&[(f64, f64)]]) -> Track {
        Track {
            track_id,
            unique_id: format!("uniq-{track_id}"),
            document_id: format!("doc-{track_id}"),
            file_name: format!("track-{track_id}.gpx"),
            segments: segments
                .iter()
                .map(|segment| segment.iter().map(|&(x, y)| Point::new(x, y)).collect())
                .collect(),
        }
    }

    fn scenario_track() -> Track {
        track(1, &[&[(0.0, 0.0), (10.0, 10.0)], &[(20.0, 20.0)]])
    }

    fn line_track(track_id: i64, len: usize) -> Track {
        let points: Vec<(f64, f64)> = (0..len).map(|i| (i as f64, 50.0)).collect();
        track(track_id, &[points.as_slice()])
    }

    fn loaded_engine(tracks: Vec<Track>) -> Engine {
        let mut engine = Engine::new();
        engine
            .handle_command(Command::LoadCatalog(tracks))
            .expect("load should succeed");
        engine
    }

    fn last_view(events: &[Event]) -> &ViewSnapshot {
        events
            .iter()
            .rev()
            .find_map(|event| match event {
                Event::ViewChanged(view) => Some(view),
                _ => None,
            })
            .expect("events must contain ViewChanged")
    }

    fn crop_succeeds(engine: &mut Engine, returned: Track) -> Vec<Event> {
        let track_id = engine.catalog().current().expect("current").track_id;
        engine
            .handle_command(Command::Crop)
            .expect("crop should dispatch");
        engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Crop,
                track_id,
                result: Ok(OperationOutput::Track(returned)),
            }))
            .expect("crop reply should apply")
    }

    #[test]
    fn load_selects_first_track_with_full_range() {
        let mut engine = Engine::new();
        let events = engine
            .handle_command(Command::LoadCatalog(vec![scenario_track()]))
            .expect("load should succeed");

        let view = last_view(&events);
        let inputs = view.inputs.expect("inputs");
        assert_eq!((inputs.min, inputs.max), (0, 2));
        assert_eq!((inputs.start, inputs.end), (0, 2));
        assert!(view.tracks[0].selected);
        assert!(engine.selection().is_ready());
        assert!(!view.controls.crop_enabled);
        assert!(view.controls.reset_enabled);
        assert!(!view.no_data);
    }

    #[test]
    fn load_of_empty_catalog_shows_no_data() {
        let mut engine = Engine::new();
        let events = engine
            .handle_command(Command::LoadCatalog(Vec::new()))
            .expect("load should succeed");

        let view = last_view(&events);
        assert!(view.no_data);
        assert!(view.map.is_none());
        assert!(view.inputs.is_none());
        assert_eq!(view.controls, Default::default());
    }

    #[test]
    fn scenario_end_edit_enables_crop() {
        let mut engine = loaded_engine(vec![scenario_track()]);
        assert_eq!(engine.selection().flat_points().len(), 3);

        let events = engine
            .handle_command(Command::SetEnd { value: 1 })
            .expect("edit should apply");

        assert_eq!(events.len(), 1);
        let view = last_view(&events);
        assert_eq!(view.inputs.map(|inputs| inputs.end), Some(1));
        assert!(view.controls.crop_enabled);
        let markers = view.map.as_ref().and_then(|map| map.markers).expect("markers");
        assert_eq!(markers.start, Point::new(0.0, 0.0));
        assert_eq!(markers.end, Point::new(10.0, 10.0));
    }

    #[test]
    fn clamped_edit_emits_input_correction_before_view() {
        let mut engine = loaded_engine(vec![line_track(1, 10)]);
        engine
            .handle_command(Command::SetEnd { value: 3 })
            .expect("edit should apply");

        let events = engine
            .handle_command(Command::SetStart { value: 8 })
            .expect("edit should apply");

        assert_eq!(
            events[0],
            Event::InputCorrected {
                bound: Bound::Start,
                value: 3,
            }
        );
        assert!(matches!(events[1], Event::ViewChanged(_)));
        assert_eq!(engine.selection().start_index(), Some(3));
    }

    #[test]
    fn crop_enablement_tracks_single_point_shrink_at_each_boundary() {
        let mut engine = loaded_engine(vec![line_track(1, 5)]);
        assert!(!engine.view().controls.crop_enabled);

        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        assert!(engine.view().controls.crop_enabled);

        engine.handle_command(Command::SetStart { value: 0 }).unwrap();
        assert!(!engine.view().controls.crop_enabled);

        engine.handle_command(Command::SetEnd { value: 3 }).unwrap();
        assert!(engine.view().controls.crop_enabled);

        engine.handle_command(Command::SetEnd { value: 4 }).unwrap();
        assert!(!engine.view().controls.crop_enabled);
    }

    #[test]
    fn switching_tracks_does_not_persist_selection() {
        let mut engine = loaded_engine(vec![line_track(1, 6), line_track(2, 4)]);
        engine.handle_command(Command::SetStart { value: 2 }).unwrap();
        engine.handle_command(Command::SetEnd { value: 3 }).unwrap();

        engine.handle_command(Command::Select { index: 1 }).unwrap();
        assert_eq!(engine.selection().end_index(), Some(3));

        let events = engine.handle_command(Command::Select { index: 0 }).unwrap();
        let inputs = last_view(&events).inputs.expect("inputs");
        assert_eq!((inputs.start, inputs.end), (0, 5));
    }

    #[test]
    fn select_clamps_out_of_range_index() {
        let mut engine = loaded_engine(vec![line_track(1, 2), line_track(2, 2)]);

        let events = engine.handle_command(Command::Select { index: 40 }).unwrap();

        assert_eq!(engine.catalog().selected_index(), Some(1));
        assert!(last_view(&events).tracks[1].selected);
    }

    #[test]
    fn crop_dispatches_request_and_enters_busy_state() {
        let mut engine = loaded_engine(vec![line_track(5, 6)]);
        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        engine.handle_command(Command::SetEnd { value: 4 }).unwrap();

        let events = engine.handle_command(Command::Crop).unwrap();

        assert_eq!(
            events[1],
            Event::Dispatch(Request::Crop {
                track_id: 5,
                start_index: 1,
                end_index: 4,
            })
        );
        let view = last_view(&events);
        assert!(view.busy);
        assert!(!view.controls.crop_enabled);
        assert!(!view.controls.reset_enabled);
        assert!(!view.controls.inputs_enabled);
        assert!(!view.controls.switch_enabled);
        assert!(!engine.selection().is_ready());
    }

    #[test]
    fn commands_while_busy_are_ignored() {
        let mut engine = loaded_engine(vec![line_track(1, 6), line_track(2, 3)]);
        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        engine.handle_command(Command::Crop).unwrap();

        assert!(engine.handle_command(Command::Crop).unwrap().is_empty());
        assert!(engine.handle_command(Command::Reset).unwrap().is_empty());
        assert!(
            engine
                .handle_command(Command::Select { index: 1 })
                .unwrap()
                .is_empty()
        );
        assert!(
            engine
                .handle_command(Command::SetEnd { value: 2 })
                .unwrap()
                .is_empty()
        );
        assert_eq!(engine.catalog().selected_index(), Some(0));
    }

    #[test]
    fn crop_success_replaces_track_and_enables_save() {
        let mut engine = loaded_engine(vec![line_track(1, 6), line_track(2, 3)]);
        engine.handle_command(Command::SetStart { value: 2 }).unwrap();
        let mut cropped = line_track(1, 4);
        cropped.unique_id = String::from("uniq-1-cropped");

        let events = crop_succeeds(&mut engine, cropped);

        let view = last_view(&events);
        assert!(!view.busy);
        assert!(view.controls.save_enabled);
        assert!(view.controls.switch_enabled);
        assert_eq!(view.inputs.map(|inputs| (inputs.start, inputs.end)), Some((0, 3)));
        assert!(engine.ledger().contains("uniq-1-cropped"));
        assert_eq!(engine.catalog().tracks()[1].track_id, 2);
        assert!(engine.selection().is_ready());
    }

    #[test]
    fn crop_failure_notifies_verbatim_and_keeps_catalog() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);
        engine.handle_command(Command::SetEnd { value: 3 }).unwrap();
        let before = engine.catalog().clone();
        engine.handle_command(Command::Crop).unwrap();

        let events = engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Crop,
                track_id: 1,
                result: Err(OperationFailure {
                    kind: FailureKind::Rejected,
                    message: String::from("bad range"),
                }),
            }))
            .unwrap();

        let Event::Notify(failure) = &events[0] else {
            panic!("failure must notify first");
        };
        assert_eq!(failure.message, "bad range");
        assert!(engine.selection().is_ready());
        assert_eq!(engine.selection().end_index(), Some(3));
        assert_eq!(engine.catalog(), &before);
        assert!(engine.ledger().is_empty());
        assert!(!last_view(&events).busy);
    }

    #[test]
    fn reset_success_removes_ledger_entry_and_disables_save() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);
        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        crop_succeeds(&mut engine, line_track(1, 5));
        assert!(engine.view().controls.save_enabled);

        engine.handle_command(Command::Reset).unwrap();
        let events = engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Reset,
                track_id: 1,
                result: Ok(OperationOutput::Track(line_track(1, 6))),
            }))
            .unwrap();

        assert!(!engine.ledger().contains("uniq-1"));
        assert!(!last_view(&events).controls.save_enabled);
        assert_eq!(engine.selection().end_index(), Some(5));
    }

    #[test]
    fn download_requires_confirmed_crop() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);

        assert!(engine.handle_command(Command::Download).unwrap().is_empty());

        engine.handle_command(Command::SetEnd { value: 4 }).unwrap();
        crop_succeeds(&mut engine, line_track(1, 5));
        let events = engine.handle_command(Command::Download).unwrap();

        assert_eq!(
            events[1],
            Event::Dispatch(Request::Download {
                track_id: 1,
                file_name: String::from("track-1.gpx"),
            })
        );
    }

    #[test]
    fn download_success_keeps_ledger_and_restores_ready() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);
        engine.handle_command(Command::SetEnd { value: 4 }).unwrap();
        crop_succeeds(&mut engine, line_track(1, 5));
        engine.handle_command(Command::Download).unwrap();

        let events = engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Download,
                track_id: 1,
                result: Ok(OperationOutput::Downloaded),
            }))
            .unwrap();

        assert!(engine.ledger().contains("uniq-1"));
        assert!(engine.selection().is_ready());
        assert!(last_view(&events).controls.save_enabled);
    }

    #[test]
    fn reply_without_pending_operation_is_ignored() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);

        let events = engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Crop,
                track_id: 1,
                result: Ok(OperationOutput::Track(line_track(1, 2))),
            }))
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(engine.selection().flat_points().len(), 6);
        assert!(engine.ledger().is_empty());
    }

    #[test]
    fn reply_for_other_track_is_ignored_and_operation_stays_busy() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);
        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        engine.handle_command(Command::Crop).unwrap();

        let events = engine
            .handle_command(Command::Resolve(Reply::Operation {
                kind: OperationKind::Crop,
                track_id: 99,
                result: Ok(OperationOutput::Track(line_track(99, 2))),
            }))
            .unwrap();

        assert!(events.is_empty());
        assert!(engine.operation().is_busy());
        assert_eq!(engine.catalog().tracks()[0].track_id, 1);
    }

    #[test]
    fn catalog_load_failure_notifies_generic_message() {
        let mut engine = Engine::new();

        let events = engine
            .handle_command(Command::Resolve(Reply::Catalog(Err(
                OperationFailure::transport("connection refused"),
            ))))
            .unwrap();

        let Event::Notify(failure) = &events[0] else {
            panic!("load failure must notify");
        };
        assert_eq!(failure.message, CATALOG_LOAD_FAILED);
        assert!(last_view(&events).no_data);
    }

    #[test]
    fn reload_clears_ledger() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);
        engine.handle_command(Command::SetStart { value: 1 }).unwrap();
        crop_succeeds(&mut engine, line_track(1, 5));
        assert!(!engine.ledger().is_empty());

        engine
            .handle_command(Command::Resolve(Reply::Catalog(Ok(vec![line_track(1, 5)]))))
            .unwrap();

        assert!(engine.ledger().is_empty());
        assert!(!engine.view().controls.save_enabled);
    }

    #[test]
    fn full_range_crop_is_not_dispatched() {
        let mut engine = loaded_engine(vec![line_track(1, 6)]);

        assert!(engine.handle_command(Command::Crop).unwrap().is_empty());
        assert!(!engine.operation().is_busy());
    }

    #[test]
    fn track_without_points_disables_inputs_and_crop() {
        let mut engine = loaded_engine(vec![track(3, &[&[], &[]])]);

        let view = engine.view();
        assert!(view.inputs.is_none());
        assert!(!view.controls.crop_enabled);
        assert!(!view.controls.inputs_enabled);
        assert!(view.controls.reset_enabled);
        assert_eq!(view.map.map(|map| map.paths.len()), Some(0));
        assert!(engine.handle_command(Command::Crop).unwrap().is_empty());
        assert!(
            engine
                .handle_command(Command::SetEnd { value: 0 })
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn map_has_one_path_per_non_empty_segment() {
        let engine = loaded_engine(vec![track(
            4,
            &[&[(1.0, 1.0), (2.0, 2.0)], &[], &[(3.0, 3.0)]],
        )]);

        let map = engine.view().map.expect("map");
        assert_eq!(map.paths.len(), 2);
        assert_eq!(map.paths[1], vec![Point::new(3.0, 3.0)]);
    }
}
