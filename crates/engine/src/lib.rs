//! UI-agnostic track cropping engine.

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod operation;
pub mod selection;
pub mod track;
pub mod view;

pub use api::{CATALOG_LOAD_FAILED, Command, Engine, Event};
pub use backend::{Dispatcher, HostIntegration, HttpTrackBackend, TrackBackend};
pub use config::{ClientConfig, FALLBACK_USER_ID};
pub use error::{EngineError, Result};
pub use operation::{
    FailureKind, OperationFailure, OperationKind, OperationOutput, OperationState, Reply, Request,
};
pub use selection::{Bound, Markers};
pub use track::{Point, Segment, Track, TrackId, VIEWPORT_EXTENT};
pub use view::{ControlState, InputView, MapView, TrackListEntry, ViewSnapshot};
