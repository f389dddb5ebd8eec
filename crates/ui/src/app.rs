use std::sync::mpsc::TrySendError;

use engine::{
    Bound, ClientConfig, Command, Engine, Event, OperationFailure, Reply, Request, ViewSnapshot,
};
use iced::widget::{
    Space, button, canvas, center, column, container, opaque, row, stack, text, text_input,
};
use iced::{Color, Element, Length, Subscription, Task};
use tracing::{debug, error, info};

use crate::bridge::{BridgeEvent, RequestSender, worker_subscription};
use crate::widgets::{map, track_list};

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    Bridge(BridgeEvent),
    TrackSelected(usize),
    StartInputChanged(String),
    EndInputChanged(String),
    /// Enter pressed in an input; rewrites it with the applied value.
    InputSubmitted,
    CropPressed,
    SavePressed,
    ResetPressed,
    NoticeDismissed,
}

/// Root UI state. Owns the engine; the worker only sees [`Request`]s.
pub struct AppState {
    config: ClientConfig,
    engine: Engine,
    worker_tx: Option<RequestSender>,
    view: ViewSnapshot,
    start_input: String,
    end_input: String,
    /// Input being typed into; its text is not overwritten until committed.
    editing: Option<Bound>,
    notice: Option<String>,
    status: String,
    map_cache: canvas::Cache,
}

impl AppState {
    /// Boots the app; the catalog is requested once the worker reports ready.
    pub fn boot(config: ClientConfig) -> (Self, Task<Message>) {
        info!(server_url = %config.server_url, "starting track cropper");
        (Self::new(config, None, "connecting to backend"), Task::none())
    }

    fn new(config: ClientConfig, worker_tx: Option<RequestSender>, status: &str) -> Self {
        let engine = Engine::new();
        let view = engine.view();
        Self {
            config,
            engine,
            worker_tx,
            view,
            start_input: String::new(),
            end_input: String::new(),
            editing: None,
            notice: None,
            status: String::from(status),
            map_cache: canvas::Cache::new(),
        }
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match &message {
            Message::StartInputChanged(_) if self.editing == Some(Bound::Start) => {}
            Message::EndInputChanged(_) if self.editing == Some(Bound::End) => {}
            _ => self.commit_edit(),
        }

        match message {
            Message::Bridge(BridgeEvent::Ready {
                sender,
                host_user_id,
            }) => {
                self.worker_tx = Some(sender);
                self.status = String::from("loading tracks");
                let user_id = self.config.resolve_user_id(host_user_id);
                self.handle(Command::Start { user_id });
            }
            Message::Bridge(BridgeEvent::Reply(reply)) => {
                self.handle(Command::Resolve(reply));
            }
            Message::Bridge(BridgeEvent::Disconnected) => {
                self.status = String::from("worker stopped");
                self.worker_tx = None;
                self.fail_in_flight("worker is not running");
            }
            Message::TrackSelected(index) => self.handle(Command::Select { index }),
            Message::StartInputChanged(value) => {
                self.editing = Some(Bound::Start);
                self.start_input = value;
                if let Ok(value) = self.start_input.trim().parse::<i64>() {
                    self.handle(Command::SetStart { value });
                }
            }
            Message::EndInputChanged(value) => {
                self.editing = Some(Bound::End);
                self.end_input = value;
                if let Ok(value) = self.end_input.trim().parse::<i64>() {
                    self.handle(Command::SetEnd { value });
                }
            }
            Message::CropPressed => self.handle(Command::Crop),
            Message::SavePressed => self.handle(Command::Download),
            Message::ResetPressed => self.handle(Command::Reset),
            Message::InputSubmitted => {}
            Message::NoticeDismissed => self.notice = None,
        }

        Task::none()
    }

    fn handle(&mut self, command: Command) {
        match self.engine.handle_command(command) {
            Ok(events) => {
                for event in events {
                    self.apply_engine_event(event);
                }
            }
            Err(err) => {
                error!(error = %err, "engine command failed");
                self.notice = Some(err.to_string());
            }
        }
    }

    fn apply_engine_event(&mut self, event: Event) {
        match event {
            Event::ViewChanged(snapshot) => self.apply_snapshot(snapshot),
            Event::InputCorrected { bound, value } if self.editing != Some(bound) => match bound {
                Bound::Start => self.start_input = value.to_string(),
                Bound::End => self.end_input = value.to_string(),
            },
            Event::InputCorrected { bound, value } => {
                debug!(?bound, value, "correction deferred until the input is committed");
            }
            Event::Dispatch(request) => self.dispatch(request),
            Event::Notify(failure) => self.notice = Some(failure.message),
        }
    }

    fn apply_snapshot(&mut self, snapshot: ViewSnapshot) {
        let paths = |view: &ViewSnapshot| view.map.as_ref().map(|map| map.paths.clone());
        if paths(&self.view) != paths(&snapshot) {
            self.map_cache.clear();
        }
        self.view = snapshot;
        self.sync_inputs();
        self.status = if self.view.busy {
            String::from("working")
        } else if self.view.no_data {
            String::from("no tracks")
        } else {
            String::from("ready")
        };
    }

    /// Rewrites the input texts from the last snapshot, except the one being typed into.
    fn sync_inputs(&mut self) {
        let (start, end) = match self.view.inputs {
            Some(inputs) => (inputs.start.to_string(), inputs.end.to_string()),
            None => (String::new(), String::new()),
        };
        if self.editing != Some(Bound::Start) {
            self.start_input = start;
        }
        if self.editing != Some(Bound::End) {
            self.end_input = end;
        }
    }

    fn commit_edit(&mut self) {
        if self.editing.take().is_some() {
            self.sync_inputs();
        }
    }

    /// Fails the operation in flight, if any, as a transport failure.
    fn fail_in_flight(&mut self, message: &str) {
        let Some(ticket) = self.engine.operation().ticket() else {
            if self.view.tracks.is_empty() && !self.view.no_data {
                let failure = OperationFailure::transport(message);
                self.handle(Command::Resolve(Reply::Catalog(Err(failure))));
            }
            return;
        };
        let reply = Reply::Operation {
            kind: ticket.kind,
            track_id: ticket.track_id,
            result: Err(OperationFailure::transport(message)),
        };
        self.handle(Command::Resolve(reply));
    }

    fn dispatch(&mut self, request: Request) {
        let Some(sender) = &self.worker_tx else {
            self.fail_request(request, "worker is not running");
            return;
        };
        match sender.try_send(request) {
            Ok(()) => debug!("request handed to worker"),
            Err(TrySendError::Full(request)) => {
                self.fail_request(request, "worker queue is full");
            }
            Err(TrySendError::Disconnected(request)) => {
                self.worker_tx = None;
                self.fail_request(request, "worker is not running");
            }
        }
    }

    fn fail_request(&mut self, request: Request, message: &str) {
        let reply = Reply::failed(&request, OperationFailure::transport(message));
        self.handle(Command::Resolve(reply));
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let controls = self.view.controls;

        let body: Element<'_, Message> = if self.view.no_data && self.view.tracks.is_empty() {
            center(text("No tracks available")).into()
        } else {
            let inputs = match self.view.inputs {
                Some(inputs) => row![
                    text(format!("Start [{}, {}]", inputs.min, inputs.max)),
                    text_input("start", &self.start_input)
                        .on_input_maybe(controls.inputs_enabled.then_some(Message::StartInputChanged))
                        .on_submit(Message::InputSubmitted)
                        .width(Length::Fixed(96.0)),
                    text(format!("End [{}, {}]", inputs.min, inputs.max)),
                    text_input("end", &self.end_input)
                        .on_input_maybe(controls.inputs_enabled.then_some(Message::EndInputChanged))
                        .on_submit(Message::InputSubmitted)
                        .width(Length::Fixed(96.0)),
                ]
                .spacing(8),
                None => row![text("Track has no points")],
            };

            let buttons = row![
                button("Crop").on_press_maybe(controls.crop_enabled.then_some(Message::CropPressed)),
                button("Save").on_press_maybe(controls.save_enabled.then_some(Message::SavePressed)),
                button("Reset")
                    .on_press_maybe(controls.reset_enabled.then_some(Message::ResetPressed)),
            ]
            .spacing(12);

            let loader = if self.view.busy {
                text("Working...")
            } else {
                text("")
            };

            row![
                track_list::view(
                    &self.view.tracks,
                    controls.switch_enabled,
                    Message::TrackSelected
                ),
                column![
                    map::view(self.view.map.as_ref(), &self.map_cache),
                    inputs,
                    buttons,
                    loader,
                ]
                .spacing(12)
                .width(Length::Fill),
            ]
            .spacing(16)
            .into()
        };

        let base: Element<'_, Message> = column![body, text(format!("Status: {}", self.status))]
            .spacing(12)
            .padding(16)
            .into();

        match &self.notice {
            Some(message) => with_notice(base, message),
            None => base,
        }
    }

    /// Subscribes to replies emitted by the worker thread.
    pub fn subscription(&self) -> Subscription<Message> {
        worker_subscription(&self.config).map(Message::Bridge)
    }

    #[cfg(test)]
    fn from_sender_for_test(worker_tx: RequestSender) -> Self {
        Self::new(ClientConfig::default(), Some(worker_tx), "idle")
    }
}

/// Blocks the base view until the notice is acknowledged.
fn with_notice<'a>(base: Element<'a, Message>, message: &'a str) -> Element<'a, Message> {
    let backdrop = opaque(
        container(Space::new(Length::Fill, Length::Fill)).style(|_theme| container::Style {
            background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
            ..Default::default()
        }),
    );
    let dialog = container(
        column![
            text(message),
            button("OK").on_press(Message::NoticeDismissed),
        ]
        .spacing(12),
    )
    .padding(16)
    .max_width(420.0)
    .style(container::rounded_box);

    stack![base, backdrop, center(opaque(dialog))].into()
}
