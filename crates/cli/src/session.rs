use std::collections::VecDeque;

use engine::{
    Command, Dispatcher, Engine, Event, HostIntegration, Track, TrackBackend, ViewSnapshot,
};
use tracing::{debug, info};

/// Drives an [`Engine`] synchronously, executing dispatched requests inline.
pub struct Session<B, H> {
    engine: Engine,
    dispatcher: Dispatcher<B, H>,
    view: ViewSnapshot,
    notices: Vec<String>,
    corrections: Vec<String>,
}

impl<B: TrackBackend, H: HostIntegration> Session<B, H> {
    pub fn new(dispatcher: Dispatcher<B, H>) -> Self {
        let engine = Engine::new();
        let view = engine.view();
        Self {
            engine,
            dispatcher,
            view,
            notices: Vec::new(),
            corrections: Vec::new(),
        }
    }

    /// Applies `command` and every follow-up it triggers.
    ///
    /// Returns the notices raised while doing so.
    pub fn run(&mut self, command: Command) -> engine::Result<Vec<String>> {
        let mut queue = VecDeque::from(self.engine.handle_command(command)?);
        while let Some(event) = queue.pop_front() {
            match event {
                Event::ViewChanged(view) => self.view = view,
                Event::InputCorrected { bound, value } => {
                    info!(?bound, value, "bound adjusted");
                    self.corrections.push(format!("{bound:?} adjusted to {value}"));
                }
                Event::Dispatch(request) => {
                    debug!(?request, "executing inline");
                    let reply = self.dispatcher.execute(request);
                    queue.extend(self.engine.handle_command(Command::Resolve(reply))?);
                }
                Event::Notify(failure) => self.notices.push(failure.message),
            }
        }
        Ok(std::mem::take(&mut self.notices))
    }

    pub fn tracks(&self) -> &[Track] {
        self.engine.catalog().tracks()
    }

    pub fn view(&self) -> &ViewSnapshot {
        &self.view
    }

    pub fn dispatcher(&self) -> &Dispatcher<B, H> {
        &self.dispatcher
    }

    /// Drains the input corrections collected so far.
    pub fn take_corrections(&mut self) -> Vec<String> {
        std::mem::take(&mut self.corrections)
    }
}
