mod args;
mod host;
mod session;

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

use args::{CliCommand, UsageError};
use engine::config::{default_config_path, load_config};
use engine::{
    ClientConfig, Command, Dispatcher, EngineError, HostIntegration, HttpTrackBackend,
    OperationOutput, Reply, Request,
};
use host::DirectoryHost;
use session::Session;

type CliSession = Session<HttpTrackBackend, DirectoryHost>;

#[derive(Debug)]
enum CliError {
    Usage(UsageError),
    Engine(EngineError),
    /// The backend refused or could not be reached; carries the notice text.
    Notice(String),
    NoTrack(usize),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::Notice(message) => write!(f, "{message}"),
            Self::NoTrack(index) => write!(f, "there is no track at index {index}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Usage(err) => Some(err),
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UsageError> for CliError {
    fn from(value: UsageError) -> Self {
        Self::Usage(value)
    }
}

impl From<EngineError> for CliError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

fn main() -> ExitCode {
    init_tracing();

    match run(std::env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: impl Iterator<Item = String>) -> Result<(), CliError> {
    let command = args::parse(args)?;
    let config = load_client_config();

    let save_dir = match &command {
        CliCommand::Crop { save_dir, .. } => save_dir.clone(),
        CliCommand::Download { dir, .. } => Some(dir.clone()),
        CliCommand::List | CliCommand::Reset { .. } => None,
    };
    let backend = HttpTrackBackend::from_config(&config);
    let host = DirectoryHost::new(
        backend.client().clone(),
        save_dir.unwrap_or_else(|| PathBuf::from(".")),
    );
    let user_id = config.resolve_user_id(host.user_id());
    let mut session = Session::new(Dispatcher::new(backend, host));
    expect_no_notice(session.run(Command::Start { user_id })?)?;

    match command {
        CliCommand::List => {
            for (index, track) in session.tracks().iter().enumerate() {
                println!(
                    "{index}\t{}\t{}\t{} points",
                    track.track_id,
                    track.file_name,
                    track.point_count()
                );
            }
            Ok(())
        }
        CliCommand::Crop {
            index,
            start,
            end,
            save_dir,
        } => {
            select(&mut session, index)?;
            session.run(Command::SetStart { value: start })?;
            session.run(Command::SetEnd { value: end })?;
            for correction in session.take_corrections() {
                eprintln!("note: {correction}");
            }
            if !session.view().controls.crop_enabled {
                println!("selection covers the whole track, nothing to crop");
                return Ok(());
            }
            expect_no_notice(session.run(Command::Crop)?)?;
            print_inputs(&session);
            if save_dir.is_some() {
                expect_no_notice(session.run(Command::Download)?)?;
            }
            Ok(())
        }
        CliCommand::Reset { index } => {
            select(&mut session, index)?;
            expect_no_notice(session.run(Command::Reset)?)?;
            print_inputs(&session);
            Ok(())
        }
        CliCommand::Download { index, .. } => {
            let track = select(&mut session, index)?;
            let reply = session.dispatcher().execute(Request::Download {
                track_id: track.0,
                file_name: track.1,
            });
            match reply {
                Reply::Operation {
                    result: Ok(OperationOutput::Downloaded),
                    ..
                } => Ok(()),
                Reply::Operation {
                    result: Err(failure),
                    ..
                }
                | Reply::Catalog(Err(failure)) => Err(CliError::Notice(failure.message)),
                Reply::Operation { .. } | Reply::Catalog(Ok(_)) => Ok(()),
            }
        }
    }
}

fn load_client_config() -> ClientConfig {
    default_config_path()
        .map(|path| load_config(&path))
        .unwrap_or_default()
        .with_env_overrides()
}

/// Selects `index` and returns the track's id and file name.
fn select(session: &mut CliSession, index: usize) -> Result<(i64, String), CliError> {
    let track = session
        .tracks()
        .get(index)
        .map(|track| (track.track_id, track.file_name.clone()))
        .ok_or(CliError::NoTrack(index))?;
    session.run(Command::Select { index })?;
    Ok(track)
}

fn print_inputs(session: &CliSession) {
    match session.view().inputs {
        Some(inputs) => println!("track now has {} points", inputs.max + 1),
        None => println!("track now has no points"),
    }
}

fn expect_no_notice(notices: Vec<String>) -> Result<(), CliError> {
    match notices.into_iter().next() {
        Some(message) => Err(CliError::Notice(message)),
        None => Ok(()),
    }
}
