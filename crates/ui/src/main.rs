mod app;
mod bridge;
mod host;
mod widgets;

use app::AppState;
use engine::ClientConfig;
use engine::config::{default_config_path, load_config};

fn main() -> iced::Result {
    init_tracing();

    let config = load_client_config();
    iced::application("Track Cropper", AppState::update, AppState::view)
        .subscription(AppState::subscription)
        .run_with(move || AppState::boot(config))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn load_client_config() -> ClientConfig {
    let config = match default_config_path() {
        Some(path) => load_config(&path),
        None => {
            tracing::warn!("no config directory on this platform, using defaults");
            ClientConfig::default()
        }
    };
    config.with_env_overrides()
}
