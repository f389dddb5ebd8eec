use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use engine::{EngineError, HostIntegration};
use track_api::TrackApiClient;
use tracing::info;

/// Headless host: downloads land in a fixed directory, the URL is printed
/// when that fails.
#[derive(Debug, Clone)]
pub struct DirectoryHost {
    client: TrackApiClient,
    dir: PathBuf,
}

impl DirectoryHost {
    pub fn new(client: TrackApiClient, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    /// Target path for `file_name`, keeping only its final component.
    pub fn target_path(&self, file_name: &str) -> engine::Result<PathBuf> {
        Path::new(file_name)
            .file_name()
            .map(|name| self.dir.join(name))
            .ok_or_else(|| host_error(format!("`{file_name}` is not a usable file name")))
    }
}

fn host_error(message: String) -> EngineError {
    EngineError::Host {
        context: "download",
        message,
    }
}

impl HostIntegration for DirectoryHost {
    fn download_file(&self, url: &str, file_name: &str) -> engine::Result<()> {
        let path = self.target_path(file_name)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| host_error(format!("cannot create {}: {err}", self.dir.display())))?;
        let file = File::create(&path)
            .map_err(|err| host_error(format!("cannot create {}: {err}", path.display())))?;

        let mut writer = BufWriter::new(file);
        let bytes = self.client.fetch_file(url, &mut writer)?;
        writer
            .flush()
            .map_err(|err| host_error(format!("cannot write {}: {err}", path.display())))?;

        info!(path = %path.display(), bytes, "track saved");
        println!("saved {}", path.display());
        Ok(())
    }

    fn open_external(&self, url: &str) -> engine::Result<()> {
        println!("download manually: {url}");
        Ok(())
    }
}
