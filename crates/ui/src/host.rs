use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use engine::{EngineError, HostIntegration};
use track_api::TrackApiClient;
use tracing::info;

/// Desktop host: native save dialog plus streamed download, browser fallback.
#[derive(Debug, Clone)]
pub struct DesktopHost {
    client: TrackApiClient,
}

impl DesktopHost {
    pub fn new(client: TrackApiClient) -> Self {
        Self { client }
    }

    /// Streams `url` into `path`, returning the number of bytes written.
    pub fn save_to(&self, url: &str, path: &Path) -> engine::Result<u64> {
        let file = File::create(path).map_err(|err| EngineError::Host {
            context: "download",
            message: format!("cannot create {}: {err}", path.display()),
        })?;
        let mut writer = BufWriter::new(file);
        let written = self.client.fetch_file(url, &mut writer)?;
        writer.flush().map_err(|err| EngineError::Host {
            context: "download",
            message: format!("cannot write {}: {err}", path.display()),
        })?;
        Ok(written)
    }
}

impl HostIntegration for DesktopHost {
    fn download_file(&self, url: &str, file_name: &str) -> engine::Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save track")
            .set_file_name(file_name)
            .save_file()
        else {
            info!(url, "save dialog dismissed");
            return Ok(());
        };

        let bytes = self.save_to(url, &path)?;
        info!(path = %path.display(), bytes, "track saved");
        Ok(())
    }

    fn open_external(&self, url: &str) -> engine::Result<()> {
        webbrowser::open(url).map_err(|err| EngineError::Host {
            context: "open url",
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    use track_api::TrackApiClient;

    use super::DesktopHost;

    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let address = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buffer = [0_u8; 1024];
            let _ = stream.read(&mut buffer);
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            stream.write_all(body).expect("write body");
        });
        format!("http://{address}")
    }

    #[test]
    fn save_to_streams_response_into_file() {
        let base = serve_once("200 OK", b"<gpx/>");
        let host = DesktopHost::new(TrackApiClient::new(base.clone(), Duration::from_secs(5)));
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ride.gpx");

        let written = host
            .save_to(&format!("{base}/download/1/"), &path)
            .expect("download should succeed");

        assert_eq!(written, 6);
        assert_eq!(std::fs::read(&path).expect("read file"), b"<gpx/>");
    }

    #[test]
    fn save_to_reports_rejected_download() {
        let base = serve_once("404 Not Found", b"no such track");
        let host = DesktopHost::new(TrackApiClient::new(base.clone(), Duration::from_secs(5)));
        let dir = tempfile::tempdir().expect("temp dir");

        let error = host
            .save_to(&format!("{base}/download/1/"), &dir.path().join("ride.gpx"))
            .expect_err("download should fail");

        assert!(!error.is_transport());
        assert_eq!(error.to_string(), "no such track");
    }
}
