// src/fetch.rs

//! Artifact download
//!
//! [`Fetch`] is the seam between the executor and the network. The
//! production implementation, [`ReleaseFetcher`], speaks HTTP(S) through a
//! blocking reqwest client and also accepts `file://` URLs so that recipes
//! can point at locally mirrored artifacts.
//!
//! Downloads are single-shot: a failed request is reported, never retried.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Something that can turn a URL into artifact bytes
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// Map an HTTP status to the error kind it represents
pub fn classify_status(status: u16, url: &str) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        400..=499 => Err(Error::NotFound(format!("HTTP {} from {}", status, url))),
        500..=599 => Err(Error::ServerError {
            status,
            url: url.to_string(),
        }),
        _ => Err(Error::NetworkError(format!(
            "Unexpected HTTP {} from {}",
            status, url
        ))),
    }
}

/// HTTP(S) and `file://` fetcher
pub struct ReleaseFetcher {
    client: Client,
    show_progress: bool,
}

impl ReleaseFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(HTTP_TIMEOUT, None)
    }

    /// Create a fetcher with an explicit timeout and optional user agent
    pub fn with_timeout(timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
        let user_agent = user_agent
            .map(String::from)
            .unwrap_or_else(|| format!("tapster/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            show_progress: false,
        })
    }

    /// Show a progress bar on stderr while downloading
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        info!("Downloading {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

        classify_status(response.status().as_u16(), url)?;

        let total_size = response.content_length().unwrap_or(0);
        let progress = self.show_progress.then(|| create_progress_bar(total_size, url));

        let mut data = Vec::with_capacity(total_size as usize);
        let mut buffer = [0u8; STREAM_BUFFER_SIZE];

        loop {
            let bytes_read = response.read(&mut buffer).map_err(|e| {
                if let Some(pb) = &progress {
                    pb.abandon_with_message("[FAILED]");
                }
                Error::NetworkError(format!("Failed to read response from {url}: {e}"))
            })?;

            if bytes_read == 0 {
                break;
            }

            data.extend_from_slice(&buffer[..bytes_read]);

            if let Some(pb) = &progress {
                pb.set_position(data.len() as u64);
            }
        }

        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        info!("Downloaded {} bytes", data.len());
        Ok(data)
    }
}

impl Fetch for ReleaseFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed =
            Url::parse(url).map_err(|e| Error::ParseError(format!("Invalid URL {}: {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => self.fetch_http(url),
            "file" => {
                let path = parsed.to_file_path().map_err(|_| {
                    Error::ParseError(format!("Invalid file URL: {}", url))
                })?;
                fetch_local(&path)
            }
            other => Err(Error::ParseError(format!(
                "Unsupported URL scheme '{}' in {}",
                other, url
            ))),
        }
    }
}

/// Read a local artifact
pub fn fetch_local(path: &Path) -> Result<Vec<u8>> {
    debug!("Reading local artifact {}", path.display());
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::IoError(format!("Failed to read {}: {}", path.display(), e)),
    })
}

/// Create a styled progress bar for a download
fn create_progress_bar(size: u64, url: &str) -> ProgressBar {
    let name = url.rsplit('/').next().unwrap_or(url).to_string();

    if size == 0 {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(name);
        return pb;
    }

    let pb = ProgressBar::new(size);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(name);
    pb
}
