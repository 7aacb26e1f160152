//! Retrieval of the raw forecast document, either over HTTP or from a saved file.
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::errors::{Error, ErrorKind};

/// Connect timeout used unless one is configured
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// api.weather.gov refuses requests without an identifying agent
pub const USER_AGENT: &str = concat!("chisel-forecast/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: u32 = 5;

/// A source for the raw bytes of a single document
pub trait Fetch {
    /// Retrieve the whole document. Failures are reported as [ErrorKind::Transport].
    fn fetch(&self) -> Result<Vec<u8>, Error>;

    /// Where the document comes from, for diagnostics
    fn describe(&self) -> String;
}

/// Issues a single blocking `GET` for a document
#[derive(Debug)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    url: Url,
}

impl HttpFetcher {
    /// Validate `url` and build an agent that follows redirects and honours the timeouts.
    /// Without a read timeout, reads block until the server finishes the response.
    pub fn new(
        url: &str,
        connect_timeout: Duration,
        read_timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid url '{url}'"))
                .with_source(err)
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unsupported url scheme '{}'", url.scheme())));
        }
        let mut builder = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .redirects(MAX_REDIRECTS)
            .user_agent(USER_AGENT);
        if let Some(read_timeout) = read_timeout {
            builder = builder.timeout_read(read_timeout);
        }
        Ok(Self {
            agent: builder.build(),
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self) -> Result<Vec<u8>, Error> {
        debug!(url = %self.url, "requesting forecast");
        let response = self
            .agent
            .get(self.url.as_str())
            .set("Accept", "application/geo+json, application/json")
            .call();
        let response = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                return Err(Error::new(ErrorKind::Transport).with_message(format!(
                    "{} responded with status {} {}",
                    self.url,
                    code,
                    resp.status_text()
                )))
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(Error::new(ErrorKind::Transport)
                    .with_message(format!("request to {} failed", self.url))
                    .with_source(err))
            }
        };
        debug!(status = response.status(), content_type = response.content_type(), "response received");
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|err| {
                Error::new(ErrorKind::Transport)
                    .with_message("failed to read response body")
                    .with_source(err)
            })?;
        debug!(bytes = body.len(), "response body read");
        Ok(body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads a previously saved document from disk
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self) -> Result<Vec<u8>, Error> {
        debug!(path = %self.path.display(), "reading saved forecast");
        fs::read(&self.path).map_err(|err| {
            Error::new(ErrorKind::Transport)
                .with_message(format!("failed to read {}", self.path.display()))
                .with_source(err)
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
