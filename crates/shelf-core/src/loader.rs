//! Dataset loading
//!
//! Fetches the catalog dataset once, either over HTTP or from a local file,
//! and maps it into records. There is no retry; the caller decides how to
//! surface a [`LoadError`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{Dataset, Record};

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum LoadError {
    /// The server answered with a non-success status
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// The request could not be sent or the body could not be read
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local dataset file could not be read
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The body was not a valid dataset document
    #[error("Invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured dataset location is not a usable URL
    #[error("Invalid dataset URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(Url),
    Local(PathBuf),
}

impl DataSource {
    /// Resolve the dataset location from configuration
    ///
    /// Absolute `http(s)://` datasets are fetched as-is; otherwise a configured
    /// `base_url` is joined with the dataset path; otherwise the dataset is a
    /// local file.
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let dataset = config.dataset.as_str();

        if is_http(dataset) {
            return parse_url(dataset).map(DataSource::Remote);
        }

        match &config.base_url {
            Some(base) => {
                let base = parse_url(base)?;
                base.join(dataset)
                    .map(DataSource::Remote)
                    .map_err(|e| LoadError::InvalidUrl {
                        url: dataset.to_string(),
                        message: e.to_string(),
                    })
            }
            None => Ok(DataSource::Local(PathBuf::from(dataset))),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{}", url),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_http(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn parse_url(value: &str) -> Result<Url, LoadError> {
    Url::parse(value).map_err(|e| LoadError::InvalidUrl {
        url: value.to_string(),
        message: e.to_string(),
    })
}

/// Load and normalize the dataset
pub async fn load(source: &DataSource) -> Result<Vec<Record>, LoadError> {
    info!("Loading library from {}", source);

    let body = match source {
        DataSource::Remote(url) => fetch(url).await?,
        DataSource::Local(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })?
        }
    };

    let records = parse_dataset(&body)?;
    info!(count = records.len(), "Library loaded");
    Ok(records)
}

async fn fetch(url: &Url) -> Result<String, LoadError> {
    let request_error = |source| LoadError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(request_error)?;

    let response = client.get(url.clone()).send().await.map_err(request_error)?;
    debug!(status = %response.status(), "Dataset response");

    if !response.status().is_success() {
        return Err(LoadError::Status {
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(request_error)
}

/// Parse a dataset document into records
pub fn parse_dataset(body: &str) -> Result<Vec<Record>, LoadError> {
    let dataset: Dataset = serde_json::from_str(body)?;
    Ok(dataset.into_records())
}
