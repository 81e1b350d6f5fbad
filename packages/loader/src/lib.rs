#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the two input datasets for the equity map.
//!
//! The district polygon collection and the enrollment table are fetched
//! concurrently and must both succeed before anything is parsed or
//! rendered. Each source may be a local file or an `http(s)://` URL.

pub mod fetch;

use std::fmt;
use std::path::PathBuf;

use ma_equity_enrollment::{EnrollmentError, EnrollmentRecord, read_records};
use ma_equity_geography::{DistrictCollection, GeographyError};
use thiserror::Error;

/// Browser-like User-Agent for remote data files.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; MaEquityMap/1.0)";

/// Errors that can occur while loading the datasets.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Reading a local file failed.
    #[error("Failed to read {location}: {error}")]
    Io {
        /// File that could not be read.
        location: String,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Fetching a remote file failed.
    #[error("Failed to fetch {location}: {error}")]
    Http {
        /// URL that could not be fetched.
        location: String,
        /// Underlying HTTP error.
        #[source]
        error: reqwest::Error,
    },

    /// A remote file answered with a non-success status.
    #[error("Request for {location} failed with status {status}")]
    Status {
        /// URL that was requested.
        location: String,
        /// HTTP status code.
        status: u16,
    },

    /// The polygon collection could not be parsed.
    #[error("Invalid district file {location}: {error}")]
    Districts {
        /// Where the collection came from.
        location: String,
        /// Underlying parse error.
        #[source]
        error: GeographyError,
    },

    /// The enrollment table could not be parsed.
    #[error("Invalid enrollment file {location}: {error}")]
    Enrollment {
        /// Where the table came from.
        location: String,
        /// Underlying parse error.
        #[source]
        error: EnrollmentError,
    },
}

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local file.
    File(PathBuf),
    /// A remote `http(s)://` URL.
    Url(String),
}

impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// The two required inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    /// District polygon `GeoJSON` `FeatureCollection`.
    pub districts: DataSource,
    /// Enrollment-by-demographic CSV.
    pub enrollment: DataSource,
}

impl DataSources {
    /// Builds sources from configured path-or-URL strings.
    #[must_use]
    pub fn new(districts: &str, enrollment: &str) -> Self {
        Self {
            districts: DataSource::from(districts),
            enrollment: DataSource::from(enrollment),
        }
    }

    /// Both locations, as named in load-failure messages.
    #[must_use]
    pub fn locations(&self) -> [String; 2] {
        [self.districts.to_string(), self.enrollment.to_string()]
    }
}

/// Both datasets, parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    /// District shapes in collection order.
    pub districts: DistrictCollection,
    /// Enrollment rows in file order.
    pub records: Vec<EnrollmentRecord>,
}

/// Fetches both sources concurrently, then parses them.
///
/// # Errors
///
/// Returns [`LoadError`] if either source cannot be fetched or parsed.
/// Nothing is returned unless both succeed.
pub async fn load(sources: &DataSources) -> Result<LoadedData, LoadError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(LoadError::Client)?;

    log::info!(
        "Loading districts from {} and enrollment from {}",
        sources.districts,
        sources.enrollment
    );

    let (districts_text, enrollment_text) = tokio::try_join!(
        fetch::fetch_text(&client, &sources.districts),
        fetch::fetch_text(&client, &sources.enrollment),
    )?;

    let districts =
        DistrictCollection::parse(&districts_text).map_err(|error| LoadError::Districts {
            location: sources.districts.to_string(),
            error,
        })?;
    if districts.is_empty() {
        log::warn!("No usable district features in {}", sources.districts);
    }

    let records =
        read_records(enrollment_text.as_bytes()).map_err(|error| LoadError::Enrollment {
            location: sources.enrollment.to_string(),
            error,
        })?;

    Ok(LoadedData { districts, records })
}
