#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Enrollment-by-demographic data for Massachusetts school districts.
//!
//! Parses the cleaned enrollment CSV into [`EnrollmentRecord`]s and folds
//! them into an [`EnrollmentIndex`] keyed by year and district code. Every
//! lookup is total: a missing row, column or non-numeric cell comes back as
//! `None`, never as zero.

pub mod index;
pub mod parsing;
pub mod record;

use thiserror::Error;

pub use index::{Discrepancy, EnrollmentIndex};
pub use parsing::{parse_count, year_key};
pub use record::{EnrollmentRecord, MetricValues, read_records};

/// Errors that can occur while reading enrollment data.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },
}
