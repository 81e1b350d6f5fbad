//! Enrollment CSV rows.

use std::collections::BTreeMap;
use std::io::Read;

use ma_equity_district_models::Metric;

use crate::EnrollmentError;
use crate::parsing::{parse_count, year_key};

/// Column holding the school year (e.g. `"2021-2022"`).
pub const SCHOOL_YEAR_COLUMN: &str = "schoolyear";

/// Column holding the district code.
pub const DISTRICT_ID_COLUMN: &str = "districtid";

/// One value per [`Metric`]; `None` is missing data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricValues([Option<f64>; 8]);

impl MetricValues {
    /// Returns the value for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        self.0[metric as usize]
    }

    /// Sets the value for `metric`.
    pub const fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.0[metric as usize] = value;
    }

    /// Sum of the defined category counts, or `None` if no category is
    /// defined. Independent of [`Metric::All`].
    #[must_use]
    pub fn category_sum(&self) -> Option<f64> {
        Metric::categories()
            .iter()
            .filter_map(|m| self.get(*m))
            .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
    }
}

/// One source row: a district's counts for one school year.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRecord {
    /// Raw school-year text.
    pub school_year: String,
    /// Year key derived from the first four characters of `school_year`.
    pub year: u16,
    /// District code, matching the shape's `ORG8CODE`.
    pub district_code: String,
    /// Per-metric counts. [`Metric::All`] is the raw `enrolled` column.
    pub values: MetricValues,
}

/// Reads every keyable row from an enrollment CSV.
///
/// Header names are trimmed. Rows whose school year cannot be turned into a
/// year key, or that have no district code, are skipped with a warning.
///
/// # Errors
///
/// Returns [`EnrollmentError`] if the CSV is malformed or a required column
/// is missing from the header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<EnrollmentRecord>, EnrollmentError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let positions: BTreeMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().trim_start_matches('\u{feff}').to_owned(), i))
        .collect();

    let column = |name: &str| {
        positions
            .get(name)
            .copied()
            .ok_or_else(|| EnrollmentError::MissingColumn {
                column: name.to_owned(),
            })
    };

    let school_year_col = column(SCHOOL_YEAR_COLUMN)?;
    let district_col = column(DISTRICT_ID_COLUMN)?;
    let metric_cols = Metric::all()
        .iter()
        .map(|m| Ok((*m, column(m.source_column())?)))
        .collect::<Result<Vec<_>, EnrollmentError>>()?;

    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for (line, result) in reader.records().enumerate() {
        let row = result?;
        let school_year = row.get(school_year_col).unwrap_or("").trim();
        let district_code = row.get(district_col).unwrap_or("").trim();

        let Some(year) = year_key(school_year) else {
            log::warn!("Skipping row {}: unusable school year '{school_year}'", line + 2);
            skipped += 1;
            continue;
        };
        if district_code.is_empty() {
            log::warn!("Skipping row {}: empty district id", line + 2);
            skipped += 1;
            continue;
        }

        let mut values = MetricValues::default();
        for (metric, col) in &metric_cols {
            values.set(*metric, row.get(*col).and_then(parse_count));
        }

        records.push(EnrollmentRecord {
            school_year: school_year.to_owned(),
            year,
            district_code: district_code.to_owned(),
            values,
        });
    }

    log::info!(
        "Parsed {} enrollment rows ({skipped} skipped)",
        records.len()
    );

    Ok(records)
}
