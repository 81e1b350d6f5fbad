//! Nested `year → district code → metric` lookup index.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use ma_equity_district_models::Metric;
use ma_equity_district_models::view::SeriesPoint;

use crate::record::{EnrollmentRecord, MetricValues};

/// Difference below which `enrolled` and the category sum are considered
/// to agree.
const DISCREPANCY_TOLERANCE: f64 = 0.5;

/// Enrollment values keyed by year, then district code.
///
/// Built once per load. All lookups are total and return `None` for
/// missing data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrollmentIndex {
    years: BTreeMap<u16, BTreeMap<String, MetricValues>>,
}

/// A row whose `enrolled` total disagrees with the sum of its category
/// counts.
///
/// This is a known property of the source data and is reported, not
/// corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrepancy {
    /// Year key.
    pub year: u16,
    /// District code.
    pub district_code: String,
    /// Raw `enrolled` value.
    pub enrolled: f64,
    /// Sum of the defined category counts.
    pub category_sum: f64,
}

impl Discrepancy {
    /// `enrolled - category_sum`.
    #[must_use]
    pub fn difference(&self) -> f64 {
        self.enrolled - self.category_sum
    }
}

impl EnrollmentIndex {
    /// Folds records into an index. A later row for the same year and
    /// district replaces an earlier one.
    #[must_use]
    pub fn build<I: IntoIterator<Item = EnrollmentRecord>>(records: I) -> Self {
        let mut years: BTreeMap<u16, BTreeMap<String, MetricValues>> = BTreeMap::new();
        let mut rows = 0_usize;

        for record in records {
            rows += 1;
            let districts = years.entry(record.year).or_default();
            if districts
                .insert(record.district_code.clone(), record.values)
                .is_some()
            {
                log::debug!(
                    "Duplicate enrollment row for {} in {}; keeping the later row",
                    record.district_code,
                    record.year
                );
            }
        }

        let index = Self { years };
        log::info!(
            "Indexed {rows} enrollment rows across {} years",
            index.years.len()
        );
        index
    }

    /// Whether the index holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.values().all(BTreeMap::is_empty)
    }

    /// Years with at least one row, ascending.
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.years.keys().copied()
    }

    /// Smallest and largest year in the index.
    #[must_use]
    pub fn year_range(&self) -> Option<RangeInclusive<u16>> {
        let first = *self.years.keys().next()?;
        let last = *self.years.keys().next_back()?;
        Some(first..=last)
    }

    /// Number of districts with a row for `year`.
    #[must_use]
    pub fn district_count(&self, year: u16) -> usize {
        self.years.get(&year).map_or(0, BTreeMap::len)
    }

    /// Whether `code` has a row for `year`.
    #[must_use]
    pub fn contains(&self, year: u16, code: &str) -> bool {
        self.years
            .get(&year)
            .is_some_and(|districts| districts.contains_key(code))
    }

    /// Value of `metric` for district `code` in `year`.
    #[must_use]
    pub fn value(&self, year: u16, code: &str, metric: Metric) -> Option<f64> {
        self.years
            .get(&year)
            .and_then(|districts| districts.get(code))
            .and_then(|values| values.get(metric))
    }

    /// Every district with a row in `year`, mapped to its `metric` value.
    #[must_use]
    pub fn year_slice(&self, year: u16, metric: Metric) -> BTreeMap<&str, Option<f64>> {
        self.years
            .get(&year)
            .map(|districts| {
                districts
                    .iter()
                    .map(|(code, values)| (code.as_str(), values.get(metric)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All defined `metric` values for `year`, in district-code order.
    #[must_use]
    pub fn defined_values(&self, year: u16, metric: Metric) -> Vec<f64> {
        self.year_slice(year, metric)
            .into_values()
            .flatten()
            .collect()
    }

    /// Mean of the defined `metric` values in `year`, rounded to the
    /// nearest integer. `None` when no district reports a value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn statewide_average(&self, year: u16, metric: Metric) -> Option<f64> {
        let values = self.defined_values(year, metric);
        if values.is_empty() {
            return None;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(mean.round())
    }

    /// One point per year for a single district. Years without a value stay
    /// in the series with `None`.
    #[must_use]
    pub fn district_series<I: IntoIterator<Item = u16>>(
        &self,
        code: &str,
        metric: Metric,
        years: I,
    ) -> Vec<SeriesPoint> {
        years
            .into_iter()
            .map(|year| SeriesPoint {
                year,
                value: self.value(year, code, metric),
            })
            .collect()
    }

    /// One statewide-average point per year (see [`Self::statewide_average`]).
    #[must_use]
    pub fn statewide_average_series<I: IntoIterator<Item = u16>>(
        &self,
        metric: Metric,
        years: I,
    ) -> Vec<SeriesPoint> {
        years
            .into_iter()
            .map(|year| SeriesPoint {
                year,
                value: self.statewide_average(year, metric),
            })
            .collect()
    }

    /// Rows whose `enrolled` total differs from the sum of their defined
    /// category counts by more than half a student.
    #[must_use]
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        self.years
            .iter()
            .flat_map(|(year, districts)| {
                districts.iter().filter_map(move |(code, values)| {
                    let enrolled = values.get(Metric::All)?;
                    let category_sum = values.category_sum()?;
                    ((enrolled - category_sum).abs() > DISCREPANCY_TOLERANCE).then(|| {
                        Discrepancy {
                            year: *year,
                            district_code: code.clone(),
                            enrolled,
                            category_sum,
                        }
                    })
                })
            })
            .collect()
    }
}

impl FromIterator<EnrollmentRecord> for EnrollmentIndex {
    fn from_iter<T: IntoIterator<Item = EnrollmentRecord>>(iter: T) -> Self {
        Self::build(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: u16, code: &str, all: Option<f64>, asian: Option<f64>) -> EnrollmentRecord {
        let mut values = MetricValues::default();
        values.set(Metric::All, all);
        values.set(Metric::AsNum, asian);
        EnrollmentRecord {
            school_year: format!("{year}-{}", year + 1),
            year,
            district_code: code.to_string(),
            values,
        }
    }

    fn scenario() -> EnrollmentIndex {
        EnrollmentIndex::build(vec![
            record(2021, "A", Some(100.0), Some(5.0)),
            record(2021, "B", Some(200.0), None),
            record(2021, "C", None, None),
            record(2022, "A", Some(110.0), Some(6.0)),
            record(2019, "B", Some(190.0), Some(3.0)),
        ])
    }

    #[test]
    fn lookups_are_total() {
        let index = scenario();
        assert_eq!(index.value(2021, "A", Metric::All), Some(100.0));
        assert_eq!(index.value(2021, "C", Metric::All), None);
        assert_eq!(index.value(2021, "Z", Metric::All), None);
        assert_eq!(index.value(1999, "A", Metric::All), None);
        assert!(index.contains(2021, "C"));
        assert!(!index.contains(2020, "A"));
    }

    #[test]
    fn year_slice_keeps_missing_entries() {
        let index = scenario();
        let slice = index.year_slice(2021, Metric::All);
        assert_eq!(slice.len(), 3);
        assert_eq!(slice["C"], None);
        assert_eq!(index.defined_values(2021, Metric::All), vec![100.0, 200.0]);
        assert!(index.year_slice(2030, Metric::All).is_empty());
    }

    #[test]
    fn years_and_range() {
        let index = scenario();
        assert_eq!(index.years().collect::<Vec<_>>(), vec![2019, 2021, 2022]);
        assert_eq!(index.year_range(), Some(2019..=2022));
        assert_eq!(index.district_count(2021), 3);
        assert_eq!(EnrollmentIndex::default().year_range(), None);
        assert!(EnrollmentIndex::default().is_empty());
    }

    #[test]
    fn statewide_average_uses_only_reporting_districts() {
        let index = scenario();
        assert_eq!(index.statewide_average(2021, Metric::All), Some(150.0));
        assert_eq!(index.statewide_average(2021, Metric::AsNum), Some(5.0));
        assert_eq!(index.statewide_average(2020, Metric::All), None);
    }

    #[test]
    fn statewide_average_rounds_to_nearest_integer() {
        let index = EnrollmentIndex::build(vec![
            record(2020, "A", Some(1.0), None),
            record(2020, "B", Some(2.0), None),
            record(2020, "C", Some(2.0), None),
        ]);
        // 5 / 3 = 1.67
        assert_eq!(index.statewide_average(2020, Metric::All), Some(2.0));
    }

    #[test]
    fn series_cover_every_requested_year() {
        let index = scenario();
        let series = index.district_series("A", Metric::All, 2019..=2023);
        let values: Vec<_> = series.iter().map(|p| (p.year, p.value)).collect();
        assert_eq!(
            values,
            vec![
                (2019, None),
                (2020, None),
                (2021, Some(100.0)),
                (2022, Some(110.0)),
                (2023, None),
            ]
        );

        let average = index.statewide_average_series(Metric::All, 2019..=2023);
        assert_eq!(average.len(), 5);
        assert_eq!(average[0].value, Some(190.0));
        assert_eq!(average[1].value, None);
        assert_eq!(average[2].value, Some(150.0));
    }

    #[test]
    fn later_duplicate_row_wins() {
        let index = EnrollmentIndex::build(vec![
            record(2021, "A", Some(1.0), None),
            record(2021, "A", Some(2.0), None),
        ]);
        assert_eq!(index.value(2021, "A", Metric::All), Some(2.0));
    }

    #[test]
    fn reports_discrepancies_without_fixing_them() {
        let index = scenario();
        let found = index.discrepancies();
        // A: 100 vs 5, A 2022: 110 vs 6, B 2019: 190 vs 3.
        assert_eq!(found.len(), 3);
        assert!((found[0].difference() - 187.0).abs() < f64::EPSILON);
        assert_eq!(index.value(2021, "A", Metric::All), Some(100.0));
    }
}
