//! Explicit text-to-number coercion for enrollment cells.

/// Parses a count cell.
///
/// Returns `None` for empty, non-numeric or non-finite text. A cell is
/// never coerced to zero.
#[must_use]
pub fn parse_count(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Derives the year key from a school-year field such as `"2021-2022"`
/// or `"2021-22"`: the first four characters, parsed as a year.
#[must_use]
pub fn year_key(school_year: &str) -> Option<u16> {
    let school_year = school_year.trim();
    let prefix = school_year.get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
