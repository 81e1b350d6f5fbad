//! User interactions with the linked views.

use std::fmt;
use std::str::FromStr;

use ma_equity_district_models::Metric;
use thiserror::Error;

/// A single user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The year slider moved.
    YearInput(u16),
    /// A metric was picked from the demographic dropdown.
    MetricChanged(Metric),
    /// The district dropdown changed; `"all"` clears the pin.
    DistrictChanged(String),
    /// A district shape was clicked on the map.
    ///
    /// Pins the clicked district, so the map switches to the highlight
    /// fills. The hand-built page only redrew the chart and kept the
    /// choropleth colors.
    FeatureClicked {
        /// District code of the clicked shape.
        code: String,
    },
}

/// Error returned when a `kind=value` event string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEventError {
    /// The text has no `=` separator.
    #[error("expected kind=value, found '{0}'")]
    Format(String),
    /// The kind is not one of `year`, `metric`, `district`, `click`.
    #[error("unknown event kind '{0}' (expected year, metric, district or click)")]
    Kind(String),
    /// The value does not fit the kind.
    #[error("invalid {kind} value '{value}'")]
    Value {
        /// Event kind.
        kind: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl FromStr for UiEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once('=')
            .ok_or_else(|| ParseEventError::Format(s.to_string()))?;
        let value = value.trim();
        let invalid = |kind: &'static str| ParseEventError::Value {
            kind,
            value: value.to_string(),
        };

        match kind.trim() {
            "year" => value.parse().map(Self::YearInput).map_err(|_| invalid("year")),
            "metric" => value
                .parse()
                .map(Self::MetricChanged)
                .map_err(|_| invalid("metric")),
            "district" if !value.is_empty() => Ok(Self::DistrictChanged(value.to_string())),
            "district" => Err(invalid("district")),
            "click" if !value.is_empty() => Ok(Self::FeatureClicked {
                code: value.to_string(),
            }),
            "click" => Err(invalid("click")),
            other => Err(ParseEventError::Kind(other.to_string())),
        }
    }
}

impl fmt::Display for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearInput(year) => write!(f, "year={year}"),
            Self::MetricChanged(metric) => write!(f, "metric={metric}"),
            Self::DistrictChanged(name) => write!(f, "district={name}"),
            Self::FeatureClicked { code } => write!(f, "click={code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_kind() {
        assert_eq!("year=2021".parse(), Ok(UiEvent::YearInput(2021)));
        assert_eq!(
            "metric=lat_num".parse(),
            Ok(UiEvent::MetricChanged(Metric::LatNum))
        );
        assert_eq!(
            "district=Boston".parse(),
            Ok(UiEvent::DistrictChanged("Boston".to_string()))
        );
        assert_eq!(
            "district=all".parse(),
            Ok(UiEvent::DistrictChanged("all".to_string()))
        );
        assert_eq!(
            "click=00350000".parse(),
            Ok(UiEvent::FeatureClicked {
                code: "00350000".to_string()
            })
        );
    }

    #[test]
    fn keeps_names_with_equals_and_spaces() {
        assert_eq!(
            "district= King Philip ".parse(),
            Ok(UiEvent::DistrictChanged("King Philip".to_string()))
        );
    }

    #[test]
    fn rejects_bad_events() {
        assert_eq!(
            "year".parse::<UiEvent>(),
            Err(ParseEventError::Format("year".to_string()))
        );
        assert!(matches!(
            "zoom=3".parse::<UiEvent>(),
            Err(ParseEventError::Kind(_))
        ));
        assert!(matches!(
            "year=twenty".parse::<UiEvent>(),
            Err(ParseEventError::Value { kind: "year", .. })
        ));
        assert!(matches!(
            "metric=hispanic".parse::<UiEvent>(),
            Err(ParseEventError::Value { kind: "metric", .. })
        ));
        assert!(matches!(
            "district=".parse::<UiEvent>(),
            Err(ParseEventError::Value { kind: "district", .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        for text in ["year=2020", "metric=as_num", "district=Acton", "click=001"] {
            let event: UiEvent = text.parse().unwrap();
            assert_eq!(event.to_string(), text);
        }
    }
}
