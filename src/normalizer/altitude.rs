use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const METERS_PER_FOOT: f64 = 0.3048;
const FLIGHT_LEVEL_MARKER: &str = "FL";
const FEET_MARKER: &str = "FT";
const ANNOTATED_MARKER: char = '(';

static FIRST_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum AltitudeError {
    #[error("no flight level number in {0:?}")]
    FlightLevel(String),
    #[error("no feet value in {0:?}")]
    Feet(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub text: String,
    pub meters: f64,
}

/// Rounded to one decimal.
pub fn feet_to_meters(feet: f64) -> f64 {
    (feet * METERS_PER_FOOT * 10.0).round() / 10.0
}

/// Appends `" (<meters> m)"` to a flight-level or feet altitude.
///
/// `Ok(None)` when there is no unit marker or the text already carries an
/// annotation, so running it twice never changes the result.
pub fn annotate(text: &str) -> Result<Option<Converted>, AltitudeError> {
    if text.contains(ANNOTATED_MARKER) {
        return Ok(None);
    }

    let feet = if let Some((_, rest)) = text.split_once(FLIGHT_LEVEL_MARKER) {
        let digits: String = rest
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        let level: u32 = digits
            .parse()
            .map_err(|_| AltitudeError::FlightLevel(text.to_string()))?;
        f64::from(level) * 100.0
    } else if text.contains(FEET_MARKER) {
        let feet: u32 = FIRST_NUMBER_RE
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| AltitudeError::Feet(text.to_string()))?;
        f64::from(feet)
    } else {
        return Ok(None);
    };

    let meters = feet_to_meters(feet);
    Ok(Some(Converted {
        text: format!("{} ({:.1} m)", text, meters),
        meters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_values() {
        assert_eq!(feet_to_meters(0.0), 0.0);
        assert_eq!(feet_to_meters(1000.0), 304.8);
        assert_eq!(feet_to_meters(10000.0), 3048.0);
        assert_eq!(feet_to_meters(9900.0), 3017.5);
    }

    #[test]
    fn flight_level_is_annotated() {
        let c = annotate("F) FL090").unwrap().unwrap();
        assert_eq!(c.meters, 2743.2);
        assert_eq!(c.text, "F) FL090 (2743.2 m)");

        let c = annotate("G) FL100").unwrap().unwrap();
        assert_eq!(c.text, "G) FL100 (3048.0 m)");
    }

    #[test]
    fn feet_are_annotated() {
        let c = annotate("F) 5000FT AMSL").unwrap().unwrap();
        assert_eq!(c.meters, 1524.0);
        assert_eq!(c.text, "F) 5000FT AMSL (1524.0 m)");
    }

    #[test]
    fn annotation_is_idempotent() {
        let once = annotate("F) FL090").unwrap().unwrap().text;
        assert_eq!(annotate(&once), Ok(None));
    }

    #[test]
    fn unitless_fields_pass_through() {
        assert_eq!(annotate("F) SFC"), Ok(None));
        assert_eq!(annotate("G) UNL"), Ok(None));
        assert_eq!(annotate(""), Ok(None));
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(matches!(
            annotate("F) FL ABC"),
            Err(AltitudeError::FlightLevel(_))
        ));
        assert!(matches!(annotate("F) FT AMSL"), Err(AltitudeError::Feet(_))));
    }
}
