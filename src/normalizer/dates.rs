//! Publication timestamps and validity bounds.

use std::sync::LazyLock;

use chrono::offset::LocalResult;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;

use crate::config::{Label, CIVIL_TZ, PERM_EXTENSION_HOURS};

/// Tried in order, first match wins. The page is inconsistent about spaces
/// after the day and month dots.
const PUBLISHED_FORMATS: [&str; 4] = [
    "%d. %m. %Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d. %m.%Y %H:%M:%S",
    "%d.%m. %Y %H:%M:%S",
];
const PUBLISHED_OUTPUT: &str = "%d.%m.%Y %H:%M:%S";

const VALIDITY_FORMAT: &str = "%d.%m.%Y %H:%M";
const PERM: &str = "PERM";
const EST_SUFFIX: &str = " EST";

static VALIDITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(PERM|\d{2}\.\d{2}\.\d{4}( \d{2}:\d{2}( EST| CET)?)?)$").unwrap()
});

#[derive(Debug, Error, PartialEq)]
pub enum DateError {
    #[error("cannot parse {0:?} as DD.MM.YYYY HH:MM")]
    Unparseable(String),
    #[error("PERM end date without a start date")]
    PermWithoutStart,
}

pub fn parse_published(raw: &str) -> Option<NaiveDateTime> {
    PUBLISHED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn normalize_published(raw: &str) -> Option<String> {
    parse_published(raw).map(|ts| ts.format(PUBLISHED_OUTPUT).to_string())
}

/// Start of the validity window from a `B)` text.
///
/// `Ok(None)` when the text is not a `B)` field or does not look like a date.
pub fn parse_start(raw: &str) -> Result<Option<DateTime<FixedOffset>>, DateError> {
    let Some(value) = raw.strip_prefix(Label::B.marker()).map(str::trim) else {
        return Ok(None);
    };
    if !VALIDITY_RE.is_match(value) {
        return Ok(None);
    }
    parse_local(value).map(Some)
}

/// End of the validity window from a `C)` text. `PERM` means start + 1000h,
/// kept on the start's UTC offset even when a DST change falls in between.
/// Only an `EST` suffix is dropped before parsing.
pub fn parse_end(
    raw: &str,
    start: Option<DateTime<FixedOffset>>,
) -> Result<Option<DateTime<FixedOffset>>, DateError> {
    let value = raw.strip_prefix(Label::C.marker()).unwrap_or(raw).trim();
    if !VALIDITY_RE.is_match(value) {
        return Ok(None);
    }

    if value == PERM {
        let start = start.ok_or(DateError::PermWithoutStart)?;
        return Ok(Some(start + TimeDelta::hours(PERM_EXTENSION_HOURS)));
    }

    let value = if value.contains("EST") {
        value.replace(EST_SUFFIX, "")
    } else {
        value.to_string()
    };
    parse_local(&value).map(Some)
}

fn parse_local(value: &str) -> Result<DateTime<FixedOffset>, DateError> {
    NaiveDateTime::parse_from_str(value, VALIDITY_FORMAT)
        .map(|naive| localize(naive).fixed_offset())
        .map_err(|_| DateError::Unparseable(value.to_string()))
}

/// Wall-clock time in the civil timezone. A repeated hour resolves to
/// standard time; a skipped hour moves forward by one.
pub fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    match CIVIL_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, standard) => standard,
        LocalResult::None => CIVIL_TZ
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .unwrap_or_else(|| CIVIL_TZ.from_utc_datetime(&naive)),
    }
}

pub fn today() -> chrono::NaiveDate {
    Utc::now().with_timezone(&CIVIL_TZ).date_naive()
}
