pub mod altitude;
pub mod dates;
pub mod qualifier;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::{Label, Notice, ValidityWindow, LOWER_ALTITUDE_CEILING_M};

pub use dates::today;

/// Keeps the notices relevant to `today`, annotated and with parsed dates.
pub fn normalize(notices: Vec<Notice>, today: NaiveDate) -> Vec<Notice> {
    notices
        .into_iter()
        .filter_map(normalize_notice)
        .filter(|n| match &n.window {
            Some(window) => window.covers(today),
            None => false,
        })
        .collect()
}

/// Qualifier filter (any disallowed `Q)` line rejects), altitude conversion and date parsing for one notice.
/// `None` means the notice is rejected outright.
pub fn normalize_notice(mut notice: Notice) -> Option<Notice> {
    let rejected = notice
        .qualifier_lines
        .iter()
        .map(String::as_str)
        .chain([notice.field(Label::Q)])
        .filter(|q| !q.is_empty())
        .find(|q| !qualifier::is_allowed(q));
    if let Some(q_line) = rejected {
        debug!("Skipping {}: qualifier {:?}", notice.id, qualifier::qualifier_code(q_line));
        return None;
    }

    if !normalize_altitudes(&mut notice) {
        return None;
    }

    if let Some(raw) = notice.published_raw.as_deref() {
        notice.published = dates::normalize_published(raw);
        if notice.published.is_none() {
            warn!("Error parsing timestamp ({}): {}", crate::config::PUBLISHED_LABEL, raw);
        }
    }

    notice.window = parse_window(&notice);
    Some(notice)
}

/// Annotates F) and G). Returns false when the lower bound is above the ceiling;
/// the upper bound is never checked against it.
fn normalize_altitudes(notice: &mut Notice) -> bool {
    match altitude::annotate(notice.field(Label::F)) {
        Ok(Some(lower)) => {
            if lower.meters > LOWER_ALTITUDE_CEILING_M {
                debug!("Skipping {}: lower altitude {} m", notice.id, lower.meters);
                return false;
            }
            notice.set_field(Label::F, lower.text);
        }
        Ok(None) => {}
        Err(e) => warn!("Leaving lower altitude of {} as is: {}", notice.id, e),
    }

    match altitude::annotate(notice.field(Label::G)) {
        Ok(Some(upper)) => notice.set_field(Label::G, upper.text),
        Ok(None) => {}
        Err(e) => warn!("Leaving upper altitude of {} as is: {}", notice.id, e),
    }

    true
}

fn parse_window(notice: &Notice) -> Option<ValidityWindow> {
    let start = match notice.valid_from_raw.as_deref().map(dates::parse_start) {
        Some(Ok(start)) => start,
        Some(Err(e)) => {
            warn!("Error parsing start date for NOTAM {}: {}", notice.id, e);
            None
        }
        None => None,
    };

    let end = match notice.valid_to_raw.as_deref().map(|raw| dates::parse_end(raw, start)) {
        Some(Ok(end)) => end,
        Some(Err(e)) => {
            warn!("Error parsing end date for NOTAM {}: {}", notice.id, e);
            None
        }
        None => None,
    };

    Some(ValidityWindow { start: start?, end: end? })
}
