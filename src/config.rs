use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const PAGE_URL: &str = "https://www.sloveniacontrol.si/Strani/Summary-C.aspx";
pub const KML_BASE_URL: &str = "https://www.sloveniacontrol.si/NOTAM";

pub const CIVIL_TZ: Tz = chrono_tz::Europe::Ljubljana;

/// Notices whose lower bound converts above this are dropped.
pub const LOWER_ALTITUDE_CEILING_M: f64 = 3000.0;
pub const ALLOWED_QUALIFIER_PREFIXES: &[&str] = &["QR", "QW", "QOR"];
pub const PERM_EXTENSION_HOURS: i64 = 1000;

pub const DEFAULT_OUT_DIR: &str = "JSONs";
pub const PUBLISHED_LABEL: &str = "Čas objave";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Q,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Label {
    /// Print order.
    pub const ALL: [Label; 8] = [
        Label::Q,
        Label::A,
        Label::B,
        Label::C,
        Label::D,
        Label::E,
        Label::F,
        Label::G,
    ];

    /// Labels carried by top-level paragraphs; F) and G) live in spans.
    pub const PARAGRAPH: [Label; 6] = [
        Label::Q,
        Label::A,
        Label::B,
        Label::C,
        Label::D,
        Label::E,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Label::Q => "Q)",
            Label::A => "A)",
            Label::B => "B)",
            Label::C => "C)",
            Label::D => "D)",
            Label::E => "E)",
            Label::F => "F)",
            Label::G => "G)",
        }
    }

    pub fn classify_paragraph(text: &str) -> Option<Label> {
        Label::PARAGRAPH
            .into_iter()
            .find(|label| text.starts_with(label.marker()))
    }
}

/// Both bounds keep the UTC offset they were computed with, so a `PERM` end
/// stays on the start's offset even across a DST change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ValidityWindow {
    /// Wall-clock date comparison, both ends inclusive.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start.date_naive() <= day && day <= self.end.date_naive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notice {
    pub id: String,
    pub fields: BTreeMap<Label, String>,
    /// Every `Q)` paragraph in page order; `fields` only holds the last.
    pub qualifier_lines: Vec<String>,
    pub valid_from_raw: Option<String>,
    pub valid_to_raw: Option<String>,
    pub published_raw: Option<String>,
    pub published: Option<String>,
    pub window: Option<ValidityWindow>,
}

impl Notice {
    pub fn new(id: impl Into<String>) -> Self {
        Notice {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn field(&self, label: Label) -> &str {
        self.fields.get(&label).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, label: Label, text: impl Into<String>) {
        self.fields.insert(label, text.into());
    }

    pub fn sanitized_id(&self) -> String {
        self.id.replace('/', "-")
    }

    pub fn kml_link(&self) -> String {
        format!("{}/{}.kml", KML_BASE_URL, self.sanitized_id())
    }
}

/// On-disk shape of a single notice. Every source field gets its own key.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct NoticeRecord {
    #[serde(rename = "NOTAM_ID")]
    pub id: String,
    #[serde(rename = "Q_Code")]
    pub q_code: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Valid_From")]
    pub valid_from: String,
    #[serde(rename = "Valid_To")]
    pub valid_to: String,
    #[serde(rename = "Day_Time")]
    pub day_time: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Lower_Altitude")]
    pub lower_altitude: String,
    #[serde(rename = "Upper_Altitude")]
    pub upper_altitude: String,
    #[serde(rename = "Published_timestamp")]
    pub published: Option<String>,
    #[serde(rename = "KML_Link")]
    pub kml_link: String,
}

impl From<&Notice> for NoticeRecord {
    fn from(n: &Notice) -> Self {
        NoticeRecord {
            id: n.id.clone(),
            q_code: n.field(Label::Q).to_string(),
            location: n.field(Label::A).to_string(),
            valid_from: n.field(Label::B).to_string(),
            valid_to: n.field(Label::C).to_string(),
            day_time: n.field(Label::D).to_string(),
            description: n.field(Label::E).to_string(),
            lower_altitude: n.field(Label::F).to_string(),
            upper_altitude: n.field(Label::G).to_string(),
            published: n.published.clone(),
            kml_link: n.kml_link(),
        }
    }
}
