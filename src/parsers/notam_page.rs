//! Field extraction from the NOTAM summary page markup.
//!
//! Each notice is a `.kzps-notam-item` block: an `<h1>` with the identifier,
//! one `<p>` per labelled field, and styled spans for the validity bounds and
//! the altitude limits.

use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::{Label, Notice};

const ITEM_CLASS: &str = ".kzps-notam-item";

static LOWER_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^F\)\s").unwrap());
static UPPER_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^G\)\s").unwrap());

struct Selectors {
    item: Selector,
    heading: Selector,
    paragraph: Selector,
    span: Selector,
    styled_span: Selector,
    start_marker: Selector,
    end_marker: Selector,
    published: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Selectors {
            item: selector(ITEM_CLASS)?,
            heading: selector("h1")?,
            paragraph: selector("p")?,
            span: selector("span")?,
            styled_span: selector("span.kzps-notam-item-b")?,
            start_marker: selector(".kzps-notam-item-b")?,
            end_marker: selector(".kzps-notam-item-c")?,
            published: selector("p.notam-hide")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {}: {:?}", css, e))
}

pub fn parse_notam_page(html: &str) -> Result<Vec<Notice>> {
    let sel = Selectors::new()?;
    let document = Html::parse_document(html);

    let notices: Vec<Notice> = document
        .select(&sel.item)
        .map(|item| parse_item(item, &sel))
        .collect();

    debug!("Found {} notice elements", notices.len());
    Ok(notices)
}

fn parse_item(item: ElementRef<'_>, sel: &Selectors) -> Notice {
    let id = item
        .select(&sel.heading)
        .next()
        .map(element_text)
        .unwrap_or_default();
    if id.is_empty() {
        warn!("Notice element without an identifier heading");
    }

    let mut notice = Notice::new(id);

    for p in item.select(&sel.paragraph) {
        let text = element_text(p);
        if let Some(label) = Label::classify_paragraph(&text) {
            if label == Label::Q {
                notice.qualifier_lines.push(text.clone());
            }
            notice.set_field(label, text);
        }

        if let Some(lower) = first_matching(p.select(&sel.span), &LOWER_SPAN_RE) {
            notice.set_field(Label::F, lower);
        }
        if let Some(upper) = first_matching(p.select(&sel.styled_span), &UPPER_SPAN_RE) {
            notice.set_field(Label::G, upper);
        }

        if let Some(start) = p.select(&sel.start_marker).next().map(element_text) {
            if start.starts_with(Label::B.marker()) {
                notice.valid_from_raw = Some(start);
            }
        }
        if let Some(end) = p.select(&sel.end_marker).next().map(element_text) {
            notice.valid_to_raw = Some(end);
        }
    }

    if let Some(hidden) = item.select(&sel.published).next() {
        let text = element_text(hidden);
        match published_value(&text) {
            Some(value) => notice.published_raw = Some(value.to_string()),
            None => warn!("Unlabelled publication timestamp for {}: {:?}", notice.id, text),
        }
    }

    notice
}

fn first_matching<'a>(
    mut spans: impl Iterator<Item = ElementRef<'a>>,
    re: &Regex,
) -> Option<String> {
    spans.find_map(|span| {
        let text = element_text(span);
        re.is_match(&text).then_some(text)
    })
}

/// `"<label>: <value>"` -> value, up to any further `": "`.
fn published_value(text: &str) -> Option<&str> {
    text.split(": ").nth(1).map(str::trim)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
