pub mod notam_page;

use crate::config::Notice;
use anyhow::Result;

/// Outcome of reading one summary page.
#[derive(Debug)]
pub enum Extraction {
    Notices(Vec<Notice>),
    /// The page carried no notice elements at all. Not an error.
    NoData,
}

pub fn parse(html: &str) -> Result<Extraction> {
    let notices = notam_page::parse_notam_page(html)?;
    if notices.is_empty() {
        return Ok(Extraction::NoData);
    }
    Ok(Extraction::Notices(notices))
}
