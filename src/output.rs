use crate::config::{Label, Notice, NoticeRecord, PUBLISHED_LABEL};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const SEPARATOR: &str = "----------------------------------------";
const JSON_INDENT: &[u8] = b"    ";

pub struct Presenter<W: Write> {
    out: W,
    json_dir: Option<PathBuf>,
}

impl<W: Write> Presenter<W> {
    /// `json_dir` set means every printed notice is also saved there.
    pub fn new(out: W, json_dir: Option<PathBuf>) -> Self {
        Presenter { out, json_dir }
    }

    pub fn no_data(&mut self) -> Result<()> {
        writeln!(self.out, "No NOTAM data elements found.")?;
        Ok(())
    }

    pub fn present(&mut self, today: NaiveDate, notices: &[Notice]) -> Result<()> {
        writeln!(self.out, "\n{}", SEPARATOR)?;
        writeln!(self.out, "{}", today.format("%A %d.%m.%Y"))?;

        if notices.is_empty() {
            writeln!(self.out, "No NOTAMs. Yay!")?;
            return Ok(());
        }

        for notice in notices {
            self.write_notice(notice)?;
            if let Some(dir) = &self.json_dir {
                let path = save_json(dir, notice)?;
                info!("Saved {}", path.display());
            }
        }
        Ok(())
    }

    fn write_notice(&mut self, notice: &Notice) -> Result<()> {
        writeln!(self.out, "{}\n", SEPARATOR)?;
        writeln!(self.out, "NOTAM Number: {}", notice.id)?;
        for label in Label::ALL {
            let text = notice.field(label);
            if !text.is_empty() {
                writeln!(self.out, "{}", text)?;
            }
        }
        if let Some(ts) = &notice.published {
            writeln!(self.out, "{}: {}", PUBLISHED_LABEL, ts)?;
        }
        writeln!(self.out, "KML File: {}", notice.kml_link())?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Writes `<dir>/<sanitized-id>.json`, creating `dir` if needed.
pub fn save_json(dir: &Path, notice: &Notice) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let path = dir.join(format!("{}.json", notice.sanitized_id()));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
    NoticeRecord::from(notice).serialize(&mut ser)?;
    writer.flush()?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notice {
        let mut n = Notice::new("A1234/24");
        n.set_field(Label::Q, "Q) LJLA/QRTCA/IV/BO/W/000/095/4613N01433E005");
        n.set_field(Label::A, "A) LJLA");
        n.set_field(Label::E, "E) TRA1 ACTIVATED");
        n.set_field(Label::F, "F) FL090 (2743.2 m)");
        n.published = Some("12.03.2024 10:15:00".into());
        n
    }

    fn render(today: NaiveDate, notices: &[Notice]) -> String {
        let mut p = Presenter::new(Vec::new(), None);
        p.present(today, notices).unwrap();
        String::from_utf8(p.finish().unwrap()).unwrap()
    }

    #[test]
    fn report_lists_fields_in_order() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let out = render(today, &[sample()]);
        let expected = format!(
            "\n{sep}\nSaturday 15.06.2024\n{sep}\n\n\
NOTAM Number: A1234/24\n\
Q) LJLA/QRTCA/IV/BO/W/000/095/4613N01433E005\n\
A) LJLA\n\
E) TRA1 ACTIVATED\n\
F) FL090 (2743.2 m)\n\
Čas objave: 12.03.2024 10:15:00\n\
KML File: https://www.sloveniacontrol.si/NOTAM/A1234-24.kml\n",
            sep = SEPARATOR
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_day_says_so() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let out = render(today, &[]);
        assert!(out.ends_with("Saturday 15.06.2024\nNo NOTAMs. Yay!\n"));
    }

    #[test]
    fn no_data_message() {
        let mut p = Presenter::new(Vec::new(), None);
        p.no_data().unwrap();
        let out = String::from_utf8(p.finish().unwrap()).unwrap();
        assert_eq!(out, "No NOTAM data elements found.\n");
    }

    #[test]
    fn json_files_are_written_per_notice() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("JSONs");
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let mut n = sample();
        n.set_field(Label::E, "E) OBMOČJE TRA1 AKTIVNO");

        let mut p = Presenter::new(Vec::new(), Some(dir.clone()));
        p.present(today, &[n]).unwrap();

        let path = dir.join("A1234-24.json");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"NOTAM_ID\": \"A1234/24\""));
        assert!(text.contains("OBMOČJE"));

        let record: NoticeRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(record.id, "A1234/24");
        assert_eq!(record.lower_altitude, "F) FL090 (2743.2 m)");
        assert_eq!(record.valid_from, "");
        assert_eq!(record.published.as_deref(), Some("12.03.2024 10:15:00"));
        assert_eq!(
            record.kml_link,
            "https://www.sloveniacontrol.si/NOTAM/A1234-24.kml"
        );
    }
}
