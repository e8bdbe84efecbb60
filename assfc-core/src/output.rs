//! Report rows and streaming output helpers.

use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::facade::QueryFacade;
use crate::registry::FontStatus;

/// One family in the dependency report: its installed/missing verdict and
/// the subtitle files (base names) that use it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontReportRow {
    pub family: String,
    pub installed: bool,
    pub files: Vec<String>,
}

/// Flatten the facade into serializable rows, in
/// [`QueryFacade::list_fonts`] order.
pub fn report_rows(queries: &QueryFacade<'_>) -> Vec<FontReportRow> {
    queries
        .list_fonts()
        .into_iter()
        .map(|(family, status)| {
            let files = queries.files_for(&family);
            FontReportRow {
                installed: status == FontStatus::Installed,
                family,
                files,
            }
        })
        .collect()
}

/// Write rows as a prettified JSON array.
pub fn write_json_pretty(rows: &[FontReportRow], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(rows)?;
    w.write_all(json.as_bytes())?;
    Ok(())
}

/// Write rows as newline-delimited JSON (NDJSON).
pub fn write_ndjson(rows: &[FontReportRow], mut w: impl Write) -> Result<()> {
    for row in rows {
        let line = serde_json::to_string(row)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> FontReportRow {
        FontReportRow {
            family: "Segoe UI".to_string(),
            installed: true,
            files: vec!["ep01.ass".to_string()],
        }
    }

    #[test]
    fn ndjson_writes_one_line_per_row() {
        let rows = vec![sample_row(), sample_row()];
        let mut buf = Vec::new();

        write_ndjson(&rows, &mut buf).expect("write ndjson");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: FontReportRow = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(parsed.family, "Segoe UI");
        assert!(parsed.installed);
    }

    #[test]
    fn json_pretty_round_trips() {
        let rows = vec![sample_row()];
        let mut buf = Vec::new();

        write_json_pretty(&rows, &mut buf).expect("write json");

        let parsed: Vec<FontReportRow> = serde_json::from_slice(&buf).expect("parse");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].files, vec!["ep01.ass".to_string()]);
    }
}
