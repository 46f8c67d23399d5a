//! CSV export of a user's job history (opens directly in Google Sheets).

use crate::models::history::JobHistoryRow;

pub const CSV_HEADER: [&str; 8] = [
    "Job Title",
    "Company",
    "Location",
    "URL",
    "Source",
    "Status",
    "Tone",
    "Created At",
];

pub const EXPORT_FILE_NAME: &str = "job-history.csv";

/// RFC 4180 field: quoted when it contains a comma, quote, CR or LF, with
/// embedded quotes doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_record<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = fields
        .into_iter()
        .map(csv_field)
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Header plus one record per entry, in the order given.
pub fn history_to_csv(rows: &[JobHistoryRow]) -> String {
    let mut out = csv_record(CSV_HEADER);
    for row in rows {
        let created_at = row.created_at.to_rfc3339();
        out.push_str(&csv_record([
            row.job_title.as_deref().unwrap_or(""),
            row.company_name.as_deref().unwrap_or(""),
            row.location.as_deref().unwrap_or(""),
            row.url.as_str(),
            row.source.as_deref().unwrap_or(""),
            row.status.as_str(),
            row.tone.as_str(),
            created_at.as_str(),
        ]));
    }
    out
}
