use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::entry::format_store_date;

/// Input layout of `DATE:` values, e.g. `03/04/2011 02:15:00 PM`.
pub const EXPORT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Title,
    Basename,
    Category,
    Status,
    ConvertBreaks,
    Date,
    Tags,
}

/// Match order. The first marker that matches a line wins.
pub const MARKERS: [Marker; 7] = [
    Marker::Title,
    Marker::Basename,
    Marker::Category,
    Marker::Status,
    Marker::ConvertBreaks,
    Marker::Date,
    Marker::Tags,
];

impl Marker {
    pub fn label(self) -> &'static str {
        match self {
            Marker::Title => "TITLE",
            Marker::Basename => "BASENAME",
            Marker::Category => "CATEGORY",
            Marker::Status => "STATUS",
            Marker::ConvertBreaks => "CONVERT BREAKS",
            Marker::Date => "DATE",
            Marker::Tags => "TAGS",
        }
    }
}

static MARKER_RES: LazyLock<Vec<(Marker, Regex)>> = LazyLock::new(|| {
    MARKERS
        .iter()
        .map(|&m| {
            let re = Regex::new(&format!(r"(?i)^{}: (.*)$", regex::escape(m.label()))).unwrap();
            (m, re)
        })
        .collect()
});

/// Find the first marker `line` starts with and return it with its trimmed value.
pub fn match_marker(line: &str) -> Option<(Marker, &str)> {
    MARKER_RES.iter().find_map(|(marker, re)| {
        let caps = re.captures(line)?;
        Some((*marker, caps.get(1)?.as_str().trim()))
    })
}

/// `CONVERT BREAKS:` value → stored `format`.
pub fn format_for(convert_breaks: &str) -> &'static str {
    match convert_breaks {
        "0" => "none",
        "textile_2" => "textile",
        _ => "convertbreaks",
    }
}

/// Split a `TAGS:` value on commas, strip quotes and blanks, sort.
pub fn split_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = value
        .split(',')
        .map(|t| t.trim_matches(|c: char| c.is_whitespace() || c == '"').to_string())
        .collect();
    tags.sort();
    tags
}

/// Re-render an export `DATE:` value in the store layout.
pub fn reformat_date(value: &str, timezone: &str) -> Result<String, chrono::ParseError> {
    let dt = NaiveDateTime::parse_from_str(value, EXPORT_DATE_FORMAT)?;
    Ok(format_store_date(&dt, timezone))
}

// ── Tests ──
