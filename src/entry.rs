use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Skeleton defaults written by `create_post`.
pub const SKELETON_BASENAME: &str = "a_base_name";
pub const SKELETON_CATEGORY: &str = "Misc";
pub const SKELETON_TAG: &str = "Misc";
pub const SKELETON_FORMAT: &str = "textile";
pub const SKELETON_STATUS: &str = "draft";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Post,
    Page,
}

impl EntryType {
    /// File suffix used by the blog's JSON store.
    pub fn suffix(self) -> &'static str {
        match self {
            EntryType::Post => "post",
            EntryType::Page => "page",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// One post or page, as stored on disk.
///
/// Optional fields that were never set are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(rename = "isOldEntry")]
    pub is_old_entry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(rename = "publishedDate", default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(rename = "lastModifiedDate", default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
}

/// Hands out `parsed_num` values for one run, starting at 1.
#[derive(Debug)]
pub struct EntryCounter {
    next: u64,
}

impl Default for EntryCounter {
    fn default() -> Self {
        EntryCounter { next: 1 }
    }
}

impl EntryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_num(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

impl Entry {
    fn blank(kind: EntryType, is_old_entry: bool) -> Self {
        Entry {
            uuid: Uuid::new_v4().to_string(),
            kind,
            is_old_entry,
            parsed_num: None,
            title: None,
            basename: None,
            status: None,
            format: None,
            body: None,
            tags: None,
            categories: None,
            published_date: None,
            last_modified_date: None,
        }
    }

    /// A fresh entry for the export scanner, numbered from `counter`.
    pub fn exported(counter: &mut EntryCounter) -> Self {
        Entry {
            parsed_num: Some(counter.next_num()),
            ..Self::blank(EntryType::Post, true)
        }
    }

    /// A default-populated draft stamped with `now`.
    pub fn skeleton(title: &str, body: &str, kind: EntryType, now: NaiveDateTime, timezone: &str) -> Self {
        let stamp = format_store_date(&now, timezone);
        Entry {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
            basename: Some(SKELETON_BASENAME.to_string()),
            categories: Some(vec![SKELETON_CATEGORY.to_string()]),
            tags: Some(vec![SKELETON_TAG.to_string()]),
            format: Some(SKELETON_FORMAT.to_string()),
            status: Some(SKELETON_STATUS.to_string()),
            published_date: Some(stamp.clone()),
            last_modified_date: Some(stamp),
            ..Self::blank(kind, false)
        }
    }

    /// True once anything beyond the creation defaults has been set.
    pub fn has_content(&self) -> bool {
        self.title.is_some()
            || self.basename.is_some()
            || self.status.is_some()
            || self.format.is_some()
            || self.body.is_some()
            || self.tags.is_some()
            || self.categories.is_some()
            || self.published_date.is_some()
            || self.last_modified_date.is_some()
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.uuid, self.kind.suffix())
    }

    pub fn append_body(&mut self, text: &str) {
        self.body.get_or_insert_with(String::new).push_str(text);
    }

    pub fn push_category(&mut self, category: String) {
        self.categories.get_or_insert_with(Vec::new).push(category);
    }

    pub fn set_dates(&mut self, stamp: String) {
        self.published_date = Some(stamp.clone());
        self.last_modified_date = Some(stamp);
    }

    /// Parse `publishedDate` back the way the blog server reads it.
    pub fn published_at(&self, timezone: &str) -> Option<Result<NaiveDateTime, chrono::ParseError>> {
        self.published_date
            .as_deref()
            .map(|d| parse_store_date(d, timezone))
    }

    pub fn last_modified_at(&self, timezone: &str) -> Option<Result<NaiveDateTime, chrono::ParseError>> {
        self.last_modified_date
            .as_deref()
            .map(|d| parse_store_date(d, timezone))
    }
}

/// `Fri Mar 04 14:15:00 PST 2011`: weekday, month, day, time, zone token, year.
pub fn store_date_format(timezone: &str) -> String {
    format!("%a %b %d %H:%M:%S {} %Y", timezone.replace('%', "%%"))
}

pub fn format_store_date(dt: &NaiveDateTime, timezone: &str) -> String {
    dt.format(&store_date_format(timezone)).to_string()
}

pub fn parse_store_date(s: &str, timezone: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), &store_date_format(timezone))
}

/// Zone tokens the blog server's `MST` layout accepts: three capitals,
/// four or five ending in `T`, or `ChST` / `MeST`.
pub fn is_zone_abbreviation(token: &str) -> bool {
    if token == "ChST" || token == "MeST" {
        return true;
    }
    if !token.chars().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    match token.len() {
        3 => true,
        4 | 5 => token.ends_with('T'),
        _ => false,
    }
}

// ── Tests ──
