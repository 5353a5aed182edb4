use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::entry::{Entry, EntryType};
use crate::error::{ExportError, Result};

/// Receives finished entries from the scanner.
pub trait EntrySink {
    fn accept(&mut self, entry: Entry) -> Result<()>;
}

impl EntrySink for Vec<Entry> {
    fn accept(&mut self, entry: Entry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

/// A directory of `<uuid>.post` / `<uuid>.page` JSON files.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
    written: usize,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| ExportError::io(&dir, e))?;
        Ok(DirStore { dir, written: 0 })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path_for(&self, entry: &Entry) -> PathBuf {
        self.dir.join(entry.file_name())
    }

    pub fn write(&mut self, entry: &Entry) -> Result<PathBuf> {
        let path = self.path_for(entry);
        let json = to_sorted_json(entry).map_err(|e| ExportError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| ExportError::io(&path, e))?;
        self.written += 1;
        debug!(path = %path.display(), "wrote entry");
        Ok(path)
    }
}

impl EntrySink for DirStore {
    fn accept(&mut self, entry: Entry) -> Result<()> {
        self.write(&entry).map(|_| ())
    }
}

/// Pretty JSON, four-space indent, keys in sorted order.
pub fn to_sorted_json(entry: &Entry) -> serde_json::Result<String> {
    // serde_json::Map is a BTreeMap here, so going through Value sorts the keys.
    let value = serde_json::to_value(entry)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn load(path: &Path) -> Result<Entry> {
    let data = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| ExportError::json(path, e))
}

/// Load every `.post` and `.page` file in `dir`, in file-name order.
pub fn load_dir(dir: &Path) -> Result<Vec<Entry>> {
    let mut paths = Vec::new();
    for item in fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))? {
        let path = item.map_err(|e| ExportError::io(dir, e))?.path();
        let is_entry = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == EntryType::Post.suffix() || ext == EntryType::Page.suffix());
        if is_entry && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    paths.iter().map(|p| load(p)).collect()
}

/// A stored date the blog server would fail to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateProblem {
    pub file: String,
    pub field: &'static str,
    pub error: String,
}

/// Parse both dates of every entry with the store layout for `timezone`.
pub fn check_dates(entries: &[Entry], timezone: &str) -> Vec<DateProblem> {
    let mut problems = Vec::new();
    for e in entries {
        for (field, parsed) in [
            ("publishedDate", e.published_at(timezone)),
            ("lastModifiedDate", e.last_modified_at(timezone)),
        ] {
            if let Some(Err(err)) = parsed {
                problems.push(DateProblem {
                    file: e.file_name(),
                    field,
                    error: err.to_string(),
                });
            }
        }
    }
    problems
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryCounter;
    use crate::export::scan_str;

    fn sample_entry() -> Entry {
        let mut e = Entry::exported(&mut EntryCounter::new());
        e.title = Some("Round trip".into());
        e.status = Some("publish".into());
        e.tags = Some(vec!["a".into(), "b".into()]);
        e.push_category("misc".into());
        e.append_body("Body text\n");
        e.set_dates("Fri Mar 04 14:15:00 PST 2011".into());
        e
    }

    #[test]
    fn write_then_load_is_equal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(tmp.path()).unwrap();
        let entry = sample_entry();
        let path = store.write(&entry).unwrap();

        assert_eq!(path.file_name().unwrap().to_str().unwrap(), format!("{}.post", entry.uuid));
        assert_eq!(load(&path).unwrap(), entry);
        assert_eq!(store.written(), 1);
    }

    #[test]
    fn keys_are_sorted_and_indented() {
        let json = to_sorted_json(&sample_entry()).unwrap();
        let keys: Vec<&str> = json
            .lines()
            .filter(|l| l.starts_with("    \"") && !l.starts_with("        "))
            .map(|l| l.trim().split('"').nth(1).unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(keys.contains(&"isOldEntry"));
        assert!(keys.contains(&"parsed_num"));
        assert!(!keys.contains(&"basename"));
    }

    #[test]
    fn new_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        let store = DirStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn load_dir_skips_other_files() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(tmp.path()).unwrap();
        let text = "TITLE: one\n--------\nTITLE: two\n--------\n";
        scan_str(text, "PST", &mut store).unwrap();
        fs::write(tmp.path().join("notes.txt"), "not an entry").unwrap();

        let mut loaded = load_dir(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        loaded.sort_by_key(|e| e.parsed_num);
        assert_eq!(loaded[0].title.as_deref(), Some("one"));
        assert_eq!(loaded[1].title.as_deref(), Some("two"));
    }

    #[test]
    fn loaded_dates_parse_with_matching_zone() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStore::new(tmp.path()).unwrap();
        store.write(&sample_entry()).unwrap();

        let loaded = load_dir(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(matches!(loaded[0].published_at("PST"), Some(Ok(_))));
        assert!(matches!(loaded[0].last_modified_at("PST"), Some(Ok(_))));
        assert!(matches!(loaded[0].published_at("UTC"), Some(Err(_))));

        assert!(check_dates(&loaded, "PST").is_empty());
        let problems = check_dates(&loaded, "UTC");
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].field, "publishedDate");
        assert_eq!(problems[1].field, "lastModifiedDate");
        assert_eq!(problems[0].file, loaded[0].file_name());
    }

    #[test]
    fn entries_without_dates_pass_check() {
        let e = Entry::exported(&mut EntryCounter::new());
        assert_eq!(e.published_at("PST"), None);
        assert!(check_dates(&[e], "PST").is_empty());
    }

    #[test]
    fn load_reports_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.post");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(ExportError::Json { .. })));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(load(&tmp.path().join("nope.post")), Err(ExportError::Io { .. })));
    }
}
