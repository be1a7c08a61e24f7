use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw tabular input: row 0 is the header, every cell already stringified.
pub type Grid = Vec<Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub price: String, // "free" | amount token, e.g. "499" or "₹1,999"
    pub total_modules: u32, // informational only
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub total_lessons: u32, // informational only
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub duration: String, // "MM:SS" or "H:MM:SS"
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Course,
    Module,
    Lesson,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Module => "module",
            Self::Lesson => "lesson",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Borrowed view over any of the three entity types.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Course(&'a Course),
    Module(&'a Module),
    Lesson(&'a Lesson),
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Course(_) => EntityKind::Course,
            Self::Module(_) => EntityKind::Module,
            Self::Lesson(_) => EntityKind::Lesson,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Self::Course(c) => &c.id,
            Self::Module(m) => &m.id,
            Self::Lesson(l) => &l.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            Self::Course(c) => &c.title,
            Self::Module(m) => &m.title,
            Self::Lesson(l) => &l.title,
        }
    }

    pub fn thumbnail_url(&self) -> &'a str {
        match self {
            Self::Course(c) => &c.thumbnail_url,
            Self::Module(m) => &m.thumbnail_url,
            Self::Lesson(l) => &l.thumbnail_url,
        }
    }
}

/// A normalized row: canonical field name -> trimmed cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Absent fields read as the empty string.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool { self.fields.values().all(|v| v.is_empty()) }
}

/// The one place foreign keys are compared. Values are stringified at ingestion,
/// so a numeric `3` and a textual `"3"` both arrive here as `"3"`.
pub fn ids_match(a: &str, b: &str) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_reads_missing_fields_as_empty() {
        let mut r = Record::new();
        r.insert("title", "Rust");
        assert_eq!(r.get("title"), "Rust");
        assert_eq!(r.get("price"), "");
        assert!(!r.is_blank());
        assert!(Record::new().is_blank());
    }
}
