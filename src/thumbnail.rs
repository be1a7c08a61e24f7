//! Representative images for catalog entities.
//!
//! Resolution is a fixed cascade of strategies, each `entity -> Option<url>`;
//! the first one that yields something wins. A generated placeholder closes
//! the cascade, so resolution never fails.

use serde::{Deserialize, Serialize};
use tracing::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::catalog::CatalogRepository;
use crate::types::{EntityRef, Lesson};
use crate::youtube;

const NULL_TOKENS: [&str; 5] = ["", "null", "undefined", "-", "n/a"];
const DEFAULT_TITLE: &str = "Course";

// left unescaped, as by a browser's encodeURIComponent
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailStyle {
    /// YouTube still to use: maxresdefault, hqdefault, mqdefault or default.
    pub quality: String,
    /// Hex colors without '#', picked by the first two characters of the title.
    pub palette: Vec<String>,
    pub placeholder_size: u32,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        Self {
            quality: "hqdefault".to_string(),
            palette: ["6366f1", "8b5cf6", "ec4899", "22d3ee", "10b981", "f97316", "ef4444"]
                .into_iter()
                .map(String::from)
                .collect(),
            placeholder_size: 400,
        }
    }
}

type Strategy = fn(&ThumbnailResolver<'_>, EntityRef<'_>) -> Option<String>;

const CASCADE: [(&str, Strategy); 4] = [
    ("direct", direct),
    ("lesson video", lesson_video),
    ("module lessons", module_descendants),
    ("course lessons", course_descendants),
];

/// Borrows the catalog for child and parent lookups.
pub struct ThumbnailResolver<'a> {
    catalog: &'a CatalogRepository,
    style: &'a ThumbnailStyle,
}

impl<'a> ThumbnailResolver<'a> {
    pub fn new(catalog: &'a CatalogRepository, style: &'a ThumbnailStyle) -> Self {
        Self { catalog, style }
    }

    pub fn resolve(&self, entity: EntityRef<'_>) -> String {
        for (name, strategy) in CASCADE {
            if let Some(url) = strategy(self, entity) {
                debug!(kind = %entity.kind(), id = entity.id(), strategy = name, "thumbnail resolved");
                return url;
            }
        }
        debug!(kind = %entity.kind(), id = entity.id(), "thumbnail placeholder");
        placeholder(entity.title(), self.style)
    }

    fn video_still(&self, lesson: &Lesson) -> Option<String> {
        if lesson.video_url.trim().is_empty() { return None; }
        youtube::thumbnail_url(&lesson.video_url, &self.style.quality)
    }
}

fn direct(_: &ThumbnailResolver<'_>, entity: EntityRef<'_>) -> Option<String> {
    valid_image_url(entity.thumbnail_url())
}

fn lesson_video(r: &ThumbnailResolver<'_>, entity: EntityRef<'_>) -> Option<String> {
    match entity {
        EntityRef::Lesson(l) => r.video_still(l),
        _ => None,
    }
}

fn module_descendants(r: &ThumbnailResolver<'_>, entity: EntityRef<'_>) -> Option<String> {
    let EntityRef::Module(m) = entity else { return None };
    r.catalog
        .lessons_of(&m.id)
        .into_iter()
        .find_map(|l| valid_image_url(&l.thumbnail_url).or_else(|| r.video_still(l)))
        .or_else(|| r.catalog.course_of(m).and_then(|c| valid_image_url(&c.thumbnail_url)))
}

fn course_descendants(r: &ThumbnailResolver<'_>, entity: EntityRef<'_>) -> Option<String> {
    let EntityRef::Course(c) = entity else { return None };
    r.catalog
        .modules_of(&c.id)
        .into_iter()
        .flat_map(|m| r.catalog.lessons_of(&m.id))
        .find_map(|l| r.video_still(l))
}

/// Accepts http(s) and inline image data; rejects blanks and "null"-like tokens.
pub fn valid_image_url(raw: &str) -> Option<String> {
    let t = raw.trim().to_lowercase();
    if NULL_TOKENS.contains(&t.as_str()) { return None; }
    if t.starts_with("http://") || t.starts_with("https://") || t.starts_with("data:image") {
        Some(raw.trim().to_string())
    } else {
        None
    }
}

/// Deterministic avatar URL: color from the title's first two UTF-16 units, up to two initials.
pub fn placeholder(title: &str, style: &ThumbnailStyle) -> String {
    let title = match title.trim() {
        "" => DEFAULT_TITLE,
        t => t,
    };
    let mut units = title.encode_utf16();
    let code = units.next().map_or(0, u32::from) + units.next().map_or(0, u32::from);
    let color = match style.palette.len() {
        0 => "6366f1",
        n => style.palette[code as usize % n].as_str(),
    };
    let initials: String = title
        .split_whitespace()
        .take(2)
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    let name = utf8_percent_encode(&initials, URI_COMPONENT);
    format!(
        "https://ui-avatars.com/api/?name={name}&background={color}&color=ffffff&size={}&bold=true&font-size=0.4",
        style.placeholder_size
    )
}
