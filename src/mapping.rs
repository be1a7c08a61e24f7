//! Header normalization and row parsing for loosely structured sheets.
//!
//! Spreadsheet authors name columns however they like ("Course Title",
//! "YouTube URL", "img"). Everything here funnels those headers into the
//! canonical field set and turns rows into typed entities; no other module
//! builds a `Course`, `Module` or `Lesson` from raw cells.

use tracing::debug;

use crate::types::{Course, EntityKind, Grid, Lesson, Module, Record};

fn canonicalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_ws = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_ws { out.push('_'); in_ws = true; }
        } else {
            in_ws = false;
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' { out.push(c); }
        }
    }
    out
}

fn alias(name: &str, kind: EntityKind) -> Option<&'static str> {
    let canonical = match name {
        // ids are context sensitive: "course_id" is the primary key on the
        // courses sheet and a foreign key everywhere else
        "course_id" | "courseid" => if kind == EntityKind::Course { "id" } else { "course_id" },
        "module_id" | "moduleid" => if kind == EntityKind::Module { "id" } else { "module_id" },
        "lesson_id" | "lessonid" => "id",

        "course_title" | "coursetitle" | "module_title" | "moduletitle"
        | "lesson_title" | "lessontitle" | "name" => "title",

        "course_description" | "coursedescription" | "module_description"
        | "moduledescription" | "lesson_description" | "lessondescription" | "desc" => "description",

        "thumbnail" | "thumbnailurl" | "image" | "image_url" | "imageurl" | "img" | "img_url"
        | "imgurl" | "course_image" | "courseimage" | "cover" | "cover_image" | "coverimage"
        | "poster" => "thumbnail_url",

        "youtube_url" | "youtubeurl" | "youtube" | "video" | "videourl" | "video_link"
        | "videolink" | "url" | "link" => "video_url",

        "course_price" | "courseprice" | "cost" | "amount" => "price",

        "totalmodules" | "modules" | "module_count" | "modulecount" | "num_modules"
        | "nummodules" => "total_modules",

        "totallessons" | "lessons" | "lesson_count" | "lessoncount" | "num_lessons"
        | "numlessons" => "total_lessons",

        _ => return None,
    };
    Some(canonical)
}

/// Map a raw column header to its canonical field name for the given sheet.
/// Unknown headers come back normalized but otherwise untouched.
pub fn normalize_header(raw: &str, kind: EntityKind) -> String {
    let name = canonicalize(raw);
    match alias(&name, kind) {
        Some(canonical) => canonical.to_string(),
        None => name,
    }
}

/// Build records from a header row and its data rows.
///
/// Rows whose cells are all empty are dropped. A record without an `id`
/// gets the 1-based position of its row among `rows` (header excluded).
pub fn parse_rows(header: &[String], rows: &[Vec<String>], kind: EntityKind) -> Vec<Record> {
    let fields: Vec<String> = header.iter().map(|h| normalize_header(h, kind)).collect();
    debug!(%kind, ?fields, "normalized headers");

    let mut out = Vec::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        let mut record = Record::new();
        for (col, field) in fields.iter().enumerate() {
            let value = row.get(col).map(|c| c.trim()).unwrap_or("");
            record.insert(field.clone(), value);
        }
        if record.is_blank() { continue; }
        if record.get("id").is_empty() {
            record.insert("id", (pos + 1).to_string());
        }
        out.push(record);
    }
    debug!(%kind, parsed = out.len(), dropped = rows.len() - out.len(), "parsed rows");
    out
}

/// Split a grid into header and data rows. Fewer than two rows yields nothing.
pub fn parse_grid(grid: &Grid, kind: EntityKind) -> Vec<Record> {
    match grid.split_first() {
        Some((header, rows)) if !rows.is_empty() => parse_rows(header, rows, kind),
        _ => {
            debug!(%kind, "no data rows in sheet");
            Vec::new()
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() { default.to_string() } else { value.to_string() }
}

/// Leading-integer parse: "12 modules" -> 12, "abc" -> 0.
fn leading_count(value: &str) -> u32 {
    let digits: String = value.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

pub fn course_from_record(r: &Record) -> Course {
    Course {
        id: r.get("id").to_string(),
        title: or_default(r.get("title"), "Untitled Course"),
        description: r.get("description").to_string(),
        thumbnail_url: r.get("thumbnail_url").to_string(),
        price: or_default(r.get("price"), "free"),
        total_modules: leading_count(r.get("total_modules")),
    }
}

pub fn module_from_record(r: &Record) -> Module {
    Module {
        id: r.get("id").to_string(),
        course_id: r.get("course_id").to_string(),
        title: or_default(r.get("title"), "Untitled Module"),
        description: r.get("description").to_string(),
        thumbnail_url: r.get("thumbnail_url").to_string(),
        total_lessons: leading_count(r.get("total_lessons")),
    }
}

pub fn lesson_from_record(r: &Record) -> Lesson {
    Lesson {
        id: r.get("id").to_string(),
        module_id: r.get("module_id").to_string(),
        title: or_default(r.get("title"), "Untitled Lesson"),
        description: r.get("description").to_string(),
        video_url: r.get("video_url").to_string(),
        duration: r.get("duration").to_string(),
        thumbnail_url: r.get("thumbnail_url").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> { cells.iter().map(|c| c.to_string()).collect() }

    #[test]
    fn headers_collapse_whitespace_and_strip_symbols() {
        assert_eq!(normalize_header("  Course Title ", EntityKind::Course), "title");
        assert_eq!(normalize_header("YouTube URL", EntityKind::Lesson), "video_url");
        assert_eq!(normalize_header("Duration (mm:ss)", EntityKind::Lesson), "duration_mmss");
        assert_eq!(normalize_header("Cover   Image", EntityKind::Module), "thumbnail_url");
        assert_eq!(normalize_header("# Lessons", EntityKind::Module), "_lessons");
    }

    #[test]
    fn id_aliases_depend_on_sheet() {
        assert_eq!(normalize_header("Course ID", EntityKind::Course), "id");
        assert_eq!(normalize_header("Course ID", EntityKind::Module), "course_id");
        assert_eq!(normalize_header("ModuleId", EntityKind::Module), "id");
        assert_eq!(normalize_header("module_id", EntityKind::Lesson), "module_id");
        assert_eq!(normalize_header("Lesson ID", EntityKind::Lesson), "id");
        assert_eq!(normalize_header("lessonid", EntityKind::Course), "id");
    }

    #[test]
    fn normalization_is_idempotent() {
        let kinds = [EntityKind::Course, EntityKind::Module, EntityKind::Lesson];
        let headers = ["Course ID", "Name", "img", "Video Link", "Cost", "Num Modules", "lessons", "Extra Notes"];
        for kind in kinds {
            for h in headers {
                let once = normalize_header(h, kind);
                assert_eq!(normalize_header(&once, kind), once, "{h} on {kind}");
            }
        }
    }

    #[test]
    fn blank_rows_are_dropped_and_ids_follow_row_position() {
        let header = row(&["Title", "Price"]);
        let rows = vec![
            row(&["Rust Basics", "free"]),
            row(&["  ", ""]),
            row(&["Async Rust"]),
        ];
        let records = parse_rows(&header, &rows, EntityKind::Course);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), "1");
        assert_eq!(records[1].get("id"), "3");
        assert_eq!(records[1].get("price"), "");
    }

    #[test]
    fn explicit_ids_are_kept_and_cells_trimmed() {
        let header = row(&["Lesson ID", "Module ID", "Lesson Title"]);
        let rows = vec![row(&[" 7 ", "2", "  Intro  "])];
        let records = parse_rows(&header, &rows, EntityKind::Lesson);
        assert_eq!(records[0].get("id"), "7");
        assert_eq!(records[0].get("module_id"), "2");
        assert_eq!(records[0].get("title"), "Intro");
    }

    #[test]
    fn header_only_or_empty_grid_is_empty() {
        assert!(parse_grid(&Vec::new(), EntityKind::Course).is_empty());
        assert!(parse_grid(&vec![row(&["id", "title"])], EntityKind::Course).is_empty());
    }

    #[test]
    fn records_convert_with_defaults() {
        let mut r = Record::new();
        r.insert("id", "4");
        r.insert("total_modules", "12 modules");
        let c = course_from_record(&r);
        assert_eq!(c.title, "Untitled Course");
        assert_eq!(c.price, "free");
        assert_eq!(c.total_modules, 12);

        let mut r = Record::new();
        r.insert("id", "9");
        r.insert("course_id", "4");
        r.insert("thumbnail_url", "https://cdn.example.com/m.png");
        let m = module_from_record(&r);
        assert_eq!(m.thumbnail_url, "https://cdn.example.com/m.png");
        assert_eq!(m.course_id, "4");
        assert_eq!(m.title, "Untitled Module");

        let l = lesson_from_record(&Record::new());
        assert_eq!(l.title, "Untitled Lesson");
        assert_eq!(l.video_url, "");
    }

    #[test]
    fn image_column_lands_in_module_thumbnail() {
        let header = row(&["Module ID", "Course ID", "Image"]);
        let rows = vec![row(&["9", "4", "https://cdn.example.com/m.png"])];
        let records = parse_rows(&header, &rows, EntityKind::Module);
        let m = module_from_record(&records[0]);
        assert_eq!(m.id, "9");
        assert_eq!(m.thumbnail_url, "https://cdn.example.com/m.png");
    }
}
