use serde::Serialize;

use crate::types::{ids_match, Course, EntityKind, EntityRef, Lesson, Module};

/// Children of one parent, in ingestion order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Children<'a> {
    Modules(Vec<&'a Module>),
    Lessons(Vec<&'a Lesson>),
}

impl Children<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Modules(v) => v.len(),
            Self::Lessons(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Owns every course, module and lesson. Replaced wholesale by `load`.
#[derive(Debug, Clone, Default)]
pub struct CatalogRepository {
    courses: Vec<Course>,
    modules: Vec<Module>,
    lessons: Vec<Lesson>,
}

impl CatalogRepository {
    pub fn new(courses: Vec<Course>, modules: Vec<Module>, lessons: Vec<Lesson>) -> Self {
        Self { courses, modules, lessons }
    }

    /// Replace all three collections at once; nothing is merged.
    pub fn load(&mut self, courses: Vec<Course>, modules: Vec<Module>, lessons: Vec<Lesson>) {
        *self = Self::new(courses, modules, lessons);
    }

    pub fn courses(&self) -> &[Course] { &self.courses }
    pub fn modules(&self) -> &[Module] { &self.modules }
    pub fn lessons(&self) -> &[Lesson] { &self.lessons }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.modules.is_empty() && self.lessons.is_empty()
    }

    pub fn course(&self, id: &str) -> Option<&Course> { self.courses.iter().find(|c| ids_match(&c.id, id)) }
    pub fn module(&self, id: &str) -> Option<&Module> { self.modules.iter().find(|m| ids_match(&m.id, id)) }
    pub fn lesson(&self, id: &str) -> Option<&Lesson> { self.lessons.iter().find(|l| ids_match(&l.id, id)) }

    pub fn modules_of(&self, course_id: &str) -> Vec<&Module> {
        self.modules.iter().filter(|m| ids_match(&m.course_id, course_id)).collect()
    }

    pub fn lessons_of(&self, module_id: &str) -> Vec<&Lesson> {
        self.lessons.iter().filter(|l| ids_match(&l.module_id, module_id)).collect()
    }

    /// Children of a course are its modules, of a module its lessons. Lessons are leaves.
    pub fn children_of(&self, parent_id: &str, parent_kind: EntityKind) -> Children<'_> {
        match parent_kind {
            EntityKind::Course => Children::Modules(self.modules_of(parent_id)),
            EntityKind::Module => Children::Lessons(self.lessons_of(parent_id)),
            EntityKind::Lesson => Children::Lessons(Vec::new()),
        }
    }

    pub fn course_of(&self, module: &Module) -> Option<&Course> { self.course(&module.course_id) }
    pub fn module_of(&self, lesson: &Lesson) -> Option<&Module> { self.module(&lesson.module_id) }

    /// First parent whose id matches the child's foreign key. Courses have no parent.
    pub fn parent_of(&self, child_id: &str, child_kind: EntityKind) -> Option<EntityRef<'_>> {
        match child_kind {
            EntityKind::Module => {
                let m = self.module(child_id)?;
                self.course_of(m).map(EntityRef::Course)
            }
            EntityKind::Lesson => {
                let l = self.lesson(child_id)?;
                self.module_of(l).map(EntityRef::Module)
            }
            EntityKind::Course => None,
        }
    }

    /// Number of lessons across every module of a course.
    pub fn lesson_count_for_course(&self, course_id: &str) -> usize {
        self.modules_of(course_id).iter().map(|m| self.lessons_of(&m.id).len()).sum()
    }

    /// Sum lesson durations and format as "{h}h {m}m", "{m}m" or "-".
    pub fn aggregate_duration<'a, I>(lessons: I) -> String
    where
        I: IntoIterator<Item = &'a Lesson>,
    {
        let total: u64 = lessons.into_iter().map(|l| duration_secs(&l.duration)).sum();
        format_duration(total)
    }
}

/// "MM:SS" or "H:MM:SS" to seconds. Anything else counts as zero.
pub fn duration_secs(raw: &str) -> u64 {
    let raw = raw.trim();
    if raw.is_empty() { return 0; }
    let parts: Option<Vec<f64>> = raw
        .split(':')
        .map(|p| {
            let p = p.trim();
            if p.is_empty() { Some(0.0) } else { p.parse::<f64>().ok().filter(|v| v.is_finite()) }
        })
        .collect();
    let secs = match parts.as_deref() {
        Some([m, s]) => m * 60.0 + s,
        Some([h, m, s]) => h * 3600.0 + m * 60.0 + s,
        _ => 0.0,
    };
    if secs > 0.0 { secs as u64 } else { 0 }
}

pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        "-".to_string()
    }
}
