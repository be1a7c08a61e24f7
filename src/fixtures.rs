//! Entity builders shared by unit tests.

use crate::catalog::CatalogRepository;
use crate::types::{Course, Lesson, Module};

pub(crate) fn course(id: &str, title: &str, price: &str) -> Course {
    Course {
        id: id.into(),
        title: title.into(),
        description: String::new(),
        thumbnail_url: String::new(),
        price: price.into(),
        total_modules: 0,
    }
}

pub(crate) fn module(id: &str, course_id: &str, title: &str) -> Module {
    Module {
        id: id.into(),
        course_id: course_id.into(),
        title: title.into(),
        description: String::new(),
        thumbnail_url: String::new(),
        total_lessons: 0,
    }
}

pub(crate) fn lesson(id: &str, module_id: &str, duration: &str) -> Lesson {
    Lesson {
        id: id.into(),
        module_id: module_id.into(),
        title: format!("L{id}"),
        description: String::new(),
        video_url: String::new(),
        duration: duration.into(),
        thumbnail_url: String::new(),
    }
}

pub(crate) fn video_lesson(id: &str, module_id: &str, title: &str, video_url: &str) -> Lesson {
    Lesson { title: title.into(), video_url: video_url.into(), ..lesson(id, module_id, "") }
}

/// One free course with one module and one playable lesson.
pub(crate) fn scenario() -> CatalogRepository {
    CatalogRepository::new(
        vec![course("1", "A", "free")],
        vec![module("1", "1", "M1")],
        vec![video_lesson("1", "1", "L1", "https://youtu.be/dQw4w9WgXcQ")],
    )
}
