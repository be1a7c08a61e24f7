use tracing::info;

use crate::catalog::CatalogRepository;
use crate::config::SheetsConfig;
use crate::error::CatalogError;
use crate::mapping::{course_from_record, lesson_from_record, module_from_record, parse_grid};
use crate::sheets::SheetSource;
use crate::types::EntityKind;

/// Fetch all three tabs concurrently and build a fresh repository.
///
/// The first failing fetch aborts the whole load, so callers either get a
/// complete catalog or an error, never a mix of old and new sheets.
pub async fn ingest(source: &dyn SheetSource, sheets: &SheetsConfig) -> Result<CatalogRepository, CatalogError> {
    let (courses, modules, lessons) = tokio::try_join!(
        source.fetch_grid(&sheets.courses),
        source.fetch_grid(&sheets.modules),
        source.fetch_grid(&sheets.lessons),
    )?;

    let courses: Vec<_> = parse_grid(&courses, EntityKind::Course).iter().map(course_from_record).collect();
    let modules: Vec<_> = parse_grid(&modules, EntityKind::Module).iter().map(module_from_record).collect();
    let lessons: Vec<_> = parse_grid(&lessons, EntityKind::Lesson).iter().map(lesson_from_record).collect();

    info!(courses = courses.len(), modules = modules.len(), lessons = lessons.len(), "catalog ingested");
    if courses.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }
    Ok(CatalogRepository::new(courses, modules, lessons))
}
