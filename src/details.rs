//! Read-only summary of the highlighted entity: three stats, price and the primary action.

use serde::Serialize;

use crate::access::{format_price, is_free, is_purchased, is_unlocked, PriceFormat};
use crate::catalog::CatalogRepository;
use crate::thumbnail::ThumbnailResolver;
use crate::types::{Course, EntityKind, EntityRef, Lesson, Module};

/// Rough per-lesson estimate used for course totals.
const MINUTES_PER_LESSON: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

impl Stat {
    fn new(label: &'static str, value: impl Into<String>) -> Self { Self { label, value: value.into() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBadge {
    Owned,
    Free,
    Premium,
}

impl PriceBadge {
    pub fn for_course(course: &Course, purchased: &[String]) -> Self {
        if is_purchased(&course.id, purchased) {
            Self::Owned
        } else if is_free(Some(&course.price)) {
            Self::Free
        } else {
            Self::Premium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTag {
    pub label: String,
    pub badge: PriceBadge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Details {
    pub kind: EntityKind,
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub stats: [Stat; 3],
    /// Courses only.
    pub price: Option<PriceTag>,
    pub action: &'static str,
    /// True for a course that is neither free nor owned.
    pub show_checkout: bool,
}

/// Everything the panel needs besides the entity itself.
pub struct DetailsContext<'a> {
    pub catalog: &'a CatalogRepository,
    pub purchased: &'a [String],
    pub thumbnails: ThumbnailResolver<'a>,
    pub price_format: &'a PriceFormat,
}

impl Details {
    pub fn for_entity(entity: EntityRef<'_>, ctx: &DetailsContext<'_>) -> Self {
        match entity {
            EntityRef::Course(c) => Self::for_course(c, ctx),
            EntityRef::Module(m) => Self::for_module(m, ctx),
            EntityRef::Lesson(l) => Self::for_lesson(l, ctx),
        }
    }

    pub fn for_course(course: &Course, ctx: &DetailsContext<'_>) -> Self {
        let modules = ctx.catalog.modules_of(&course.id).len();
        let lessons = ctx.catalog.lesson_count_for_course(&course.id);
        let estimate = if lessons > 0 { format!("~{}m", lessons * MINUTES_PER_LESSON) } else { "-".to_string() };

        let badge = PriceBadge::for_course(course, ctx.purchased);
        let label = match badge {
            PriceBadge::Owned => "OWNED".to_string(),
            _ => format_price(Some(&course.price), ctx.price_format),
        };

        Self {
            price: Some(PriceTag { label, badge }),
            show_checkout: badge == PriceBadge::Premium,
            ..Self::base(
                EntityRef::Course(course),
                &course.description,
                [Stat::new("Modules", modules.to_string()), Stat::new("Lessons", lessons.to_string()), Stat::new("Duration", estimate)],
                "View Modules",
                ctx,
            )
        }
    }

    pub fn for_module(module: &Module, ctx: &DetailsContext<'_>) -> Self {
        let lessons = ctx.catalog.lessons_of(&module.id);
        let duration = CatalogRepository::aggregate_duration(lessons.iter().copied());
        let locked = ctx
            .catalog
            .course_of(module)
            .is_some_and(|c| !is_unlocked(c, ctx.purchased));

        Self::base(
            EntityRef::Module(module),
            &module.description,
            [Stat::new("Lessons", lessons.len().to_string()), Stat::new("Duration", duration), Stat::new("Play", "▶")],
            if locked { "Unlock Course" } else { "View Lessons" },
            ctx,
        )
    }

    pub fn for_lesson(lesson: &Lesson, ctx: &DetailsContext<'_>) -> Self {
        let duration = if lesson.duration.is_empty() { "-" } else { lesson.duration.as_str() };
        Self::base(
            EntityRef::Lesson(lesson),
            &lesson.description,
            [Stat::new("Duration", duration), Stat::new("Quality", "HD"), Stat::new("Play", "▶")],
            "Play Video",
            ctx,
        )
    }

    fn base(entity: EntityRef<'_>, description: &str, stats: [Stat; 3], action: &'static str, ctx: &DetailsContext<'_>) -> Self {
        Self {
            kind: entity.kind(),
            id: entity.id().to_string(),
            title: if entity.title().is_empty() { "Untitled".to_string() } else { entity.title().to_string() },
            description: if description.is_empty() { "No description available.".to_string() } else { description.to_string() },
            thumbnail: ctx.thumbnails.resolve(entity),
            stats,
            price: None,
            action,
            show_checkout: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{course, lesson, module};
    use crate::thumbnail::ThumbnailStyle;

    fn catalog() -> CatalogRepository {
        CatalogRepository::new(
            vec![course("1", "Rust", "free"), course("2", "Go", "1999")],
            vec![module("10", "1", "Basics"), module("11", "1", "Traits"), module("20", "2", "Intro")],
            vec![lesson("100", "10", "10:00"), lesson("101", "10", "1:05:30"), lesson("110", "11", "")],
        )
    }

    fn with_ctx<R>(purchased: &[String], f: impl FnOnce(&DetailsContext<'_>, &CatalogRepository) -> R) -> R {
        let cat = catalog();
        let style = ThumbnailStyle::default();
        let fmt = PriceFormat::default();
        let ctx = DetailsContext {
            catalog: &cat,
            purchased,
            thumbnails: ThumbnailResolver::new(&cat, &style),
            price_format: &fmt,
        };
        f(&ctx, &cat)
    }

    #[test]
    fn course_stats_estimate_fifteen_minutes_per_lesson() {
        with_ctx(&[], |ctx, cat| {
            let d = Details::for_course(&cat.courses()[0], ctx);
            let values: Vec<&str> = d.stats.iter().map(|s| s.value.as_str()).collect();
            assert_eq!(values, ["2", "3", "~45m"]);
            assert_eq!(d.price.as_ref().map(|p| p.badge), Some(PriceBadge::Free));
            assert!(!d.show_checkout);

            let go = Details::for_course(&cat.courses()[1], ctx);
            assert_eq!(go.stats[2].value, "-");
            assert_eq!(go.price.as_ref().map(|p| p.label.as_str()), Some("₹1,999"));
            assert!(go.show_checkout);
        });
    }

    #[test]
    fn owned_course_shows_owned_label() {
        let owned = vec!["2".to_string()];
        with_ctx(&owned, |ctx, cat| {
            let d = Details::for_course(&cat.courses()[1], ctx);
            assert_eq!(d.price, Some(PriceTag { label: "OWNED".into(), badge: PriceBadge::Owned }));
            assert!(!d.show_checkout);
        });
    }

    #[test]
    fn module_sums_lesson_durations_and_flags_lock() {
        with_ctx(&[], |ctx, cat| {
            let d = Details::for_module(cat.module("10").unwrap(), ctx);
            assert_eq!(d.stats[0].value, "2");
            assert_eq!(d.stats[1].value, "1h 15m");
            assert_eq!(d.action, "View Lessons");
            assert!(d.price.is_none());

            let locked = Details::for_module(cat.module("20").unwrap(), ctx);
            assert_eq!(locked.action, "Unlock Course");
            assert_eq!(locked.stats[1].value, "-");
        });
    }

    #[test]
    fn lesson_without_duration_shows_dash() {
        with_ctx(&[], |ctx, cat| {
            let d = Details::for_entity(EntityRef::Lesson(cat.lesson("110").unwrap()), ctx);
            assert_eq!(d.kind, EntityKind::Lesson);
            assert_eq!(d.stats[0], Stat::new("Duration", "-"));
            assert_eq!(d.stats[1].value, "HD");
            assert_eq!(d.description, "No description available.");
        });
    }
}
