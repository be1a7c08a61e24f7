pub mod access;
pub mod catalog;
pub mod config;
pub mod db;
pub mod details;
pub mod error;
pub mod ingest;
pub mod mapping;
pub mod navigation;
pub mod purchases;
pub mod selection;
pub mod sheets;
pub mod storage;
pub mod thumbnail;
pub mod types;
pub mod youtube;

#[cfg(test)]
mod fixtures;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::catalog::CatalogRepository;
    pub use crate::config::Config;
    pub use crate::details::{Details, PriceBadge, Stat};
    pub use crate::error::CatalogError;
    pub use crate::navigation::{Key, NavigationError, NavigationStateMachine, Rejection, ViewDescriptor, ViewTag};
    pub use crate::sheets::{GoogleSheetsSource, SheetSource, StaticSource};
    pub use crate::storage::{MemoryStorage, Storage};
    pub use crate::types::{Course, EntityKind, EntityRef, Lesson, Module};
    pub use crate::CourseDeck;
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{error, info};

use crate::access::{is_free, PriceFormat};
use crate::catalog::CatalogRepository;
use crate::config::Config;
use crate::db::Database;
use crate::details::{Details, DetailsContext};
use crate::error::CatalogError;
use crate::navigation::NavigationStateMachine;
use crate::purchases::PurchaseLedger;
use crate::sheets::{GoogleSheetsSource, SheetSource};
use crate::storage::Storage;
use crate::thumbnail::{ThumbnailResolver, ThumbnailStyle};
use crate::types::EntityRef;

/// Catalog, navigation and persisted user state behind one handle.
pub struct CourseDeck {
    config: Config,
    source: Arc<dyn SheetSource>,
    storage: Arc<dyn Storage>,
    catalog: Arc<CatalogRepository>,
    purchases: PurchaseLedger,
    nav: NavigationStateMachine,
    thumbnail_style: ThumbnailStyle,
    price_format: PriceFormat,
}

impl CourseDeck {
    /// Google Sheets for the catalog, a migrated database for user state.
    /// The catalog starts empty until [`CourseDeck::refresh`] succeeds.
    pub async fn connect(config: Config) -> Result<Self> {
        let db = Database::connect(config.storage.database_url.as_deref()).await?;
        db.run_migrations().await?;
        let source = GoogleSheetsSource::new(config.sheets.clone())?;
        Self::with_parts(config, Arc::new(source), Arc::new(db)).await
    }

    pub async fn with_parts(config: Config, source: Arc<dyn SheetSource>, storage: Arc<dyn Storage>) -> Result<Self> {
        let purchases = PurchaseLedger::load(storage.as_ref(), &config.storage.purchases_key()).await?;
        let catalog = Arc::new(CatalogRepository::default());
        let nav = NavigationStateMachine::new(catalog.clone(), purchases.ids().to_vec());
        let thumbnail_style = config.display.thumbnail_style();
        let price_format = config.display.price_format();
        Ok(Self { config, source, storage, catalog, purchases, nav, thumbnail_style, price_format })
    }

    /// Re-ingest every sheet. On failure the current catalog and navigation stay as they were.
    pub async fn refresh(&mut self) -> Result<&CatalogRepository, CatalogError> {
        match ingest::ingest(self.source.as_ref(), &self.config.sheets).await {
            Ok(repo) => {
                self.catalog = Arc::new(repo);
                self.nav.reload(self.catalog.clone());
                info!(courses = self.catalog.courses().len(), "catalog refreshed");
                Ok(self.catalog.as_ref())
            }
            Err(e) => {
                error!(error = %e, "catalog refresh failed, keeping previous catalog");
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn catalog(&self) -> &CatalogRepository { &self.catalog }

    pub fn navigator(&self) -> &NavigationStateMachine { &self.nav }

    pub fn navigator_mut(&mut self) -> &mut NavigationStateMachine { &mut self.nav }

    pub fn resolve_thumbnail(&self, entity: EntityRef<'_>) -> String {
        ThumbnailResolver::new(&self.catalog, &self.thumbnail_style).resolve(entity)
    }

    pub fn format_price(&self, price: &str) -> String { access::format_price(Some(price), &self.price_format) }

    /// Details panel for whatever the navigator's cursor is on.
    pub fn details_for_current(&self) -> Option<Details> {
        let entity = self.nav.focused()?;
        let ctx = DetailsContext {
            catalog: &self.catalog,
            purchased: self.purchases.ids(),
            thumbnails: ThumbnailResolver::new(&self.catalog, &self.thumbnail_style),
            price_format: &self.price_format,
        };
        Some(Details::for_entity(entity, &ctx))
    }

    /// Simulated checkout. Returns false when there was nothing to buy.
    pub async fn purchase(&mut self, course_id: &str) -> Result<bool> {
        let Some(course) = self.catalog.course(course_id) else {
            bail!("unknown course: {course_id}");
        };
        if is_free(Some(&course.price)) || self.purchases.contains(course_id) {
            info!(course = course_id, "nothing to purchase");
            return Ok(false);
        }
        info!(course = course_id, price = %course.price, "processing payment");
        tokio::time::sleep(Duration::from_millis(self.config.payment_delay_ms)).await;
        let recorded = self.purchases.record(self.storage.as_ref(), course_id).await?;
        self.nav.set_purchased(self.purchases.ids().to_vec());
        info!(course = course_id, "course purchased");
        Ok(recorded)
    }

    pub fn purchases(&self) -> &[String] { self.purchases.ids() }

    /// Stored theme token, or the configured default when none was saved.
    pub async fn theme(&self) -> Result<String> {
        let stored = self.storage.get_setting(&self.config.storage.theme_key()).await?;
        Ok(stored.unwrap_or_else(|| self.config.display.default_theme.clone()))
    }

    pub async fn set_theme(&self, token: &str) -> Result<()> {
        self.storage.put_setting(&self.config.storage.theme_key(), token).await
    }
}
