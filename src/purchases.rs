use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::storage::Storage;
use crate::types::ids_match;

/// Course ids the user owns, persisted as one JSON array under `key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseLedger {
    key: String,
    ids: Vec<String>,
}

impl PurchaseLedger {
    /// Missing or malformed payloads read as an empty ledger.
    pub async fn load(storage: &dyn Storage, key: &str) -> Result<Self> {
        let raw = storage
            .get_setting(key)
            .await
            .with_context(|| format!("loading purchases from {key}"))?;
        let ids = match raw {
            None => Vec::new(),
            Some(payload) => serde_json::from_str::<Vec<String>>(&payload).unwrap_or_else(|e| {
                warn!(key, error = %e, "ignoring malformed purchase list");
                Vec::new()
            }),
        };
        debug!(key, owned = ids.len(), "purchases loaded");
        Ok(Self { key: key.to_string(), ids })
    }

    pub fn ids(&self) -> &[String] { &self.ids }

    pub fn contains(&self, course_id: &str) -> bool { self.ids.iter().any(|id| ids_match(id, course_id)) }

    /// Append and write the whole list back. Returns false if already owned.
    pub async fn record(&mut self, storage: &dyn Storage, course_id: &str) -> Result<bool> {
        if self.contains(course_id) {
            return Ok(false);
        }
        self.ids.push(course_id.to_string());
        let payload = serde_json::to_string(&self.ids).context("encoding purchases")?;
        storage
            .put_setting(&self.key, &payload)
            .await
            .with_context(|| format!("saving purchases to {}", self.key))?;
        Ok(true)
    }
}
