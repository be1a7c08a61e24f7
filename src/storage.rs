use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Key/value settings persistence. Single writer, last write wins.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;
    async fn put_setting(&self, key: &str, payload: &str) -> Result<()>;
}

/// Process-local storage, nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put_setting(&self, key: &str, payload: &str) -> Result<()> {
        self.entries.lock().await.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins() {
        let s = MemoryStorage::new();
        assert_eq!(s.get_setting("theme").await.unwrap(), None);
        s.put_setting("theme", "dark").await.unwrap();
        s.put_setting("theme", "light").await.unwrap();
        assert_eq!(s.get_setting("theme").await.unwrap().as_deref(), Some("light"));
    }
}
