//! Per-document settings and the cache that sits in front of the provider.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::Result;

/// Findings cap used when the client sends nothing.
pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 1000;

/// Settings resolved for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSettings {
    /// Upper bound on the findings one validator pattern may emit.
    pub max_number_of_problems: usize,
}

impl DocumentSettings {
    pub fn new(max_number_of_problems: usize) -> Self {
        Self {
            max_number_of_problems,
        }
        .normalized()
    }

    /// The cap is a positive integer; zero is treated as one.
    pub fn normalized(self) -> Self {
        Self {
            max_number_of_problems: self.max_number_of_problems.max(1),
        }
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
        }
    }
}

/// Source of per-document settings, typically the editor's configuration
/// service.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<DocumentSettings>;
}

/// A provider that hands out one global value for every document.
///
/// Used when the client cannot answer configuration requests: the new value
/// then arrives with each configuration-changed notification.
#[derive(Debug, Default)]
pub struct StaticSettings {
    settings: RwLock<DocumentSettings>,
}

impl StaticSettings {
    pub fn new(settings: DocumentSettings) -> Self {
        Self {
            settings: RwLock::new(settings.normalized()),
        }
    }

    pub fn get(&self) -> DocumentSettings {
        match self.settings.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, settings: DocumentSettings) {
        let settings = settings.normalized();
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
    }
}

#[async_trait]
impl SettingsProvider for StaticSettings {
    async fn fetch(&self, _uri: &str) -> Result<DocumentSettings> {
        Ok(self.get())
    }
}

/// Settings cached per document URI.
///
/// Entries are dropped wholesale on a configuration change and individually
/// when a document closes. Failed lookups are never cached, and neither is a
/// fetch that was in flight while its entry was invalidated.
#[derive(Debug, Default)]
pub struct SettingsCache {
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, DocumentSettings>,
    /// Bumped by `clear`.
    generation: u64,
    /// Bumped by `evict`, per URI. Reset by `clear`.
    evictions: HashMap<String, u64>,
}

impl CacheState {
    fn stamp(&self, uri: &str) -> (u64, u64) {
        (
            self.generation,
            self.evictions.get(uri).copied().unwrap_or(0),
        )
    }
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached settings for `uri`, fetching them on a miss.
    ///
    /// A provider failure is logged and answered with
    /// [`DocumentSettings::default`] so the pass can still run. A value whose
    /// entry was cleared or evicted during the fetch is returned to this
    /// caller only.
    pub async fn resolve(&self, uri: &str, provider: &dyn SettingsProvider) -> DocumentSettings {
        let stamp = {
            let state = self.state.lock().await;
            if let Some(settings) = state.entries.get(uri) {
                return *settings;
            }
            state.stamp(uri)
        };

        match provider.fetch(uri).await {
            Ok(settings) => {
                let settings = settings.normalized();
                let mut state = self.state.lock().await;
                if state.stamp(uri) == stamp {
                    state.entries.insert(uri.to_string(), settings);
                } else {
                    log::debug!("settings for {uri} invalidated during fetch; not caching");
                }
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                DocumentSettings::default()
            }
        }
    }

    /// Forget every cached entry.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.evictions.clear();
        state.generation += 1;
    }

    /// Forget the entry for one document.
    pub async fn evict(&self, uri: &str) {
        let mut state = self.state.lock().await;
        state.entries.remove(uri);
        *state.evictions.entry(uri.to_string()).or_default() += 1;
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}
