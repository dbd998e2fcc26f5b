//! Drives validation passes in reaction to document lifecycle events.
//!
//! Lifecycle of one document:
//!
//! ```text
//! unopened -> open -> validated -> validated' -> ... -> closed
//! ```
//!
//! Every content change and every configuration change starts a fresh full
//! pass whose result replaces whatever was published before. Passes for the
//! same URI never overlap; each one reads the newest snapshot once it holds
//! the document's lock, so the last write always wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::config::LintConfig;
use crate::diagnostic::Diagnostic;
use crate::document::TextDocument;
use crate::lint::lint_text;
use crate::registry::ValidatorRegistry;
use crate::settings::{SettingsCache, SettingsProvider};

/// Sink for diagnostics. Each call replaces everything previously
/// published for `uri`.
#[async_trait]
pub trait DiagnosticPublisher: Send + Sync {
    async fn publish(&self, uri: &str, version: i32, diagnostics: Vec<Diagnostic>);
}

pub struct ValidationCoordinator {
    registry: ValidatorRegistry,
    provider: Arc<dyn SettingsProvider>,
    publisher: Arc<dyn DiagnosticPublisher>,
    cache: SettingsCache,
    config: RwLock<LintConfig>,
    documents: RwLock<BTreeMap<String, TextDocument>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ValidationCoordinator {
    pub fn new(
        registry: ValidatorRegistry,
        provider: Arc<dyn SettingsProvider>,
        publisher: Arc<dyn DiagnosticPublisher>,
    ) -> Self {
        Self {
            registry,
            provider,
            publisher,
            cache: SettingsCache::new(),
            config: RwLock::new(LintConfig::default()),
            documents: RwLock::new(BTreeMap::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_config(self, config: LintConfig) -> Self {
        Self {
            config: RwLock::new(config),
            ..self
        }
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    pub fn settings_cache(&self) -> &SettingsCache {
        &self.cache
    }

    /// Replace the lint config. Takes effect on the next pass.
    pub async fn set_config(&self, config: LintConfig) {
        *self.config.write().await = config;
    }

    /// URIs of every open document, in order.
    pub async fn open_documents(&self) -> Vec<String> {
        self.documents.read().await.keys().cloned().collect()
    }

    /// The newest snapshot of `uri`, if it is open.
    pub async fn document(&self, uri: &str) -> Option<TextDocument> {
        self.documents.read().await.get(uri).cloned()
    }

    pub async fn did_open(&self, document: TextDocument) {
        let uri = document.uri().to_string();
        self.documents.write().await.insert(uri.clone(), document);
        self.validate_document(&uri).await;
    }

    /// Record new full content for `uri` and revalidate it.
    ///
    /// A change for a document that was never opened is treated as an open
    /// with an unknown dialect, so nothing is flagged.
    pub async fn did_change(&self, uri: &str, version: i32, text: String) {
        {
            let mut documents = self.documents.write().await;
            let updated = match documents.get(uri) {
                Some(current) => current.with_text(version, text),
                None => {
                    log::warn!("change for unopened document {uri}");
                    TextDocument::new(uri, "", version, text)
                }
            };
            documents.insert(uri.to_string(), updated);
        }
        self.validate_document(uri).await;
    }

    /// Forget `uri`: its snapshot, cached settings and lock.
    ///
    /// Waits for an in-flight pass on the same document to finish first.
    pub async fn did_close(&self, uri: &str) {
        let lock = self.lock_for(uri).await;
        let _guard = lock.lock().await;

        self.documents.write().await.remove(uri);
        self.cache.evict(uri).await;
        self.locks.lock().await.remove(uri);
    }

    /// Drop every cached setting and revalidate all open documents.
    pub async fn did_change_configuration(&self) {
        self.cache.clear().await;
        for uri in self.open_documents().await {
            self.validate_document(&uri).await;
        }
    }

    /// Run one full pass over `uri` and publish the result.
    ///
    /// No-op when the document is not open.
    pub async fn validate_document(&self, uri: &str) {
        let lock = self.lock_for(uri).await;
        let _guard = lock.lock().await;

        if !self.documents.read().await.contains_key(uri) {
            log::debug!("skipping validation of closed document {uri}");
            return;
        }

        let settings = self.cache.resolve(uri, self.provider.as_ref()).await;

        // Content may have changed while settings were being fetched.
        let Some(document) = self.document(uri).await else {
            return;
        };

        let diagnostics = {
            let config = self.config.read().await;
            lint_text(&self.registry, &document, settings, &config)
        };
        log::debug!(
            "validated {uri} v{} ({}): {} diagnostics",
            document.version(),
            document.language_id(),
            diagnostics.len()
        );

        self.publisher
            .publish(uri, document.version(), diagnostics)
            .await;
    }

    async fn lock_for(&self, uri: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .await
            .entry(uri.to_string())
            .or_default()
            .clone()
    }
}
