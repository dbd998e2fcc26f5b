//! Adapters between the coordinator's seams and the LSP client.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::{ConfigurationItem, Url};
use xplint::{
    Diagnostic, DiagnosticPublisher, DocumentSettings, SettingsProvider, StaticSettings,
    XpLintError,
};

use crate::diagnostics::to_lsp;

/// Configuration section holding xplint's settings.
pub const SECTION: &str = "xplint";

/// Publishes through `textDocument/publishDiagnostics`.
pub struct ClientPublisher {
    client: Client,
}

impl ClientPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tower_lsp::async_trait]
impl DiagnosticPublisher for ClientPublisher {
    async fn publish(&self, uri: &str, version: i32, diagnostics: Vec<Diagnostic>) {
        let url = match Url::parse(uri) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("not publishing for invalid URI {uri}: {e}");
                return;
            }
        };
        let diagnostics = diagnostics.iter().map(to_lsp).collect();
        self.client
            .publish_diagnostics(url, diagnostics, Some(version))
            .await;
    }
}

/// Asks the client via `workspace/configuration` when it supports that,
/// otherwise answers with the last value pushed in a configuration change.
pub struct ClientSettings {
    client: Client,
    use_client: AtomicBool,
    fallback: StaticSettings,
}

impl ClientSettings {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            use_client: AtomicBool::new(false),
            fallback: StaticSettings::default(),
        }
    }

    pub fn set_client_capability(&self, supported: bool) {
        self.use_client.store(supported, Ordering::Relaxed);
    }

    pub fn uses_client(&self) -> bool {
        self.use_client.load(Ordering::Relaxed)
    }

    /// Take global settings from a `didChangeConfiguration` payload.
    ///
    /// Ignored when the client answers configuration requests itself.
    pub fn update_fallback(&self, payload: &Value) {
        if self.uses_client() {
            return;
        }
        match settings_from_section(payload.get(SECTION)) {
            Ok(settings) => self.fallback.set(settings),
            Err(e) => log::warn!("ignoring invalid {SECTION} settings: {e}"),
        }
    }
}

/// Settings from the value of the `xplint` section. Absent or null means
/// defaults.
pub fn settings_from_section(value: Option<&Value>) -> serde_json::Result<DocumentSettings> {
    match value {
        None | Some(Value::Null) => Ok(DocumentSettings::default()),
        Some(value) => DocumentSettings::deserialize(value),
    }
}

#[tower_lsp::async_trait]
impl SettingsProvider for ClientSettings {
    async fn fetch(&self, uri: &str) -> xplint::Result<DocumentSettings> {
        if !self.uses_client() {
            return Ok(self.fallback.get());
        }

        let settings_error = |reason: String| XpLintError::Settings {
            uri: uri.to_string(),
            reason,
        };

        let items = vec![ConfigurationItem {
            scope_uri: Url::parse(uri).ok(),
            section: Some(SECTION.to_string()),
        }];
        let values = self
            .client
            .configuration(items)
            .await
            .map_err(|e| settings_error(e.to_string()))?;

        settings_from_section(values.first()).map_err(|e| settings_error(e.to_string()))
    }
}
