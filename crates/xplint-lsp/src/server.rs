//! LSP server for xplint rule sources.

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use xplint::{
    LintConfig, TextDocument, ValidationCoordinator, ValidatorRegistry, language_for_extension,
};

use crate::client::{ClientPublisher, ClientSettings};

/// The xplint Language Server.
pub struct XpLanguageServer {
    client: Client,
    settings: Arc<ClientSettings>,
    coordinator: ValidationCoordinator,
}

impl XpLanguageServer {
    pub fn new(client: Client) -> Self {
        let settings = Arc::new(ClientSettings::new(client.clone()));
        let coordinator = ValidationCoordinator::new(
            ValidatorRegistry::with_defaults(),
            settings.clone(),
            Arc::new(ClientPublisher::new(client.clone())),
        );
        Self {
            client,
            settings,
            coordinator,
        }
    }

    /// Load `.xplint.yml` from the workspace root, if there is one.
    async fn load_config(&self, root: Option<PathBuf>) {
        let Some(root) = root else { return };
        let Some(path) = LintConfig::find_in_ancestors(&root) else {
            return;
        };
        match LintConfig::load(&path) {
            Ok(config) => {
                log::info!("loaded lint config from {}", path.display());
                self.coordinator.set_config(config).await;
            }
            Err(e) => {
                let message = format!("failed to load {}: {e}", path.display());
                log::warn!("{message}");
                self.client.log_message(MessageType::WARNING, message).await;
            }
        }
    }
}

/// The dialect id to validate `uri` as. Editors without xplint language
/// definitions report generic ids, so fall back to the file extension.
fn resolve_language(language_id: &str, uri: &Url) -> String {
    language_for_extension(language_id)
        .or_else(|| {
            let path = uri.path();
            let (_, ext) = path.rsplit_once('.')?;
            language_for_extension(ext)
        })
        .unwrap_or(language_id)
        .to_string()
}

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(|uri| uri.to_file_path().ok())
}

#[tower_lsp::async_trait]
impl LanguageServer for XpLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let has_configuration = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        self.settings.set_client_capability(has_configuration);

        self.load_config(workspace_root(&params)).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Full text sync: every change carries the whole document.
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "xplint-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        if self.settings.uses_client() {
            let registration = Registration {
                id: "xplint-did-change-configuration".to_string(),
                method: "workspace/didChangeConfiguration".to_string(),
                register_options: None,
            };
            if let Err(e) = self.client.register_capability(vec![registration]).await {
                log::warn!("could not register for configuration changes: {e}");
            }
        }
        log::info!("xplint-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    // ── Document synchronization ────────────────────────────────────────

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        let language_id = resolve_language(&item.language_id, &item.uri);
        let document = TextDocument::new(item.uri.to_string(), language_id, item.version, item.text);
        self.coordinator.did_open(document).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // FULL sync: the last content change has the full text.
        if let Some(change) = params.content_changes.into_iter().last() {
            self.coordinator
                .did_change(uri.as_str(), params.text_document.version, change.text)
                .await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.coordinator
            .validate_document(params.text_document.uri.as_str())
            .await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.coordinator.did_close(uri.as_str()).await;

        // Clear diagnostics for the closed file.
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.settings.update_fallback(&params.settings);
        self.coordinator.did_change_configuration().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn language_prefers_known_ids() {
        assert_eq!(resolve_language("en", &url("file:///r/a.co")), "en");
    }

    #[test]
    fn language_falls_back_to_extension() {
        assert_eq!(resolve_language("plaintext", &url("file:///r/a.co")), "co");
        assert_eq!(resolve_language("plaintext", &url("file:///r/a.xp")), "xp");
        assert_eq!(
            resolve_language("plaintext", &url("file:///r/a.txt")),
            "plaintext"
        );
    }
}
