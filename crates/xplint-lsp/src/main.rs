//! xplint-lsp: language server publishing xplint diagnostics for
//! correlation, enrichment and normalization rule sources.

mod client;
mod diagnostics;
mod server;

use tower_lsp::{LspService, Server};

#[tokio::main]
async fn main() {
    env_logger::init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(server::XpLanguageServer::new);

    Server::new(stdin, stdout, socket).serve(service).await;
}
