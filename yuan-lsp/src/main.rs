// Yuan Language Server (LSP)
// Provides IDE features: diagnostics, completion, hover, etc.

use dashmap::DashMap;
use std::sync::Arc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

mod backend;
mod diagnostics;

pub use backend::YuanBackend;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Yuan Language Server...");

    // Create LSP service
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| YuanBackend::new(client));

    Server::new(stdin, stdout, socket).serve(service).await;
}
