use anyhow::Context as _;
use docsift::tools::load_corpus::{expand_tilde, load_corpus_file};
use docsift::{DocServer, SearchConfig, SearchEngine};
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;

/// Path to a TOML file overriding search defaults.
const CONFIG_ENV: &str = "DOCSIFT_CONFIG";
/// Corpus loaded before the server starts accepting calls.
const CORPUS_ENV: &str = "DOCSIFT_CORPUS";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(expand_tilde(&v).as_ref()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docsift::tracing::init();

    let config = match env_path(CONFIG_ENV) {
        Some(path) => SearchConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SearchConfig::default(),
    };

    let engine = Arc::new(SearchEngine::new(config));

    if let Some(path) = env_path(CORPUS_ENV) {
        // A bad startup corpus leaves the server usable; load_corpus can fix it.
        match load_corpus_file(&engine, &path).await {
            Ok(report) => tracing::info!(
                "Loaded {} entries from {} at startup",
                report.entry_count,
                path.display()
            ),
            Err(e) => tracing::error!("Startup corpus {} failed to load: {:#}", path.display(), e),
        }
    }

    tracing::info!("Starting docsift MCP server");

    let server = DocServer::new(engine);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
