//! MCP server exposing corpus loading, search and browsing as tools.

use crate::engine::SearchEngine;
use crate::tools::browse::{BrowseRequest, handle_browse};
use crate::tools::load_corpus::{LoadCorpusRequest, handle_load_corpus};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP server over one shared search engine.
#[derive(Clone)]
pub struct DocServer {
    engine: Arc<SearchEngine>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for DocServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocServer")
            .field("generation", &self.engine.generation())
            .finish()
    }
}

#[tool_router]
impl DocServer {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub fn engine(&self) -> &Arc<SearchEngine> {
        &self.engine
    }

    #[tool(
        description = "Load or reload a documentation corpus. Accepts a Documenter search_index.js file or a JSON array of {location, page, title, category, text} records. The new index replaces the old one atomically; malformed records are skipped and reported.",
        input_schema = inline_schema_for_type::<LoadCorpusRequest>()
    )]
    async fn load_corpus(
        &self,
        Parameters(request): Parameters<LoadCorpusRequest>,
    ) -> std::result::Result<String, String> {
        handle_load_corpus(&self.engine, request)
            .await
            .map_err(|e| format!("{:#}", e))
    }

    #[tool(
        description = "Search the loaded documentation. Any query word that appears in a title, category or body qualifies an entry; title matches weigh most. Returns ranked results with highlighted snippets. Optional category and page filters narrow the results.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.engine, request)
            .await
            .map_err(|e| format!("{:#}", e))
    }

    #[tool(
        description = "Browse the loaded documentation by category. Without a category, lists every category with its entry count and every page. With a category, lists its entries in document order.",
        input_schema = inline_schema_for_type::<BrowseRequest>()
    )]
    async fn browse(
        &self,
        Parameters(request): Parameters<BrowseRequest>,
    ) -> std::result::Result<String, String> {
        handle_browse(&self.engine, request)
            .await
            .map_err(|e| format!("{:#}", e))
    }
}

#[tool_handler]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "docsift: full-text search over generated documentation sites. \
                 Start with load_corpus unless a corpus was loaded at startup, \
                 then use search for free-text queries and browse to explore by category.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so nested types appear inline instead of as `$ref` patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        Ok(_) | Err(_) => {
            tracing::error!("Schema for {} did not serialize to an object", std::any::type_name::<T>());
            Arc::new(JsonObject::new())
        }
    }
}
