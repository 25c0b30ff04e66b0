use crate::app::dto::*;
use crate::app::engine::DescriptorEngine;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct DescriptorMcpServer {
    engine: DescriptorEngine,
    tool_router: ToolRouter<Self>,
}

impl DescriptorMcpServer {
    pub fn new(engine: DescriptorEngine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

async fn blocking<T, F>(f: F) -> Result<Json<T>, String>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| format!("task join error: {e}"))?
        .map(Json)
        .map_err(|e| format!("{e:#}"))
}

#[tool_router]
impl DescriptorMcpServer {
    #[tool(description = "Describe a type: kind, modifiers, supertypes, members and annotations.")]
    async fn describe_type(
        &self,
        params: Parameters<TypeRequest>,
    ) -> Result<Json<TypeResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || engine.describe_type(&req.name)).await
    }

    #[tool(
        description = "Check whether `candidate` is `type_name` itself or one of its superclasses."
    )]
    async fn check_hierarchy(
        &self,
        params: Parameters<HierarchyRequest>,
    ) -> Result<Json<HierarchyResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || engine.hierarchy(req)).await
    }

    #[tool(description = "List direct (or, with `transitive`, all) subtypes of a type.")]
    async fn list_subtypes(
        &self,
        params: Parameters<SubtypesRequest>,
    ) -> Result<Json<SubtypesResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || engine.subtypes(req)).await
    }

    #[tool(description = "Search scanned type names by substring or regular expression.")]
    async fn search_types(
        &self,
        params: Parameters<SearchRequest>,
    ) -> Result<Json<SearchResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || engine.search(req)).await
    }

    #[tool(description = "Find types, methods and fields carrying an annotation.")]
    async fn find_annotated(
        &self,
        params: Parameters<AnnotatedRequest>,
    ) -> Result<Json<AnnotatedResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || Ok(engine.annotated(&req.annotation))).await
    }

    #[tool(description = "List the entity types a polymorphic query on an entity covers.")]
    async fn query_targets(
        &self,
        params: Parameters<TargetsRequest>,
    ) -> Result<Json<TargetsResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        blocking(move || engine.targets(&req.entity)).await
    }
}

#[tool_handler]
impl ServerHandler for DescriptorMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Query a type/method descriptor index built from a static scan: type structure, \
                 inheritance checks, annotations and entity hierarchies."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
