use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fallback resolution for type names the scan does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum ResolverKind {
    /// Primitives, arrays and platform library packages
    #[default]
    Jvm,
    /// Primitives and arrays only
    ClosedWorld,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EngineOptions {
    #[serde(default)]
    pub resolver: ResolverKind,
    /// Package prefixes treated as library code in addition to the JVM platform packages.
    #[serde(default)]
    pub library_prefixes: Vec<String>,
    /// Keep every type that links instead of failing on the first rejected one.
    #[serde(default)]
    pub lenient: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub scan_paths: Vec<String>,
    pub project_root: String,
    pub resolver: String,
    pub type_count: usize,
    pub scanned_type_count: usize,
    pub method_count: usize,
    pub field_count: usize,
    pub edge_count: usize,
    pub rejected_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RejectionDto {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
    pub health: HealthResponse,
    pub rejected: Vec<RejectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeRequest {
    /// Fully-qualified type name
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationDto {
    pub name: String,
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDto {
    pub name: String,
    pub modifiers: u32,
    pub modifier_keywords: Vec<String>,
    pub field_type: String,
    pub annotations: Vec<AnnotationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MethodDto {
    pub name: String,
    /// `<declaringType>#<method>`
    pub display: String,
    /// `name(params): return`
    pub signature: String,
    pub modifiers: u32,
    pub modifier_keywords: Vec<String>,
    pub return_type: String,
    pub parameter_types: Vec<String>,
    pub annotations: Vec<AnnotationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeResponse {
    pub name: String,
    pub simple_name: String,
    pub kind: String,
    pub modifiers: u32,
    pub modifier_keywords: Vec<String>,
    pub super_type: Option<String>,
    /// Superclass chain, nearest first.
    pub supertype_chain: Vec<String>,
    pub interfaces: Vec<String>,
    pub component_type: Option<String>,
    pub source: Option<String>,
    pub annotations: Vec<AnnotationDto>,
    pub fields: Vec<FieldDto>,
    pub methods: Vec<MethodDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyRequest {
    /// Type whose superclass chain is walked
    pub type_name: String,
    /// Type looked for in that chain
    pub candidate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyResponse {
    pub type_name: String,
    pub candidate: String,
    /// Candidate is the type itself or one of its superclasses.
    pub is_type_or_super_type: bool,
    /// Candidate is reachable through superclasses or interfaces.
    pub is_assignable: bool,
    pub supertype_chain: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubtypesRequest {
    pub name: String,
    #[serde(default)]
    pub transitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeSummary {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubtypesResponse {
    pub name: String,
    pub transitive: bool,
    pub subtypes: Vec<TypeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Case-insensitive substring, or a regular expression when `regex` is set
    pub pattern: String,
    #[serde(default)]
    pub regex: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub items: Vec<TypeSummary>,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedRequest {
    /// Fully-qualified annotation name
    pub annotation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedItem {
    /// `type`, `method` or `field`
    pub element_kind: String,
    pub element: String,
    pub declaring_type: String,
    pub values: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotatedResponse {
    pub annotation: String,
    pub items: Vec<AnnotatedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntityDto {
    pub entity_name: String,
    pub type_name: String,
    pub table: String,
    pub root: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntitiesResponse {
    pub entities: Vec<EntityDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TargetsRequest {
    /// Entity name or fully-qualified entity type name
    pub entity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TargetsResponse {
    pub entity: String,
    pub targets: Vec<EntityDto>,
}
