use crate::adapters::resolver::{ClosedWorldResolver, JvmTypeResolver};
use crate::adapters::scan::JsonScanAdapter;
use crate::app::dto::*;
use crate::domain::annotation::AnnotationMap;
use crate::domain::builder::DescriptorBuilder;
use crate::domain::entity::{EntityMapping, EntityModel};
use crate::domain::error::DescriptorError;
use crate::domain::index::DescriptorIndex;
use crate::domain::modifiers::Modifiers;
use crate::domain::ports::{ScanSource, TypeResolver};
use crate::domain::scan::ScanIndex;
use crate::domain::view::{AnnotatedElement, TypeRef};
use anyhow::{Context as _, Result, anyhow, bail};
use regex::RegexBuilder;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

#[derive(Clone)]
pub struct DescriptorEngine {
    inner: Arc<RwLock<EngineData>>,
}

struct EngineData {
    scan_paths: Vec<PathBuf>,
    project_root: String,
    options: EngineOptions,
    resolver_name: String,
    index: Arc<DescriptorIndex>,
    rejected: Vec<DescriptorError>,
}

impl DescriptorEngine {
    /// Construct an engine from an already-built index.
    ///
    /// Used for testing or when the index is built by the caller; such an engine cannot reload.
    pub fn from_prebuilt(project_root: impl Into<String>, index: DescriptorIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(EngineData {
                scan_paths: Vec::new(),
                project_root: project_root.into(),
                options: EngineOptions::default(),
                resolver_name: "prebuilt".to_string(),
                index: Arc::new(index),
                rejected: Vec::new(),
            })),
        }
    }

    pub fn load_from_json(scan_paths: &[PathBuf], options: EngineOptions) -> Result<Self> {
        let data = load_data(scan_paths, options)?;
        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
        })
    }

    /// Current index; stays valid for the caller even if a reload swaps it out.
    pub fn index(&self) -> Arc<DescriptorIndex> {
        self.inner.read().unwrap().index.clone()
    }

    pub fn options(&self) -> EngineOptions {
        self.inner.read().unwrap().options.clone()
    }

    pub fn reload(&self) -> Result<HealthResponse> {
        let (paths, options) = {
            let data = self.inner.read().unwrap();
            (data.scan_paths.clone(), data.options.clone())
        };
        if paths.is_empty() {
            bail!("Engine was not loaded from scan files; nothing to reload");
        }
        let fresh = load_data(&paths, options)?;

        let mut data = self.inner.write().unwrap();
        *data = fresh;
        info!(types = data.index.len(), "descriptor index reloaded");
        Ok(health_locked(&data))
    }

    pub fn health(&self) -> HealthResponse {
        let data = self.inner.read().unwrap();
        health_locked(&data)
    }

    pub fn summary(&self) -> SummaryResponse {
        let data = self.inner.read().unwrap();
        SummaryResponse {
            health: health_locked(&data),
            rejected: data
                .rejected
                .iter()
                .map(|e| RejectionDto {
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }

    pub fn describe_type(&self, name: &str) -> Result<TypeResponse> {
        let index = self.index();
        let t = find_type(&index, name)?;
        Ok(type_dto(t))
    }

    /// Every descriptor in id order.
    pub fn dump(&self) -> Vec<TypeResponse> {
        let index = self.index();
        index.types().map(type_dto).collect()
    }

    pub fn hierarchy(&self, req: HierarchyRequest) -> Result<HierarchyResponse> {
        let index = self.index();
        let t = find_type(&index, &req.type_name)?;
        let candidate = find_type(&index, &req.candidate)?;
        Ok(HierarchyResponse {
            is_type_or_super_type: t.is_type_or_super_type(&candidate),
            is_assignable: t.is_assignable_to(&candidate),
            supertype_chain: t.supertypes().map(|s| s.name().to_string()).collect(),
            type_name: req.type_name,
            candidate: req.candidate,
        })
    }

    pub fn subtypes(&self, req: SubtypesRequest) -> Result<SubtypesResponse> {
        let index = self.index();
        let t = find_type(&index, &req.name)?;
        let subtypes = if req.transitive {
            t.all_subtypes()
        } else {
            t.direct_subtypes()
        };
        Ok(SubtypesResponse {
            subtypes: subtypes.into_iter().map(type_summary).collect(),
            name: req.name,
            transitive: req.transitive,
        })
    }

    /// Searches scanned type names; results sorted by name.
    pub fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
        let index = self.index();
        let matcher = if req.regex {
            Some(
                RegexBuilder::new(&req.pattern)
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("Invalid search pattern: {}", req.pattern))?,
            )
        } else {
            None
        };
        let needle = req.pattern.to_lowercase();

        let mut matches: Vec<TypeRef<'_>> = index
            .scanned_types()
            .filter(|t| match &matcher {
                Some(re) => re.is_match(t.name()),
                None => t.name().to_lowercase().contains(&needle),
            })
            .collect();
        matches.sort_by(|a, b| a.name().cmp(b.name()));

        let total_matches = matches.len();
        if let Some(limit) = req.limit {
            matches.truncate(limit);
        }
        Ok(SearchResponse {
            items: matches.into_iter().map(type_summary).collect(),
            total_matches,
        })
    }

    pub fn annotated(&self, annotation: &str) -> AnnotatedResponse {
        let index = self.index();
        let items = index
            .annotated(annotation)
            .into_iter()
            .map(|element| {
                let (declaring_type, annotations) = match element {
                    AnnotatedElement::Type(t) => (t.name(), t.annotations()),
                    AnnotatedElement::Method(m) => (m.declaring_type().name(), m.annotations()),
                    AnnotatedElement::Field(f) => (f.declaring_type().name(), f.annotations()),
                };
                AnnotatedItem {
                    element_kind: element.kind().to_string(),
                    element: element.to_string(),
                    declaring_type: declaring_type.to_string(),
                    values: annotations
                        .get(annotation)
                        .map(|a| a.values().clone())
                        .unwrap_or_default(),
                }
            })
            .collect();
        AnnotatedResponse {
            annotation: annotation.to_string(),
            items,
        }
    }

    pub fn entities(&self) -> Result<EntitiesResponse> {
        let index = self.index();
        let model = EntityModel::from_index(&index).context("Failed to read entity mappings")?;
        Ok(EntitiesResponse {
            entities: model.entities().iter().map(entity_dto).collect(),
        })
    }

    pub fn targets(&self, entity: &str) -> Result<TargetsResponse> {
        let index = self.index();
        let model = EntityModel::from_index(&index).context("Failed to read entity mappings")?;
        let targets = model
            .query_targets(entity)
            .ok_or_else(|| anyhow!("Entity not found: {}", entity))?;
        Ok(TargetsResponse {
            entity: entity.to_string(),
            targets: targets.into_iter().map(entity_dto).collect(),
        })
    }
}

/// Resolver configured by `options`.
pub fn make_resolver(options: &EngineOptions) -> Box<dyn TypeResolver> {
    match options.resolver {
        ResolverKind::Jvm => Box::new(
            JvmTypeResolver::new().with_extra_prefixes(options.library_prefixes.iter()),
        ),
        ResolverKind::ClosedWorld => Box::new(ClosedWorldResolver),
    }
}

/// Builds an index from an in-memory scan; strict or lenient per `options`.
pub fn build_index(
    scan: &ScanIndex,
    options: &EngineOptions,
) -> Result<(DescriptorIndex, Vec<DescriptorError>)> {
    let builder = DescriptorBuilder::new(make_resolver(options));
    if options.lenient {
        let report = builder.build_lenient(scan);
        if !report.rejected.is_empty() {
            warn!(
                rejected = report.rejected.len(),
                "lenient build dropped rejected types"
            );
        }
        Ok((report.index, report.rejected))
    } else {
        let index = builder
            .build(scan)
            .context("Failed to build descriptor index")?;
        Ok((index, Vec::new()))
    }
}

fn load_data(scan_paths: &[PathBuf], options: EngineOptions) -> Result<EngineData> {
    let scan = JsonScanAdapter::with_paths(scan_paths).load()?;
    let (index, rejected) = build_index(&scan, &options)?;
    info!(
        types = index.len(),
        rejected = rejected.len(),
        lenient = options.lenient,
        "descriptor index loaded"
    );
    Ok(EngineData {
        scan_paths: scan_paths.to_vec(),
        project_root: scan.project_root,
        resolver_name: make_resolver(&options).name().to_string(),
        options,
        index: Arc::new(index),
        rejected,
    })
}

fn health_locked(data: &EngineData) -> HealthResponse {
    let index = data.index.as_ref();
    HealthResponse {
        scan_paths: data
            .scan_paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        project_root: data.project_root.clone(),
        resolver: data.resolver_name.clone(),
        type_count: index.len(),
        scanned_type_count: index.scanned_types().count(),
        method_count: index.method_count(),
        field_count: index.field_count(),
        edge_count: index.edge_count(),
        rejected_count: data.rejected.len(),
    }
}

fn find_type<'a>(index: &'a DescriptorIndex, name: &str) -> Result<TypeRef<'a>> {
    index
        .get(name)
        .ok_or_else(|| anyhow!("Type not found: {}", name))
}

fn keywords(modifiers: Modifiers) -> Vec<String> {
    modifiers.keywords().into_iter().map(String::from).collect()
}

fn annotations_dto(map: &AnnotationMap) -> Vec<AnnotationDto> {
    map.values()
        .map(|a| AnnotationDto {
            name: a.name().to_string(),
            values: a.values().clone(),
        })
        .collect()
}

fn type_summary(t: TypeRef<'_>) -> TypeSummary {
    TypeSummary {
        name: t.name().to_string(),
        kind: t.kind().label().to_string(),
    }
}

fn type_dto(t: TypeRef<'_>) -> TypeResponse {
    TypeResponse {
        name: t.name().to_string(),
        simple_name: t.simple_name().to_string(),
        kind: t.kind().label().to_string(),
        modifiers: t.modifiers().bits(),
        modifier_keywords: keywords(t.modifiers()),
        super_type: t.super_type().map(|s| s.name().to_string()),
        supertype_chain: t.supertypes().map(|s| s.name().to_string()).collect(),
        interfaces: t.interfaces().map(|i| i.name().to_string()).collect(),
        component_type: t.component_type().map(|c| c.name().to_string()),
        source: t.descriptor().source().map(String::from),
        annotations: annotations_dto(t.annotations()),
        fields: t
            .fields()
            .map(|f| FieldDto {
                name: f.name().to_string(),
                modifiers: f.modifiers().bits(),
                modifier_keywords: keywords(f.modifiers()),
                field_type: f.field_type().name().to_string(),
                annotations: annotations_dto(f.annotations()),
            })
            .collect(),
        methods: t
            .methods()
            .map(|m| MethodDto {
                name: m.name().to_string(),
                display: m.to_string(),
                signature: m.signature_text(),
                modifiers: m.modifiers().bits(),
                modifier_keywords: keywords(m.modifiers()),
                return_type: m.return_type().name().to_string(),
                parameter_types: m.parameter_types().map(|p| p.name().to_string()).collect(),
                annotations: annotations_dto(m.annotations()),
            })
            .collect(),
    }
}

fn entity_dto(e: &EntityMapping) -> EntityDto {
    EntityDto {
        entity_name: e.entity_name.clone(),
        type_name: e.type_name.clone(),
        table: e.table.clone(),
        root: e.root.clone(),
        strategy: e.strategy.as_str().to_string(),
    }
}
