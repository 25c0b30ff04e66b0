use crate::domain::annotation::{AnnotationInstance, AnnotationMap, AnnotationName};
use crate::domain::descriptor::{
    FieldDescriptor, MethodDescriptor, TypeDescriptor, TypeId, TypeKind,
};
use crate::domain::error::{BuildError, DescriptorError};
use crate::domain::index::DescriptorIndex;
use crate::domain::modifiers::Modifiers;
use crate::domain::ports::{Resolution, TypeResolver};
use crate::domain::scan::{AnnotationRecord, ScanIndex, TypeRecord};
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Most array dimensions a type name may carry (the JVM limit).
const MAX_ARRAY_DEPTH: usize = 255;

/// Descriptor builder - Domain Service for constructing a DescriptorIndex
pub struct DescriptorBuilder {
    resolver: Box<dyn TypeResolver>,
}

/// Lenient build result: the index of every type that survived, plus why the others did not.
#[derive(Debug)]
pub struct BuildReport {
    pub index: DescriptorIndex,
    pub rejected: Vec<DescriptorError>,
}

impl DescriptorBuilder {
    pub fn new(resolver: Box<dyn TypeResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver_name(&self) -> &str {
        self.resolver.name()
    }

    /// Fail-fast build: any rejected type fails the whole build.
    pub fn build(&self, scan: &ScanIndex) -> Result<DescriptorIndex, BuildError> {
        let report = self.build_lenient(scan);
        if report.rejected.is_empty() {
            Ok(report.index)
        } else {
            Err(BuildError {
                errors: report.rejected,
            })
        }
    }

    /// Two-pass build strategy: register every scanned name, then link references.
    ///
    /// A rejected type is left out together with every scanned type that references it,
    /// transitively; the rest is linked normally.
    pub fn build_lenient(&self, scan: &ScanIndex) -> BuildReport {
        let mut errors: Vec<DescriptorError> = Vec::new();
        let mut names = NameCache::new(self.resolver.as_ref());

        // Pass 1: Validation and Name Registration
        let mut pending: Vec<PendingType<'_>> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut invalid: BTreeSet<&str> = BTreeSet::new();

        for unit in &scan.units {
            for (position, record) in unit.types.iter().enumerate() {
                match validate_type(&unit.relative_path, position, record) {
                    Ok(p) => {
                        if let Some(&first) = slots.get(p.name) {
                            errors.push(DescriptorError::malformed(
                                location(&unit.relative_path, p.name),
                                format!(
                                    "duplicate type name, first declared in `{}`",
                                    pending[first].unit
                                ),
                            ));
                            continue;
                        }
                        slots.insert(p.name, pending.len());
                        pending.push(p);
                    }
                    Err(e) => {
                        if let Some(name) = record.name.as_deref().filter(|n| !n.is_empty()) {
                            invalid.insert(name);
                        }
                        errors.push(e);
                    }
                }
            }
        }
        // A name that was malformed anywhere is not linkable, even if another record declares it.
        for name in &invalid {
            if let Some(&slot) = slots.get(name) {
                pending[slot].rejected = true;
                errors.push(DescriptorError::malformed(
                    location(pending[slot].unit, name),
                    "type name also declared by a malformed record",
                ));
            }
        }
        debug!(
            units = scan.units.len(),
            registered = pending.len(),
            "descriptor build: names registered"
        );

        // Pass 2: Reference Resolution
        for p in pending.iter_mut().filter(|p| !p.rejected) {
            let mut missing: Vec<&str> = Vec::new();
            for name in p.record.referenced_names() {
                match scanned_target(name, &slots, &invalid, &mut names) {
                    Ok(Some(dep)) => {
                        p.deps.insert(dep);
                    }
                    Ok(None) => {}
                    Err(unresolved) => {
                        if !missing.contains(&unresolved) {
                            missing.push(unresolved);
                        }
                    }
                }
            }
            for sup in supertype_names(p.record) {
                if !slots.contains_key(sup)
                    && matches!(
                        names.resolve(sup),
                        Some(Resolution::Primitive | Resolution::Array { .. })
                    )
                {
                    errors.push(DescriptorError::malformed(
                        p.name,
                        format!("supertype `{sup}` is not a class or interface"),
                    ));
                    p.rejected = true;
                }
            }
            if !missing.is_empty() {
                p.rejected = true;
                errors.extend(
                    missing
                        .into_iter()
                        .map(|m| DescriptorError::unresolved(m, p.name)),
                );
            }
        }

        // Pass 3: Inheritance Cycles
        let mut inheritance: DiGraphMap<&str, ()> = DiGraphMap::new();
        for p in pending.iter().filter(|p| !p.rejected) {
            inheritance.add_node(p.name);
            for sup in supertype_names(p.record) {
                if slots.contains_key(sup) {
                    inheritance.add_edge(p.name, sup, ());
                }
            }
        }
        for mut component in tarjan_scc(&inheritance) {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| inheritance.contains_edge(n, n));
            if !cyclic {
                continue;
            }
            component.sort_unstable();
            for name in component {
                if let Some(&slot) = slots.get(name) {
                    pending[slot].rejected = true;
                    errors.push(DescriptorError::CyclicInheritance {
                        type_name: name.to_string(),
                    });
                }
            }
        }

        // Pass 4: Transitive Rejection
        loop {
            let newly: Vec<(usize, &str)> = pending
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.rejected)
                .filter_map(|(i, p)| {
                    p.deps
                        .iter()
                        .find(|d| slots.get(*d).is_some_and(|&s| pending[s].rejected))
                        .map(|d| (i, *d))
                })
                .collect();
            if newly.is_empty() {
                break;
            }
            for (i, dep) in newly {
                pending[i].rejected = true;
                errors.push(DescriptorError::unresolved(dep, pending[i].name));
            }
        }

        for e in &errors {
            warn!(kind = e.kind(), error = %e, "descriptor rejected");
        }

        // Pass 5: Linking
        let accepted: Vec<&PendingType<'_>> = pending.iter().filter(|p| !p.rejected).collect();
        let index = match link(&accepted, &mut names) {
            Ok(index) => index,
            Err(e) => {
                errors.push(e);
                DescriptorIndex::new()
            }
        };

        info!(
            types = index.len(),
            methods = index.method_count(),
            fields = index.field_count(),
            rejected = errors.len(),
            resolver = self.resolver.name(),
            "descriptor index built"
        );

        BuildReport {
            index,
            rejected: errors,
        }
    }
}

/// Validated view of one type record; owned annotation maps, borrowed everything else.
struct PendingType<'s> {
    name: &'s str,
    unit: &'s str,
    record: &'s TypeRecord,
    modifiers: u32,
    annotations: AnnotationMap,
    fields: Vec<PendingField<'s>>,
    methods: Vec<PendingMethod<'s>>,
    /// Scanned type names this type references, directly or through array components.
    deps: BTreeSet<&'s str>,
    rejected: bool,
}

fn supertype_names(record: &TypeRecord) -> impl Iterator<Item = &str> {
    record
        .super_type
        .as_deref()
        .into_iter()
        .chain(record.interfaces.iter().map(String::as_str))
}

struct PendingMethod<'s> {
    name: &'s str,
    modifiers: u32,
    return_type: &'s str,
    parameter_types: &'s [String],
    annotations: AnnotationMap,
}

struct PendingField<'s> {
    name: &'s str,
    modifiers: u32,
    field_type: &'s str,
    annotations: AnnotationMap,
}

fn location(unit: &str, name: &str) -> String {
    if unit.is_empty() {
        name.to_string()
    } else {
        format!("{unit}: {name}")
    }
}

fn validate_type<'s>(
    unit: &'s str,
    position: usize,
    record: &'s TypeRecord,
) -> Result<PendingType<'s>, DescriptorError> {
    let name = match record.name.as_deref() {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            return Err(DescriptorError::malformed(
                location(unit, &format!("type #{position}")),
                "missing type name",
            ));
        }
    };
    let here = location(unit, name);
    let modifiers = record
        .modifiers
        .ok_or_else(|| DescriptorError::malformed(&here, "missing type modifiers"))?;
    let annotations = convert_annotations(record.annotations.as_deref(), &here)?;

    let mut fields = Vec::with_capacity(record.fields.len());
    for (i, f) in record.fields.iter().enumerate() {
        let field_name = non_empty(f.name.as_deref()).ok_or_else(|| {
            DescriptorError::malformed(format!("{name}.<field #{i}>"), "missing field name")
        })?;
        let at = format!("{name}.{field_name}");
        let modifiers = f
            .modifiers
            .ok_or_else(|| DescriptorError::malformed(&at, "missing field modifiers"))?;
        let field_type = non_empty(f.field_type.as_deref())
            .ok_or_else(|| DescriptorError::malformed(&at, "missing field type"))?;
        fields.push(PendingField {
            name: field_name,
            modifiers,
            field_type,
            annotations: convert_annotations(f.annotations.as_deref(), &at)?,
        });
    }

    let mut methods = Vec::with_capacity(record.methods.len());
    for (i, m) in record.methods.iter().enumerate() {
        let method_name = non_empty(m.name.as_deref()).ok_or_else(|| {
            DescriptorError::malformed(format!("{name}#<method #{i}>"), "missing method name")
        })?;
        let at = format!("{name}#{method_name}");
        let modifiers = m
            .modifiers
            .ok_or_else(|| DescriptorError::malformed(&at, "missing method modifiers"))?;
        let return_type = non_empty(m.return_type.as_deref())
            .ok_or_else(|| DescriptorError::malformed(&at, "missing return type"))?;
        if m.parameter_types.iter().any(|p| p.trim().is_empty()) {
            return Err(DescriptorError::malformed(&at, "empty parameter type name"));
        }
        methods.push(PendingMethod {
            name: method_name,
            modifiers,
            return_type,
            parameter_types: &m.parameter_types,
            annotations: convert_annotations(m.annotations.as_deref(), &at)?,
        });
    }

    if record.super_type.as_deref().is_some_and(|s| s.trim().is_empty())
        || record.interfaces.iter().any(|i| i.trim().is_empty())
    {
        return Err(DescriptorError::malformed(&here, "empty supertype name"));
    }

    Ok(PendingType {
        name,
        unit,
        record,
        modifiers,
        annotations,
        fields,
        methods,
        deps: BTreeSet::new(),
        rejected: false,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn convert_annotations(
    records: Option<&[AnnotationRecord]>,
    at: &str,
) -> Result<AnnotationMap, DescriptorError> {
    let mut map = AnnotationMap::new();
    for record in records.unwrap_or_default() {
        let name = non_empty(record.name.as_deref())
            .ok_or_else(|| DescriptorError::malformed(at, "annotation without a name"))?;
        let key = AnnotationName::new(name);
        if map.contains_key(&key) {
            return Err(DescriptorError::malformed(
                at,
                format!("duplicate annotation `{name}`"),
            ));
        }
        map.insert(
            key.clone(),
            AnnotationInstance::new(key, record.values.clone()),
        );
    }
    Ok(map)
}

/// Resolver answers, asked at most once per name.
struct NameCache<'r> {
    resolver: &'r dyn TypeResolver,
    answers: HashMap<String, Option<Resolution>>,
}

impl<'r> NameCache<'r> {
    fn new(resolver: &'r dyn TypeResolver) -> Self {
        Self {
            resolver,
            answers: HashMap::new(),
        }
    }

    fn resolve(&mut self, name: &str) -> Option<Resolution> {
        if let Some(answer) = self.answers.get(name) {
            return answer.clone();
        }
        let answer = self.resolver.resolve(name);
        self.answers.insert(name.to_string(), answer.clone());
        answer
    }
}

/// Follows array components until a scanned name, a fallback-resolved name, or a failure.
///
/// `Ok(Some(name))` is a scanned dependency, `Ok(None)` a resolved library/primitive type,
/// `Err(name)` the name that could not be linked.
fn scanned_target<'s>(
    name: &'s str,
    slots: &HashMap<&'s str, usize>,
    invalid: &BTreeSet<&'s str>,
    names: &mut NameCache<'_>,
) -> Result<Option<&'s str>, &'s str> {
    if let Some((&scanned, _)) = slots.get_key_value(name) {
        return Ok(Some(scanned));
    }
    if invalid.contains(name) {
        return Err(name);
    }
    let mut current = name.to_string();
    let mut dimensions = 0;
    loop {
        match names.resolve(&current) {
            Some(Resolution::Array { component }) => {
                dimensions += 1;
                if dimensions > MAX_ARRAY_DEPTH {
                    return Err(name);
                }
                if let Some((&scanned, _)) = slots.get_key_value(component.as_str()) {
                    return Ok(Some(scanned));
                }
                if invalid.contains(component.as_str()) {
                    return Err(name);
                }
                current = component;
            }
            Some(Resolution::Primitive | Resolution::Library) => return Ok(None),
            None => return Err(name),
        }
    }
}

/// Assigns final ids (accepted scanned types first, in scan order; then fallback types in
/// first-use order) and materializes the descriptors.
fn link(
    accepted: &[&PendingType<'_>],
    names: &mut NameCache<'_>,
) -> Result<DescriptorIndex, DescriptorError> {
    let mut linker = Linker {
        ids: accepted
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.to_string(), TypeId::from_index(i)))
            .collect(),
        synthetic: Vec::new(),
        base: accepted.len(),
        names,
    };

    let mut types = Vec::with_capacity(accepted.len());
    for (i, p) in accepted.iter().enumerate() {
        let id = TypeId::from_index(i);
        let super_type = p
            .record
            .super_type
            .as_deref()
            .map(|s| linker.id_of(s, p.name))
            .transpose()?;
        let interfaces = p
            .record
            .interfaces
            .iter()
            .map(|s| linker.id_of(s, p.name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields = Vec::with_capacity(p.fields.len());
        for f in &p.fields {
            fields.push(FieldDescriptor::new(
                f.name,
                id,
                Modifiers::from_bits(f.modifiers),
                linker.id_of(f.field_type, p.name)?,
                Some(f.annotations.clone()),
            ));
        }

        let mut methods = Vec::with_capacity(p.methods.len());
        for m in &p.methods {
            let return_type = linker.id_of(m.return_type, p.name)?;
            let parameter_types = m
                .parameter_types
                .iter()
                .map(|t| linker.id_of(t, p.name))
                .collect::<Result<Vec<_>, _>>()?;
            methods.push(MethodDescriptor::new(
                m.name,
                id,
                Modifiers::from_bits(m.modifiers),
                return_type,
                parameter_types,
                Some(m.annotations.clone()),
            ));
        }

        types.push(TypeDescriptor {
            id,
            name: p.name.to_string(),
            kind: TypeKind::from(p.record.kind),
            modifiers: Modifiers::from_bits(p.modifiers),
            super_type,
            interfaces,
            fields,
            methods,
            annotations: p.annotations.clone(),
            source: Some(p.unit.to_string()),
        });
    }

    types.extend(linker.synthetic);
    Ok(DescriptorIndex::from_types(types))
}

struct Linker<'n, 'r> {
    ids: HashMap<String, TypeId>,
    synthetic: Vec<TypeDescriptor>,
    base: usize,
    names: &'n mut NameCache<'r>,
}

impl Linker<'_, '_> {
    fn id_of(&mut self, name: &str, referenced_from: &str) -> Result<TypeId, DescriptorError> {
        self.id_of_depth(name, referenced_from, 0)
    }

    fn id_of_depth(
        &mut self,
        name: &str,
        referenced_from: &str,
        depth: usize,
    ) -> Result<TypeId, DescriptorError> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        if depth > MAX_ARRAY_DEPTH {
            return Err(DescriptorError::unresolved(name, referenced_from));
        }
        let kind = match self.names.resolve(name) {
            Some(Resolution::Primitive) => TypeKind::Primitive,
            Some(Resolution::Library) => TypeKind::Opaque,
            Some(Resolution::Array { component }) => TypeKind::Array {
                component: self.id_of_depth(&component, referenced_from, depth + 1)?,
            },
            None => return Err(DescriptorError::unresolved(name, referenced_from)),
        };
        let id = TypeId::from_index(self.base + self.synthetic.len());
        self.synthetic
            .push(TypeDescriptor::synthetic(id, name.to_string(), kind));
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }
}
