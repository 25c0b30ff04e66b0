//! Entity hierarchy reader.
//!
//! Reads persistence mapping annotations off scanned types and answers polymorphic query
//! questions with the hierarchy predicate: a row of type `R` belongs to a query on entity `Q`
//! iff `R.is_type_or_super_type(Q)`.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::annotation::AnnotationInstance;
use crate::domain::descriptor::TypeId;
use crate::domain::error::DescriptorError;
use crate::domain::index::DescriptorIndex;
use crate::domain::view::TypeRef;

const PERSISTENCE_PACKAGES: [&str; 2] = ["jakarta.persistence", "javax.persistence"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InheritanceStrategy {
    #[default]
    SingleTable,
    Joined,
    TablePerClass,
}

impl InheritanceStrategy {
    /// Accepts `JOINED` as well as qualified forms such as `InheritanceType.JOINED`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.rsplit('.').next()?.trim() {
            "SINGLE_TABLE" => Some(Self::SingleTable),
            "JOINED" => Some(Self::Joined),
            "TABLE_PER_CLASS" => Some(Self::TablePerClass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleTable => "SINGLE_TABLE",
            Self::Joined => "JOINED",
            Self::TablePerClass => "TABLE_PER_CLASS",
        }
    }
}

/// One mapped entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMapping {
    pub type_id: TypeId,
    pub type_name: String,
    pub entity_name: String,
    pub table: String,
    /// Entity name of the topmost entity in this entity's superclass chain.
    pub root: String,
    /// Strategy declared on the root; inherited by the whole hierarchy.
    pub strategy: InheritanceStrategy,
}

/// Entities of one index, in id order.
pub struct EntityModel<'a> {
    index: &'a DescriptorIndex,
    entities: Vec<EntityMapping>,
    by_entity_name: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
}

impl<'a> EntityModel<'a> {
    pub fn from_index(index: &'a DescriptorIndex) -> Result<Self, DescriptorError> {
        let mut entities = Vec::new();
        let mut by_entity_name: HashMap<String, usize> = HashMap::new();
        let mut by_type = HashMap::new();

        for t in index.scanned_types() {
            let Some(entity) = persistence_annotation(&t, "Entity") else {
                continue;
            };
            let entity_name = entity_name_of(&t, entity);
            if let Some(&existing) = by_entity_name.get(&entity_name) {
                let first: &EntityMapping = &entities[existing];
                return Err(DescriptorError::malformed(
                    t.name(),
                    format!(
                        "entity name `{entity_name}` already mapped by `{}`",
                        first.type_name
                    ),
                ));
            }
            let table = persistence_annotation(&t, "Table")
                .and_then(|a| a.str_value("name"))
                .filter(|n| !n.is_empty())
                .unwrap_or(entity_name.as_str())
                .to_string();

            let (root, root_entity) = t
                .supertypes()
                .filter_map(|s| persistence_annotation(&s, "Entity").map(|a| (s, a)))
                .last()
                .unwrap_or((t, entity));
            let strategy = match persistence_annotation(&root, "Inheritance")
                .and_then(|a| a.str_value("strategy"))
            {
                None => InheritanceStrategy::default(),
                Some(raw) => InheritanceStrategy::parse(raw).ok_or_else(|| {
                    DescriptorError::malformed(
                        root.name(),
                        format!("unknown inheritance strategy `{raw}`"),
                    )
                })?,
            };

            by_entity_name.insert(entity_name.clone(), entities.len());
            by_type.insert(t.id(), entities.len());
            entities.push(EntityMapping {
                type_id: t.id(),
                type_name: t.name().to_string(),
                entity_name,
                table,
                root: entity_name_of(&root, root_entity),
                strategy,
            });
        }

        Ok(Self {
            index,
            entities,
            by_entity_name,
            by_type,
        })
    }

    pub fn entities(&self) -> &[EntityMapping] {
        &self.entities
    }

    /// Lookup by entity name first, then by fully-qualified type name.
    pub fn find(&self, name: &str) -> Option<&EntityMapping> {
        self.by_entity_name
            .get(name)
            .or_else(|| self.index.lookup(name).and_then(|id| self.by_type.get(&id)))
            .map(|&i| &self.entities[i])
    }

    /// Entities a polymorphic query on `entity` covers: the entity and every entity subtype.
    pub fn query_targets(&self, entity: &str) -> Option<Vec<&EntityMapping>> {
        let query = self.type_of(self.find(entity)?);
        Some(
            self.entities
                .iter()
                .filter(|e| self.type_of(e).is_type_or_super_type(&query))
                .collect(),
        )
    }

    /// Whether a row tagged with `row_type` (entity or type name) belongs to a query on `entity`.
    pub fn matches(&self, entity: &str, row_type: &str) -> bool {
        let Some(query) = self.find(entity) else {
            return false;
        };
        let row = match self.find(row_type) {
            Some(e) => self.type_of(e),
            None => match self.index.get(row_type) {
                Some(t) => t,
                None => return false,
            },
        };
        row.is_type_or_super_type(&self.type_of(query))
    }

    fn type_of(&self, mapping: &EntityMapping) -> TypeRef<'a> {
        self.index.type_ref(mapping.type_id)
    }
}

/// `@Entity(name)`, defaulting to the unqualified class name; nested classes keep their
/// enclosing-type prefix (`a.Outer$Inner` → `Outer$Inner`).
fn entity_name_of(t: &TypeRef<'_>, entity: &AnnotationInstance) -> String {
    entity
        .str_value("name")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| unqualified(t.name()))
        .to_string()
}

fn unqualified(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn persistence_annotation<'a>(t: &TypeRef<'a>, simple: &str) -> Option<&'a AnnotationInstance> {
    PERSISTENCE_PACKAGES
        .iter()
        .find_map(|package| t.annotation(&format!("{package}.{simple}")))
}
