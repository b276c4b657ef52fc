//! Entity metamodels.
//!
//! An [`EntityMetamodel`] is the validated, flattened view of an entity:
//! its table, its columns in declaration order (embedded properties
//! inlined with `outer.inner` paths), and which columns play the id,
//! version and timestamp roles. It is built once per entity type from an
//! [`EntityDescriptor`] and shared through [`MetamodelRegistry`].

mod descriptor;
mod registry;

use std::collections::HashMap;

pub use descriptor::{
    EntityDescriptor, Marker, PropertyDescriptor, SequenceGeneratorSpec, TableMarker,
};
pub use registry::MetamodelRegistry;

use descriptor::Member;

use crate::error::MetamodelError;

/// The table an entity maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    name: String,
    schema: Option<String>,
    quoted: bool,
}

impl TableMeta {
    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema, if the table is qualified.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns whether the name is rendered in dialect quotes.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }
}

/// How a column's value is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Assigned by the database during insert.
    Identity,
    /// Fetched from a sequence before insert.
    Sequence(SequenceGeneratorSpec),
}

/// One flattened column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    property_path: String,
    property_name: String,
    column_name: String,
    quoted: bool,
    generated: Option<Generation>,
}

impl ColumnMeta {
    /// Returns the dotted property path, e.g. `address.city`.
    #[must_use]
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    /// Returns the last segment of the property path.
    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Returns the column name.
    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    /// Returns whether the column name is rendered in dialect quotes.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Returns the generation strategy, if any.
    #[must_use]
    pub const fn generation(&self) -> Option<&Generation> {
        self.generated.as_ref()
    }

    /// Returns whether the value is generated by identity or sequence.
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    /// Returns whether the database assigns the value on insert.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self.generated, Some(Generation::Identity))
    }

    /// Returns the sequence feeding this column, if any.
    #[must_use]
    pub const fn sequence(&self) -> Option<&SequenceGeneratorSpec> {
        match &self.generated {
            Some(Generation::Sequence(spec)) => Some(spec),
            _ => None,
        }
    }
}

/// An embedded property and the metamodel of its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedMeta {
    property: String,
    metamodel: EntityMetamodel,
}

impl EmbeddedMeta {
    /// Returns the embedding property name.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns the embedded type's own metamodel.
    #[must_use]
    pub const fn metamodel(&self) -> &EntityMetamodel {
        &self.metamodel
    }
}

/// Validated metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetamodel {
    entity_name: String,
    table: TableMeta,
    columns: Vec<ColumnMeta>,
    id_indices: Vec<usize>,
    version_index: Option<usize>,
    created_at_index: Option<usize>,
    updated_at_index: Option<usize>,
    embedded: Vec<EmbeddedMeta>,
    identifier_less: bool,
}

impl EntityMetamodel {
    /// Validates a descriptor and flattens it into a metamodel.
    ///
    /// # Errors
    ///
    /// Returns a [`MetamodelError`] naming the entity and property at
    /// fault when the declaration is inconsistent.
    pub fn from_descriptor(descriptor: &EntityDescriptor) -> Result<Self, MetamodelError> {
        build(descriptor, true)
    }

    /// Returns the entity name.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the table.
    #[must_use]
    pub const fn table(&self) -> &TableMeta {
        &self.table
    }

    /// Returns all columns, flattened, in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Returns the identifier columns in declaration order.
    #[must_use]
    pub fn id_columns(&self) -> Vec<&ColumnMeta> {
        self.id_indices.iter().map(|&i| &self.columns[i]).collect()
    }

    /// Returns whether `column` is part of the identifier.
    #[must_use]
    pub fn is_id(&self, column: &ColumnMeta) -> bool {
        self.id_columns()
            .iter()
            .any(|c| c.property_path == column.property_path)
    }

    /// Returns the version column, if declared.
    #[must_use]
    pub fn version_column(&self) -> Option<&ColumnMeta> {
        self.version_index.map(|i| &self.columns[i])
    }

    /// Returns the creation timestamp column, if declared.
    #[must_use]
    pub fn created_at_column(&self) -> Option<&ColumnMeta> {
        self.created_at_index.map(|i| &self.columns[i])
    }

    /// Returns the modification timestamp column, if declared.
    #[must_use]
    pub fn updated_at_column(&self) -> Option<&ColumnMeta> {
        self.updated_at_index.map(|i| &self.columns[i])
    }

    /// Returns the embedded properties.
    #[must_use]
    pub fn embedded(&self) -> &[EmbeddedMeta] {
        &self.embedded
    }

    /// Returns whether the entity was declared without an identifier.
    #[must_use]
    pub const fn is_identifier_less(&self) -> bool {
        self.identifier_less
    }

    /// Resolves a property reference.
    ///
    /// An exact property path wins. Otherwise a bare property name
    /// matches if exactly one column carries it.
    #[must_use]
    pub fn column(&self, property: &str) -> Option<&ColumnMeta> {
        if let Some(column) = self.columns.iter().find(|c| c.property_path == property) {
            return Some(column);
        }
        let mut matches = self.columns.iter().filter(|c| c.property_name == property);
        match (matches.next(), matches.next()) {
            (Some(column), None) => Some(column),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Roles {
    id: bool,
    version: bool,
    created_at: bool,
    updated_at: bool,
}

/// Accumulates flattened columns and enforces uniqueness across them.
struct Flattener<'a> {
    entity: &'a str,
    columns: Vec<ColumnMeta>,
    by_column: HashMap<String, usize>,
    ids: Vec<usize>,
    version: Option<usize>,
    created_at: Option<usize>,
    updated_at: Option<usize>,
}

impl<'a> Flattener<'a> {
    fn new(entity: &'a str) -> Self {
        Self {
            entity,
            columns: Vec::new(),
            by_column: HashMap::new(),
            ids: Vec::new(),
            version: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn push(&mut self, column: ColumnMeta, roles: Roles) -> Result<(), MetamodelError> {
        if self
            .columns
            .iter()
            .any(|c| c.property_path == column.property_path)
        {
            return Err(MetamodelError::DuplicateProperty {
                entity: self.entity.to_owned(),
                property: column.property_path,
            });
        }
        let key = column.column_name.to_lowercase();
        if let Some(&other) = self.by_column.get(&key) {
            return Err(MetamodelError::DuplicateColumn {
                entity: self.entity.to_owned(),
                property: column.property_path,
                column: column.column_name,
                other: self.columns[other].property_path.clone(),
            });
        }

        let index = self.columns.len();
        for (flag, slot, marker) in [
            (roles.version, &mut self.version, "version"),
            (roles.created_at, &mut self.created_at, "created-at"),
            (roles.updated_at, &mut self.updated_at, "updated-at"),
        ] {
            if !flag {
                continue;
            }
            if let Some(first) = *slot {
                return Err(MetamodelError::DuplicateMarker {
                    entity: self.entity.to_owned(),
                    property: column.property_path,
                    marker,
                    first: self.columns[first].property_path.clone(),
                });
            }
            *slot = Some(index);
        }
        if roles.id {
            self.ids.push(index);
        }
        self.by_column.insert(key, index);
        self.columns.push(column);
        Ok(())
    }
}

fn build(descriptor: &EntityDescriptor, top_level: bool) -> Result<EntityMetamodel, MetamodelError> {
    let entity = descriptor.name.as_str();
    let mut flat = Flattener::new(entity);
    let mut embedded = Vec::new();

    for member in &descriptor.members {
        match member {
            Member::Property(property) => {
                let (column, roles) = resolve_property(entity, property)?;
                flat.push(column, roles)?;
            }
            Member::Embedded { name, descriptor } => {
                if name.is_empty() {
                    return Err(MetamodelError::EmptyPropertyName {
                        entity: entity.to_owned(),
                    });
                }
                let inner = build(descriptor, false)?;
                for (i, column) in inner.columns.iter().enumerate() {
                    let roles = Roles {
                        id: inner.id_indices.contains(&i),
                        version: inner.version_index == Some(i),
                        created_at: inner.created_at_index == Some(i),
                        updated_at: inner.updated_at_index == Some(i),
                    };
                    let column = ColumnMeta {
                        property_path: format!("{name}.{}", column.property_path),
                        ..column.clone()
                    };
                    flat.push(column, roles)?;
                }
                embedded.push(EmbeddedMeta {
                    property: name.clone(),
                    metamodel: inner,
                });
            }
        }
    }

    if flat.columns.is_empty() {
        return Err(MetamodelError::NoColumns {
            entity: entity.to_owned(),
        });
    }
    let identifier_less = descriptor.identifier_less || !top_level;
    if flat.ids.is_empty() && !identifier_less {
        return Err(MetamodelError::MissingId {
            entity: entity.to_owned(),
        });
    }

    let table = descriptor.table.as_ref().map_or_else(
        || TableMeta {
            name: entity.to_owned(),
            schema: None,
            quoted: false,
        },
        |marker| TableMeta {
            name: marker.name.clone(),
            schema: marker.schema.clone(),
            quoted: marker.quoted,
        },
    );

    Ok(EntityMetamodel {
        entity_name: entity.to_owned(),
        table,
        columns: flat.columns,
        id_indices: flat.ids,
        version_index: flat.version,
        created_at_index: flat.created_at,
        updated_at_index: flat.updated_at,
        embedded,
        identifier_less,
    })
}

fn resolve_property(
    entity: &str,
    property: &PropertyDescriptor,
) -> Result<(ColumnMeta, Roles), MetamodelError> {
    if property.name.is_empty() {
        return Err(MetamodelError::EmptyPropertyName {
            entity: entity.to_owned(),
        });
    }
    let mut roles = Roles::default();
    let mut column_name = None;
    let mut quoted = false;
    let mut generated = None;

    for marker in &property.markers {
        let generation = match marker {
            Marker::Id => {
                roles.id = true;
                continue;
            }
            Marker::Version => {
                roles.version = true;
                continue;
            }
            Marker::CreatedAt => {
                roles.created_at = true;
                continue;
            }
            Marker::UpdatedAt => {
                roles.updated_at = true;
                continue;
            }
            Marker::Column { name, quoted: q } => {
                if let Some(name) = name {
                    column_name = Some(name.clone());
                }
                quoted |= *q;
                continue;
            }
            Marker::Identity => Generation::Identity,
            Marker::Sequence(spec) => {
                if spec.increment_by < 1 {
                    return Err(MetamodelError::InvalidIncrement {
                        entity: entity.to_owned(),
                        property: property.name.clone(),
                        sequence: spec.name.clone(),
                        increment_by: spec.increment_by,
                    });
                }
                Generation::Sequence(spec.clone())
            }
        };
        if generated.replace(generation).is_some() {
            return Err(MetamodelError::ConflictingGeneration {
                entity: entity.to_owned(),
                property: property.name.clone(),
            });
        }
    }

    if generated.is_some() && !roles.id {
        return Err(MetamodelError::GeneratorOnNonId {
            entity: entity.to_owned(),
            property: property.name.clone(),
        });
    }

    let column = ColumnMeta {
        property_path: property.name.clone(),
        property_name: property.name.clone(),
        column_name: column_name.unwrap_or_else(|| property.name.clone()),
        quoted,
        generated,
    };
    Ok((column, roles))
}
