//! Query contexts.
//!
//! A context is everything the compiler needs to render one statement:
//! the target metamodel, the criteria and the operation-specific parts.
//! Contexts are plain immutable data; [`QueryContext`] unifies the four
//! operation kinds.

use std::sync::Arc;

use sqlscope_core::{ToValue, Value};

use crate::criteria::{Criteria, CriteriaScope};
use crate::entity::Entity;
use crate::error::CompileError;
use crate::listener::next_version;
use crate::metamodel::{ColumnMeta, EntityMetamodel};

/// What a SELECT returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Every mapped column.
    #[default]
    Entity,
    /// `COUNT(*)`
    Count,
}

/// A SELECT over one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectContext {
    pub(crate) target: Arc<EntityMetamodel>,
    pub(crate) criteria: Criteria,
    pub(crate) distinct: bool,
    pub(crate) projection: Projection,
}

impl SelectContext {
    /// Selects every column of `target` matching `criteria`.
    #[must_use]
    pub const fn new(target: Arc<EntityMetamodel>, criteria: Criteria) -> Self {
        Self {
            target,
            criteria,
            distinct: false,
            projection: Projection::Entity,
        }
    }

    /// Adds `DISTINCT`.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Counts matching rows instead of returning them.
    #[must_use]
    pub const fn count(mut self) -> Self {
        self.projection = Projection::Count;
        self
    }

    /// Returns the projection.
    #[must_use]
    pub const fn projection(&self) -> Projection {
        self.projection
    }
}

/// The right-hand side of a SET item.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentValue {
    /// `column = ?`
    Bind(Value),
    /// `column = column + ?`
    Increment(i64),
}

/// One SET item.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Property reference.
    pub property: String,
    /// New value.
    pub value: AssignmentValue,
}

/// An UPDATE over one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateContext {
    pub(crate) target: Arc<EntityMetamodel>,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) criteria: Criteria,
    pub(crate) allow_missing_where: bool,
}

impl UpdateContext {
    /// Updates the rows of `target` matching `criteria`.
    #[must_use]
    pub const fn new(target: Arc<EntityMetamodel>, criteria: Criteria) -> Self {
        Self {
            target,
            assignments: Vec::new(),
            criteria,
            allow_missing_where: false,
        }
    }

    /// Adds `property = value`.
    #[must_use]
    pub fn set(mut self, property: impl Into<String>, value: impl ToValue) -> Self {
        self.assignments.push(Assignment {
            property: property.into(),
            value: AssignmentValue::Bind(value.to_value()),
        });
        self
    }

    /// Adds `property = property + by`.
    #[must_use]
    pub fn increment(mut self, property: impl Into<String>, by: i64) -> Self {
        self.assignments.push(Assignment {
            property: property.into(),
            value: AssignmentValue::Increment(by),
        });
        self
    }

    /// Permits an UPDATE without a where clause.
    #[must_use]
    pub const fn allow_missing_where(mut self) -> Self {
        self.allow_missing_where = true;
        self
    }

    /// Returns the SET items.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Updates one entity's row.
    ///
    /// Sets every column except identifiers, identity, created-at and
    /// version; increments the version, or sets it to its first value when
    /// it is null; matches on the identifier and the current version.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NoIdentifier`] for identifier-less entities
    /// and [`CompileError::MissingValue`] if the entity cannot supply a
    /// property.
    pub fn for_entity<E: Entity>(
        target: Arc<EntityMetamodel>,
        entity: &E,
    ) -> Result<Self, CompileError> {
        let criteria = identity_criteria(&target, entity)?;
        let mut context = Self::new(Arc::clone(&target), criteria);
        let skip = [target.version_column(), target.created_at_column()];
        for column in target.columns() {
            let skipped = skip
                .iter()
                .flatten()
                .any(|c| c.property_path() == column.property_path());
            if skipped || target.is_id(column) || column.is_identity() {
                continue;
            }
            let value = read(&target, entity, column)?;
            context = context.set(column.property_path(), value);
        }
        if let Some(version) = target.version_column() {
            let current = read(&target, entity, version)?;
            // NULL + 1 is NULL, so a missing version is set outright
            context = if current.is_null() {
                context.set(version.property_path(), next_version(Some(&current)))
            } else {
                context.increment(version.property_path(), 1)
            };
        }
        Ok(context)
    }
}

/// A DELETE over one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteContext {
    pub(crate) target: Arc<EntityMetamodel>,
    pub(crate) criteria: Criteria,
    pub(crate) allow_missing_where: bool,
}

impl DeleteContext {
    /// Deletes the rows of `target` matching `criteria`.
    #[must_use]
    pub const fn new(target: Arc<EntityMetamodel>, criteria: Criteria) -> Self {
        Self {
            target,
            criteria,
            allow_missing_where: false,
        }
    }

    /// Permits a DELETE without a where clause.
    #[must_use]
    pub const fn allow_missing_where(mut self) -> Self {
        self.allow_missing_where = true;
        self
    }

    /// Deletes one entity's row, matching on the identifier and the
    /// current version.
    ///
    /// # Errors
    ///
    /// Same as [`UpdateContext::for_entity`].
    pub fn for_entity<E: Entity>(
        target: Arc<EntityMetamodel>,
        entity: &E,
    ) -> Result<Self, CompileError> {
        let criteria = identity_criteria(&target, entity)?;
        Ok(Self::new(target, criteria))
    }
}

/// An INSERT of one or more rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertContext {
    pub(crate) target: Arc<EntityMetamodel>,
    pub(crate) rows: Vec<Vec<(String, Value)>>,
}

impl InsertContext {
    /// Starts an insert into `target`.
    #[must_use]
    pub const fn new(target: Arc<EntityMetamodel>) -> Self {
        Self {
            target,
            rows: Vec::new(),
        }
    }

    /// Adds a row of `(property, value)` pairs.
    #[must_use]
    pub fn row(mut self, values: Vec<(String, Value)>) -> Self {
        self.rows.push(values);
        self
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<(String, Value)>] {
        &self.rows
    }

    /// Inserts one entity, reading every non-identity column from it.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MissingValue`] if the entity cannot supply a
    /// property.
    pub fn for_entity<E: Entity>(
        target: Arc<EntityMetamodel>,
        entity: &E,
    ) -> Result<Self, CompileError> {
        let row = target
            .columns()
            .iter()
            .filter(|c| !c.is_identity())
            .map(|c| Ok((c.property_path().to_owned(), read(&target, entity, c)?)))
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Self::new(target).row(row))
    }
}

fn read<E: Entity>(
    target: &EntityMetamodel,
    entity: &E,
    column: &ColumnMeta,
) -> Result<Value, CompileError> {
    entity
        .value_of(column.property_path())
        .ok_or_else(|| CompileError::MissingValue {
            entity: target.entity_name().to_owned(),
            property: column.property_path().to_owned(),
        })
}

/// `id = ? [AND id2 = ?] [AND version = ?]` for one entity.
fn identity_criteria<E: Entity>(
    target: &EntityMetamodel,
    entity: &E,
) -> Result<Criteria, CompileError> {
    let ids = target.id_columns();
    if ids.is_empty() {
        return Err(CompileError::NoIdentifier {
            entity: target.entity_name().to_owned(),
        });
    }
    let mut keys = Vec::with_capacity(ids.len() + 1);
    for column in ids.into_iter().chain(target.version_column()) {
        keys.push((column.property_path(), read(target, entity, column)?));
    }
    Ok(CriteriaScope::build(|c| {
        c.where_clause(|w| {
            for (property, value) in keys {
                if value.is_null() {
                    w.is_null(property);
                } else {
                    w.eq(property, value);
                }
            }
        });
    })?)
}

/// Kind tag for a [`QueryContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// INSERT
    Insert,
    /// UPDATE
    Update,
    /// DELETE
    Delete,
    /// SELECT
    Select,
}

impl QueryKind {
    /// Returns the SQL verb.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Select => "SELECT",
        }
    }
}

/// Any of the four operation contexts.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryContext {
    /// INSERT
    Insert(InsertContext),
    /// UPDATE
    Update(UpdateContext),
    /// DELETE
    Delete(DeleteContext),
    /// SELECT
    Select(SelectContext),
}

impl QueryContext {
    /// Returns the metamodels the statement touches.
    #[must_use]
    pub fn entity_metamodels(&self) -> Vec<&EntityMetamodel> {
        vec![self.target()]
    }

    /// Returns the target metamodel.
    #[must_use]
    pub fn target(&self) -> &EntityMetamodel {
        match self {
            Self::Insert(c) => &c.target,
            Self::Update(c) => &c.target,
            Self::Delete(c) => &c.target,
            Self::Select(c) => &c.target,
        }
    }

    /// Returns the criteria, for the kinds that have them.
    #[must_use]
    pub const fn criteria(&self) -> Option<&Criteria> {
        match self {
            Self::Insert(_) => None,
            Self::Update(c) => Some(&c.criteria),
            Self::Delete(c) => Some(&c.criteria),
            Self::Select(c) => Some(&c.criteria),
        }
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        match self {
            Self::Insert(_) => QueryKind::Insert,
            Self::Update(_) => QueryKind::Update,
            Self::Delete(_) => QueryKind::Delete,
            Self::Select(_) => QueryKind::Select,
        }
    }
}

impl From<InsertContext> for QueryContext {
    fn from(context: InsertContext) -> Self {
        Self::Insert(context)
    }
}

impl From<UpdateContext> for QueryContext {
    fn from(context: UpdateContext) -> Self {
        Self::Update(context)
    }
}

impl From<DeleteContext> for QueryContext {
    fn from(context: DeleteContext) -> Self {
        Self::Delete(context)
    }
}

impl From<SelectContext> for QueryContext {
    fn from(context: SelectContext) -> Self {
        Self::Select(context)
    }
}
