//! Error types for the ORM.

use sqlscope_core::{SqlType, StatementError};
use thiserror::Error;

/// A boxed error raised by user code: listeners and executors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Metadata configuration errors, detected when a metamodel is built.
///
/// Every variant names the entity and, where one is involved, the property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetamodelError {
    /// The entity maps no columns at all.
    #[error("entity `{entity}` declares no columns")]
    NoColumns {
        /// Entity name.
        entity: String,
    },

    /// A top-level entity without an identifier property.
    #[error("entity `{entity}` declares no identifier property")]
    MissingId {
        /// Entity name.
        entity: String,
    },

    /// A property name is empty.
    #[error("entity `{entity}` declares a property with an empty name")]
    EmptyPropertyName {
        /// Entity name.
        entity: String,
    },

    /// The same property path appears twice.
    #[error("entity `{entity}`: property `{property}` is declared more than once")]
    DuplicateProperty {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
    },

    /// A second version, created-at or updated-at property.
    #[error("entity `{entity}`: property `{property}` is a second {marker} property (first: `{first}`)")]
    DuplicateMarker {
        /// Entity name.
        entity: String,
        /// The offending property path.
        property: String,
        /// The marker kind.
        marker: &'static str,
        /// The property that already carries the marker.
        first: String,
    },

    /// A generated-value marker on a property that is not an identifier.
    #[error("entity `{entity}`: property `{property}` declares a generated value but is not an identifier")]
    GeneratorOnNonId {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
    },

    /// More than one generation strategy on one property.
    #[error("entity `{entity}`: property `{property}` declares more than one generation strategy")]
    ConflictingGeneration {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
    },

    /// A sequence generator that does not advance.
    #[error("entity `{entity}`: sequence `{sequence}` on property `{property}` must increment by at least 1, got {increment_by}")]
    InvalidIncrement {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
        /// Sequence name.
        sequence: String,
        /// The declared increment.
        increment_by: i64,
    },

    /// Two properties map to the same column once embeddings are flattened.
    #[error("entity `{entity}`: property `{property}` maps to column `{column}`, already used by `{other}`")]
    DuplicateColumn {
        /// Entity name.
        entity: String,
        /// The offending property path.
        property: String,
        /// Column name.
        column: String,
        /// The property that claimed the column first.
        other: String,
    },
}

/// Criteria construction errors, detected when a scope is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// `limit { .. }` produced a negative number.
    #[error("limit must not be negative, got {0}")]
    NegativeLimit(i64),

    /// `offset { .. }` produced a negative number.
    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),

    /// An `and`, `or` or `not` block declared nothing.
    #[error("empty `{0}` group in where clause")]
    EmptyGroup(&'static str),

    /// An IN list without values.
    #[error("empty IN list for property `{0}`")]
    EmptyInList(String),

    /// A criterion or sort item names no property.
    #[error("criterion references an empty property name")]
    EmptyProperty,
}

/// Errors raised while rendering a context into a statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The property is not mapped by the entity.
    #[error("entity `{entity}` has no property `{property}`")]
    UnknownProperty {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
    },

    /// UPDATE or DELETE without a where clause.
    #[error("{operation} on entity `{entity}` has no where clause")]
    MissingWhereClause {
        /// Entity name.
        entity: String,
        /// `UPDATE` or `DELETE`.
        operation: &'static str,
    },

    /// UPDATE without assignments.
    #[error("update on entity `{entity}` assigns nothing")]
    EmptyAssignment {
        /// Entity name.
        entity: String,
    },

    /// INSERT without rows.
    #[error("insert on entity `{entity}` has no rows")]
    EmptyInsert {
        /// Entity name.
        entity: String,
    },

    /// An insert row lacks a value for a column.
    #[error("entity `{entity}`: no value for property `{property}`")]
    MissingValue {
        /// Entity name.
        entity: String,
        /// Property path.
        property: String,
    },

    /// Entity-based UPDATE or DELETE on an identifier-less entity.
    #[error("entity `{entity}` has no identifier to address a single row")]
    NoIdentifier {
        /// Entity name.
        entity: String,
    },

    /// The dialect cannot fetch sequence values.
    #[error("dialect `{dialect}` does not support sequence `{sequence}`")]
    UnsupportedSequence {
        /// Dialect name.
        dialect: &'static str,
        /// Sequence name.
        sequence: String,
    },

    /// The dialect cannot order nulls explicitly.
    #[error("dialect `{dialect}` does not support NULLS FIRST/LAST")]
    UnsupportedNullOrdering {
        /// Dialect name.
        dialect: &'static str,
    },

    /// Ordering or paging on an UPDATE or DELETE the dialect cannot
    /// restrict.
    #[error("dialect `{dialect}` cannot apply {clause} to {operation}")]
    UnsupportedPaging {
        /// `UPDATE` or `DELETE`.
        operation: &'static str,
        /// Dialect name.
        dialect: &'static str,
        /// `ORDER BY`, `LIMIT` or `OFFSET`.
        clause: &'static str,
    },

    /// The rendered text and its bound values disagree.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Criteria built while compiling were malformed.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

/// Errors raised when writing a value back into an entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The entity does not accept writes to this property.
    #[error("property `{property}` cannot be assigned")]
    Unsupported {
        /// Property path.
        property: String,
    },

    /// The value's type does not fit the property.
    #[error("property `{property}` expects {expected}, got {found}")]
    TypeMismatch {
        /// Property path.
        property: String,
        /// The property's type.
        expected: SqlType,
        /// The value's type.
        found: SqlType,
    },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by a [`Session`](crate::Session).
#[derive(Debug, Error)]
pub enum QueryError {
    /// The entity's metadata is malformed.
    #[error(transparent)]
    Metamodel(#[from] MetamodelError),

    /// The criteria block is malformed.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// The statement could not be rendered.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A generated or stamped value could not be written back.
    #[error(transparent)]
    Assign(#[from] AssignError),

    /// A lifecycle hook failed; the hook's error is the source.
    #[error("lifecycle hook failed: {0}")]
    Hook(#[source] BoxError),

    /// The executor failed; its error is the source.
    #[error("statement execution failed: {0}")]
    Execution(#[source] BoxError),

    /// A versioned UPDATE or DELETE matched no row.
    #[error("optimistic lock failed for entity `{entity}`: no row matched the expected version")]
    OptimisticLock {
        /// Entity name.
        entity: String,
    },
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, QueryError>;
