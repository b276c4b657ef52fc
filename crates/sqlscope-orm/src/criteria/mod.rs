//! Criteria: predicate, ordering, limit and offset.
//!
//! Criteria are declared through a [`CriteriaScope`] inside a closure and
//! materialized into an immutable [`Criteria`] when the closure returns.
//!
//! # Example
//!
//! ```rust
//! use sqlscope_orm::criteria::{CompareOp, Criteria, Criterion};
//! use sqlscope_orm::Value;
//!
//! let criteria = Criteria::build(|c| {
//!     c.where_clause(|w| {
//!         w.eq("department", "R&D");
//!         w.or(|w| {
//!             w.gt("salary", 5000_i64);
//!         });
//!     });
//!     c.order_by(|o| {
//!         o.desc("salary");
//!     });
//!     c.limit(|| 10);
//! })
//! .unwrap();
//!
//! assert_eq!(criteria.where_clause().len(), 2);
//! assert_eq!(
//!     criteria.where_clause()[0],
//!     Criterion::Compare {
//!         property: "department".into(),
//!         op: CompareOp::Eq,
//!         value: Value::of("R&D"),
//!     }
//! );
//! assert_eq!(criteria.limit(), Some(10));
//! ```

mod order_by;
mod scope;
mod where_scope;

use std::fmt;

use sqlscope_core::Value;

pub use order_by::OrderByScope;
pub use scope::CriteriaScope;
pub use where_scope::WhereScope;

use crate::error::CriteriaError;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

/// One node of a where clause.
///
/// Siblings are joined with AND, except that an [`Criterion::Or`] group is
/// OR-ed with everything before it.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `property op ?`
    Compare {
        /// Property reference.
        property: String,
        /// Operator.
        op: CompareOp,
        /// Right-hand side.
        value: Value,
    },
    /// `property IS [NOT] NULL`
    IsNull {
        /// Property reference.
        property: String,
        /// `IS NOT NULL` when set.
        negated: bool,
    },
    /// `property [NOT] LIKE ?`
    Like {
        /// Property reference.
        property: String,
        /// The pattern.
        pattern: Value,
        /// `NOT LIKE` when set.
        negated: bool,
    },
    /// `property [NOT] BETWEEN ? AND ?`
    Between {
        /// Property reference.
        property: String,
        /// Lower bound.
        low: Value,
        /// Upper bound.
        high: Value,
        /// `NOT BETWEEN` when set.
        negated: bool,
    },
    /// `property [NOT] IN (?, …)`
    InList {
        /// Property reference.
        property: String,
        /// Candidates.
        values: Vec<Value>,
        /// `NOT IN` when set.
        negated: bool,
    },
    /// A parenthesized AND group.
    And(Vec<Criterion>),
    /// A parenthesized group OR-ed with the preceding criteria.
    Or(Vec<Criterion>),
    /// A negated group.
    Not(Vec<Criterion>),
}

impl Criterion {
    /// Checks that the node and its children are well formed.
    fn validate(&self) -> Result<(), CriteriaError> {
        let (kind, children) = match self {
            Self::Compare { property, .. }
            | Self::IsNull { property, .. }
            | Self::Like { property, .. }
            | Self::Between { property, .. } => return check_property(property),
            Self::InList {
                property, values, ..
            } => {
                check_property(property)?;
                if values.is_empty() {
                    return Err(CriteriaError::EmptyInList(property.clone()));
                }
                return Ok(());
            }
            Self::And(children) => ("and", children),
            Self::Or(children) => ("or", children),
            Self::Not(children) => ("not", children),
        };
        if children.is_empty() {
            return Err(CriteriaError::EmptyGroup(kind));
        }
        children.iter().try_for_each(Self::validate)
    }
}

fn check_property(property: &str) -> Result<(), CriteriaError> {
    if property.is_empty() {
        Err(CriteriaError::EmptyProperty)
    } else {
        Ok(())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Placement of nulls in an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// `NULLS FIRST`
    First,
    /// `NULLS LAST`
    Last,
}

impl NullOrdering {
    /// Returns the SQL clause.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortItem {
    /// Property reference.
    pub property: String,
    /// Direction.
    pub direction: SortDirection,
    /// Explicit null placement, if any.
    pub nulls: Option<NullOrdering>,
}

/// An immutable snapshot of a query's predicate, ordering, limit and
/// offset. The default value constrains nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub(crate) where_clause: Vec<Criterion>,
    pub(crate) order_by: Vec<SortItem>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl Criteria {
    /// Declares criteria through a scope. Shorthand for
    /// [`CriteriaScope::build`].
    ///
    /// # Errors
    ///
    /// Returns a [`CriteriaError`] if the declared criteria are malformed.
    pub fn build(f: impl FnOnce(&mut CriteriaScope)) -> Result<Self, CriteriaError> {
        CriteriaScope::build(f)
    }

    /// Returns the top-level where criteria.
    #[must_use]
    pub fn where_clause(&self) -> &[Criterion] {
        &self.where_clause
    }

    /// Returns the ordering.
    #[must_use]
    pub fn order_by(&self) -> &[SortItem] {
        &self.order_by
    }

    /// Returns the row limit.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns the row offset.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns whether there is a where clause.
    #[must_use]
    pub fn has_where(&self) -> bool {
        !self.where_clause.is_empty()
    }
}
