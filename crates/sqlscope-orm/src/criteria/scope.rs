//! The top-level criteria scope.

use super::{Criteria, Criterion, OrderByScope, SortItem, WhereScope, check_property};
use crate::error::CriteriaError;

/// Accumulates where, order-by, limit and offset declarations.
///
/// A scope only exists for the duration of [`CriteriaScope::build`]; its
/// state cannot leak into another query.
#[derive(Debug)]
pub struct CriteriaScope {
    where_clause: Vec<Criterion>,
    order_by: Vec<SortItem>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl CriteriaScope {
    const fn new() -> Self {
        Self {
            where_clause: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Runs `f` against a fresh scope and materializes the result.
    ///
    /// # Errors
    ///
    /// See [`CriteriaScope::materialize`].
    pub fn build(f: impl FnOnce(&mut Self)) -> Result<Criteria, CriteriaError> {
        let mut scope = Self::new();
        f(&mut scope);
        scope.materialize()
    }

    /// Adds where criteria. Repeated calls accumulate; fragments are
    /// joined as if declared in one block.
    pub fn where_clause(&mut self, f: impl FnOnce(&mut WhereScope)) -> &mut Self {
        let mut scope = WhereScope::new();
        f(&mut scope);
        self.where_clause.extend(scope.into_criteria());
        self
    }

    /// Adds ordering. Repeated calls accumulate.
    pub fn order_by(&mut self, f: impl FnOnce(&mut OrderByScope)) -> &mut Self {
        let mut scope = OrderByScope::new();
        f(&mut scope);
        self.order_by.extend(scope.into_items());
        self
    }

    /// Sets the row limit. The last call wins.
    pub fn limit(&mut self, f: impl FnOnce() -> i64) -> &mut Self {
        self.limit = Some(f());
        self
    }

    /// Sets the row offset. The last call wins.
    pub fn offset(&mut self, f: impl FnOnce() -> i64) -> &mut Self {
        self.offset = Some(f());
        self
    }

    /// Snapshots the scope into immutable criteria. Calling it twice yields
    /// equal results.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError`] for a negative limit or offset, an empty
    /// group, an empty IN list or an empty property name.
    pub fn materialize(&self) -> Result<Criteria, CriteriaError> {
        let limit = self
            .limit
            .map(|n| u64::try_from(n).map_err(|_| CriteriaError::NegativeLimit(n)))
            .transpose()?;
        let offset = self
            .offset
            .map(|n| u64::try_from(n).map_err(|_| CriteriaError::NegativeOffset(n)))
            .transpose()?;
        self.where_clause
            .iter()
            .try_for_each(Criterion::validate)?;
        self.order_by
            .iter()
            .try_for_each(|item| check_property(&item.property))?;

        Ok(Criteria {
            where_clause: self.where_clause.clone(),
            order_by: self.order_by.clone(),
            limit,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{NullOrdering, SortDirection};

    #[test]
    fn test_fragments_accumulate() {
        let criteria = CriteriaScope::build(|c| {
            c.where_clause(|w| {
                w.eq("a", 1_i32);
            });
            c.where_clause(|w| {
                w.eq("b", 2_i32);
            });
            c.order_by(|o| {
                o.asc("a");
            })
            .order_by(|o| {
                o.desc_nulls_last("b");
            });
        })
        .unwrap();
        assert_eq!(criteria.where_clause().len(), 2);
        assert_eq!(
            criteria.order_by()[1],
            SortItem {
                property: "b".into(),
                direction: SortDirection::Desc,
                nulls: Some(NullOrdering::Last),
            }
        );
    }

    #[test]
    fn test_limit_and_offset_last_write_wins() {
        let criteria = CriteriaScope::build(|c| {
            c.limit(|| 5).limit(|| 10).offset(|| 3);
        })
        .unwrap();
        assert_eq!(criteria.limit(), Some(10));
        assert_eq!(criteria.offset(), Some(3));
    }

    #[test]
    fn test_negative_offset_fails() {
        let err = CriteriaScope::build(|c| {
            c.offset(|| -1);
        })
        .unwrap_err();
        assert_eq!(err, CriteriaError::NegativeOffset(-1));

        let err = CriteriaScope::build(|c| {
            c.limit(|| -3);
        })
        .unwrap_err();
        assert_eq!(err, CriteriaError::NegativeLimit(-3));
    }

    #[test]
    fn test_malformed_where_fails() {
        let empty_or = CriteriaScope::build(|c| {
            c.where_clause(|w| {
                w.eq("a", 1_i32).or(|_| {});
            });
        });
        assert_eq!(empty_or.unwrap_err(), CriteriaError::EmptyGroup("or"));

        let nested = CriteriaScope::build(|c| {
            c.where_clause(|w| {
                w.and(|w| {
                    w.not(|_| {});
                });
            });
        });
        assert_eq!(nested.unwrap_err(), CriteriaError::EmptyGroup("not"));

        let empty_in = CriteriaScope::build(|c| {
            c.where_clause(|w| {
                w.in_list("id", Vec::<i64>::new());
            });
        });
        assert_eq!(
            empty_in.unwrap_err(),
            CriteriaError::EmptyInList("id".into())
        );

        let blank = CriteriaScope::build(|c| {
            c.order_by(|o| {
                o.asc("");
            });
        });
        assert_eq!(blank.unwrap_err(), CriteriaError::EmptyProperty);
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let mut scope = CriteriaScope::new();
        scope
            .where_clause(|w| {
                w.between("age", 18_i32, 65_i32);
            })
            .limit(|| 1);
        assert_eq!(scope.materialize().unwrap(), scope.materialize().unwrap());
    }

    #[test]
    fn test_empty_scope_is_default_criteria() {
        assert_eq!(CriteriaScope::build(|_| {}).unwrap(), Criteria::default());
    }
}
