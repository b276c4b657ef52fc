//! The where-clause scope.

use sqlscope_core::{ToValue, Value};

use super::{CompareOp, Criterion};

/// Collects where criteria. Handed out by
/// [`CriteriaScope::where_clause`](super::CriteriaScope::where_clause) and
/// by the group methods; never constructed directly.
#[derive(Debug, Default)]
pub struct WhereScope {
    criteria: Vec<Criterion>,
}

impl WhereScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_criteria(self) -> Vec<Criterion> {
        self.criteria
    }

    fn compare(&mut self, property: &str, op: CompareOp, value: Value) -> &mut Self {
        self.criteria.push(Criterion::Compare {
            property: property.to_owned(),
            op,
            value,
        });
        self
    }

    fn group(f: impl FnOnce(&mut Self)) -> Vec<Criterion> {
        let mut inner = Self::new();
        f(&mut inner);
        inner.criteria
    }

    /// `property = value`
    pub fn eq(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Eq, value.to_value())
    }

    /// `property <> value`
    pub fn ne(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Ne, value.to_value())
    }

    /// `property < value`
    pub fn lt(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Lt, value.to_value())
    }

    /// `property <= value`
    pub fn le(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Le, value.to_value())
    }

    /// `property > value`
    pub fn gt(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Gt, value.to_value())
    }

    /// `property >= value`
    pub fn ge(&mut self, property: &str, value: impl ToValue) -> &mut Self {
        self.compare(property, CompareOp::Ge, value.to_value())
    }

    /// `property IS NULL`
    pub fn is_null(&mut self, property: &str) -> &mut Self {
        self.criteria.push(Criterion::IsNull {
            property: property.to_owned(),
            negated: false,
        });
        self
    }

    /// `property IS NOT NULL`
    pub fn is_not_null(&mut self, property: &str) -> &mut Self {
        self.criteria.push(Criterion::IsNull {
            property: property.to_owned(),
            negated: true,
        });
        self
    }

    /// `property LIKE pattern`
    pub fn like(&mut self, property: &str, pattern: impl ToValue) -> &mut Self {
        self.criteria.push(Criterion::Like {
            property: property.to_owned(),
            pattern: pattern.to_value(),
            negated: false,
        });
        self
    }

    /// `property NOT LIKE pattern`
    pub fn not_like(&mut self, property: &str, pattern: impl ToValue) -> &mut Self {
        self.criteria.push(Criterion::Like {
            property: property.to_owned(),
            pattern: pattern.to_value(),
            negated: true,
        });
        self
    }

    /// `property BETWEEN low AND high`
    pub fn between(&mut self, property: &str, low: impl ToValue, high: impl ToValue) -> &mut Self {
        self.criteria.push(Criterion::Between {
            property: property.to_owned(),
            low: low.to_value(),
            high: high.to_value(),
            negated: false,
        });
        self
    }

    /// `property NOT BETWEEN low AND high`
    pub fn not_between(
        &mut self,
        property: &str,
        low: impl ToValue,
        high: impl ToValue,
    ) -> &mut Self {
        self.criteria.push(Criterion::Between {
            property: property.to_owned(),
            low: low.to_value(),
            high: high.to_value(),
            negated: true,
        });
        self
    }

    /// `property IN (values…)`. An empty list fails at materialization.
    pub fn in_list<V: ToValue>(
        &mut self,
        property: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.criteria.push(Criterion::InList {
            property: property.to_owned(),
            values: values.into_iter().map(|v| v.to_value()).collect(),
            negated: false,
        });
        self
    }

    /// `property NOT IN (values…)`
    pub fn not_in_list<V: ToValue>(
        &mut self,
        property: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.criteria.push(Criterion::InList {
            property: property.to_owned(),
            values: values.into_iter().map(|v| v.to_value()).collect(),
            negated: true,
        });
        self
    }

    /// A parenthesized group AND-ed with its siblings.
    pub fn and(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        let group = Self::group(f);
        self.criteria.push(Criterion::And(group));
        self
    }

    /// A parenthesized group OR-ed with everything declared before it.
    pub fn or(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        let group = Self::group(f);
        self.criteria.push(Criterion::Or(group));
        self
    }

    /// A negated group.
    pub fn not(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        let group = Self::group(f);
        self.criteria.push(Criterion::Not(group));
        self
    }
}
