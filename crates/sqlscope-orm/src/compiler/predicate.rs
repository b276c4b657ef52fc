//! WHERE predicate rendering.

use sqlscope_core::StatementBuffer;

use super::SqlCompiler;
use crate::criteria::Criterion;
use crate::error::CompileError;
use crate::metamodel::EntityMetamodel;

/// A rendered predicate, remembering whether its top level ends in an OR
/// so a following AND can parenthesize it.
struct Fragment {
    buf: StatementBuffer,
    disjunction: bool,
}

impl SqlCompiler {
    /// Renders a list of sibling criteria.
    ///
    /// Siblings are joined with AND. An `Or` group is joined with OR to
    /// everything before it; anything AND-ed after such a disjunction wraps
    /// the disjunction in parentheses first, so `a OR (b) AND c` renders as
    /// `(a OR (b)) AND c`.
    pub(super) fn predicate(
        &self,
        target: &EntityMetamodel,
        criteria: &[Criterion],
    ) -> Result<StatementBuffer, CompileError> {
        let mut acc: Option<Fragment> = None;
        for criterion in criteria {
            acc = Some(match (acc, criterion) {
                (None, Criterion::Or(group)) => Fragment {
                    buf: self.predicate(target, group)?.paren(),
                    disjunction: false,
                },
                (None, node) => Fragment {
                    buf: self.node(target, node)?,
                    disjunction: false,
                },
                (Some(left), Criterion::Or(group)) => {
                    let mut buf = left.buf;
                    buf.push_str(" OR ")
                        .append(self.predicate(target, group)?.paren());
                    Fragment {
                        buf,
                        disjunction: true,
                    }
                }
                (Some(left), node) => {
                    let mut buf = if left.disjunction {
                        left.buf.paren()
                    } else {
                        left.buf
                    };
                    buf.push_str(" AND ").append(self.node(target, node)?);
                    Fragment {
                        buf,
                        disjunction: false,
                    }
                }
            });
        }
        Ok(acc.map(|f| f.buf).unwrap_or_default())
    }

    /// Renders one non-`Or` criterion.
    fn node(
        &self,
        target: &EntityMetamodel,
        criterion: &Criterion,
    ) -> Result<StatementBuffer, CompileError> {
        let mut buf = StatementBuffer::new();
        match criterion {
            Criterion::Compare {
                property,
                op,
                value,
            } => {
                buf.push_str(&self.property_sql(target, property)?)
                    .push_str(&format!(" {op} "))
                    .bind(value.clone());
            }
            Criterion::IsNull { property, negated } => {
                buf.push_str(&self.property_sql(target, property)?)
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Criterion::Like {
                property,
                pattern,
                negated,
            } => {
                buf.push_str(&self.property_sql(target, property)?)
                    .push_str(if *negated { " NOT LIKE " } else { " LIKE " })
                    .bind(pattern.clone());
            }
            Criterion::Between {
                property,
                low,
                high,
                negated,
            } => {
                buf.push_str(&self.property_sql(target, property)?)
                    .push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " })
                    .bind(low.clone())
                    .push_str(" AND ")
                    .bind(high.clone());
            }
            Criterion::InList {
                property,
                values,
                negated,
            } => {
                buf.push_str(&self.property_sql(target, property)?)
                    .push_str(if *negated { " NOT IN (" } else { " IN (" })
                    .bind_all(values.iter().cloned(), ", ")
                    .push_str(")");
            }
            Criterion::And(group) => {
                buf = self.predicate(target, group)?.paren();
            }
            Criterion::Not(group) => {
                buf.push_str("NOT ")
                    .append(self.predicate(target, group)?.paren());
            }
            // A nested `Or` outside a sibling list still renders as a group.
            Criterion::Or(group) => {
                buf = self.predicate(target, group)?.paren();
            }
        }
        Ok(buf)
    }
}
