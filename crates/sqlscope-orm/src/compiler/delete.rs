//! DELETE rendering.

use sqlscope_core::StatementBuffer;

use super::SqlCompiler;
use crate::context::DeleteContext;
use crate::error::CompileError;

impl SqlCompiler {
    pub(super) fn delete(&self, context: &DeleteContext) -> Result<StatementBuffer, CompileError> {
        let target = context.target.as_ref();
        Self::require_where(
            target,
            &context.criteria,
            context.allow_missing_where,
            "DELETE",
        )?;
        let mut buf = StatementBuffer::new();
        buf.push_str("DELETE FROM ").push_str(&self.table_sql(target));
        self.write_where(&mut buf, target, &context.criteria)?;
        self.write_mutation_paging(&mut buf, target, &context.criteria, "DELETE")?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlscope_core::{GenericDialect, MySqlDialect, Value};

    use super::*;
    use crate::criteria::Criteria;
    use crate::metamodel::{EntityDescriptor, EntityMetamodel, PropertyDescriptor, TableMarker};

    fn meta() -> Arc<EntityMetamodel> {
        Arc::new(
            EntityMetamodel::from_descriptor(
                &EntityDescriptor::new("Order")
                    .table(TableMarker::new("order").quoted())
                    .property(PropertyDescriptor::new("id").id())
                    .property(PropertyDescriptor::new("status")),
            )
            .unwrap(),
        )
    }

    fn void_orders(limit: i64) -> Criteria {
        Criteria::build(|c| {
            c.where_clause(|w| {
                w.eq("status", "void");
            })
            .order_by(|o| {
                o.asc("id");
            })
            .limit(|| limit);
        })
        .unwrap()
    }

    #[test]
    fn test_delete_quotes_table_and_binds_predicate() {
        let criteria = Criteria::build(|c| {
            c.where_clause(|w| {
                w.eq("status", "void");
            });
        })
        .unwrap();
        let buf = SqlCompiler::new(Box::new(MySqlDialect), false)
            .delete(&DeleteContext::new(meta(), criteria))
            .unwrap();
        assert_eq!(buf.text(), "DELETE FROM `order` WHERE status = ?");
        assert_eq!(buf.values(), &[Value::of("void")]);
    }

    #[test]
    fn test_delete_keeps_order_and_limit_where_supported() {
        let buf = SqlCompiler::new(Box::new(MySqlDialect), false)
            .delete(&DeleteContext::new(meta(), void_orders(1)))
            .unwrap();
        assert_eq!(
            buf.text(),
            "DELETE FROM `order` WHERE status = ? ORDER BY id ASC LIMIT ?"
        );
        assert_eq!(buf.values(), &[Value::of("void"), Value::of(1_i64)]);
    }

    #[test]
    fn test_delete_rejects_paging_it_cannot_express() {
        let generic = SqlCompiler::new(Box::new(GenericDialect), false);
        assert_eq!(
            generic
                .delete(&DeleteContext::new(meta(), void_orders(1)))
                .unwrap_err(),
            CompileError::UnsupportedPaging {
                operation: "DELETE",
                dialect: "generic",
                clause: "LIMIT",
            }
        );

        let paged = Criteria::build(|c| {
            c.where_clause(|w| {
                w.eq("status", "void");
            })
            .limit(|| 10)
            .offset(|| 5);
        })
        .unwrap();
        let mysql = SqlCompiler::new(Box::new(MySqlDialect), false);
        assert_eq!(
            mysql.delete(&DeleteContext::new(meta(), paged)).unwrap_err(),
            CompileError::UnsupportedPaging {
                operation: "DELETE",
                dialect: "mysql",
                clause: "OFFSET",
            }
        );
    }

    #[test]
    fn test_delete_without_where() {
        let compiler = SqlCompiler::new(Box::new(MySqlDialect), false);
        let context = DeleteContext::new(meta(), Criteria::default());
        assert_eq!(
            compiler.delete(&context).unwrap_err(),
            CompileError::MissingWhereClause {
                entity: "Order".into(),
                operation: "DELETE",
            }
        );
        assert_eq!(
            compiler
                .delete(&context.allow_missing_where())
                .unwrap()
                .text(),
            "DELETE FROM `order`"
        );
    }
}
