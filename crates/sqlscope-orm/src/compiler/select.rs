//! SELECT rendering.

use sqlscope_core::StatementBuffer;

use super::SqlCompiler;
use crate::context::{Projection, SelectContext};
use crate::error::CompileError;
use crate::metamodel::EntityMetamodel;

impl SqlCompiler {
    pub(super) fn select(&self, context: &SelectContext) -> Result<StatementBuffer, CompileError> {
        let target = context.target.as_ref();
        let criteria = &context.criteria;
        let mut buf = StatementBuffer::new();

        if context.projection == Projection::Count {
            buf.push_str("SELECT COUNT(*) FROM ");
            if context.distinct {
                // counts distinct rows, not the single count row
                buf.push_str("(SELECT DISTINCT ")
                    .push_str(&self.column_list(target))
                    .push_str(" FROM ")
                    .push_str(&self.table_sql(target));
                self.write_where(&mut buf, target, criteria)?;
                buf.push_str(") AS distinct_rows");
            } else {
                buf.push_str(&self.table_sql(target));
                self.write_where(&mut buf, target, criteria)?;
            }
            return Ok(buf);
        }

        buf.push_str("SELECT ");
        if context.distinct {
            buf.push_str("DISTINCT ");
        }
        buf.push_str(&self.column_list(target))
            .push_str(" FROM ")
            .push_str(&self.table_sql(target));
        self.write_where(&mut buf, target, criteria)?;
        self.write_order_by(&mut buf, target, criteria)?;
        self.dialect
            .write_offset_limit(&mut buf, criteria.offset(), criteria.limit());
        Ok(buf)
    }

    fn column_list(&self, target: &EntityMetamodel) -> String {
        let columns: Vec<String> = target
            .columns()
            .iter()
            .map(|c| self.column_sql(c))
            .collect();
        columns.join(", ")
    }
}
