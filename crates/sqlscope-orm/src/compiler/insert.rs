//! INSERT rendering.

use sqlscope_core::{StatementBuffer, Value};

use super::SqlCompiler;
use crate::context::InsertContext;
use crate::error::CompileError;

impl SqlCompiler {
    pub(super) fn insert(&self, context: &InsertContext) -> Result<StatementBuffer, CompileError> {
        let target = context.target.as_ref();
        if context.rows.is_empty() {
            return Err(CompileError::EmptyInsert {
                entity: target.entity_name().to_owned(),
            });
        }
        let columns: Vec<_> = target
            .columns()
            .iter()
            .filter(|c| !c.is_identity())
            .collect();

        let mut buf = StatementBuffer::new();
        let names: Vec<String> = columns.iter().map(|c| self.column_sql(c)).collect();
        buf.push_str("INSERT INTO ")
            .push_str(&self.table_sql(target))
            .push_str(" (")
            .push_str(&names.join(", "))
            .push_str(") VALUES ");

        for (i, row) in context.rows.iter().enumerate() {
            let mut resolved: Vec<(&str, &Value)> = Vec::with_capacity(row.len());
            for (property, value) in row {
                let column = Self::resolve(target, property)?;
                resolved.push((column.property_path(), value));
            }
            let mut values = Vec::with_capacity(columns.len());
            for column in &columns {
                let value = resolved
                    .iter()
                    .find(|(path, _)| *path == column.property_path())
                    .map(|(_, value)| (*value).clone())
                    .ok_or_else(|| CompileError::MissingValue {
                        entity: target.entity_name().to_owned(),
                        property: column.property_path().to_owned(),
                    })?;
                values.push(value);
            }
            if i > 0 {
                buf.push_str(", ");
            }
            buf.push_str("(").bind_all(values, ", ").push_str(")");
        }
        Ok(buf)
    }
}
