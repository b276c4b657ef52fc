//! UPDATE rendering.

use sqlscope_core::{StatementBuffer, Value};

use super::SqlCompiler;
use crate::context::{AssignmentValue, UpdateContext};
use crate::error::CompileError;

impl SqlCompiler {
    pub(super) fn update(&self, context: &UpdateContext) -> Result<StatementBuffer, CompileError> {
        let target = context.target.as_ref();
        if context.assignments.is_empty() {
            return Err(CompileError::EmptyAssignment {
                entity: target.entity_name().to_owned(),
            });
        }
        Self::require_where(
            target,
            &context.criteria,
            context.allow_missing_where,
            "UPDATE",
        )?;

        let mut buf = StatementBuffer::new();
        buf.push_str("UPDATE ")
            .push_str(&self.table_sql(target))
            .push_str(" SET ");
        for (i, assignment) in context.assignments.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            let column = self.property_sql(target, &assignment.property)?;
            buf.push_str(&column).push_str(" = ");
            match &assignment.value {
                AssignmentValue::Bind(value) => {
                    buf.bind(value.clone());
                }
                AssignmentValue::Increment(by) => {
                    buf.push_str(&column).push_str(" + ").bind(Value::of(*by));
                }
            }
        }
        self.write_where(&mut buf, target, &context.criteria)?;
        self.write_mutation_paging(&mut buf, target, &context.criteria, "UPDATE")?;
        Ok(buf)
    }
}
