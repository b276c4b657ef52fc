//! Statement compilation.
//!
//! [`SqlCompiler`] renders a [`QueryContext`] into a [`Statement`]. Every
//! value ends up as a bound `?`; nothing user-supplied is inlined into the
//! SQL text.

mod delete;
mod insert;
mod predicate;
mod select;
mod update;

use sqlscope_core::dialect::count_value;
use sqlscope_core::{Dialect, Statement, StatementBuffer};

use crate::config::QueryConfig;
use crate::context::QueryContext;
use crate::criteria::Criteria;
use crate::error::CompileError;
use crate::metamodel::{ColumnMeta, EntityMetamodel, SequenceGeneratorSpec};

/// Renders query contexts for one dialect.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use sqlscope_orm::context::SelectContext;
/// use sqlscope_orm::criteria::Criteria;
/// use sqlscope_orm::metamodel::{EntityDescriptor, EntityMetamodel, PropertyDescriptor};
/// use sqlscope_orm::{GenericDialect, SqlCompiler};
///
/// let meta = Arc::new(
///     EntityMetamodel::from_descriptor(
///         &EntityDescriptor::new("Dept")
///             .property(PropertyDescriptor::new("id").id())
///             .property(PropertyDescriptor::new("name")),
///     )
///     .unwrap(),
/// );
/// let criteria = Criteria::build(|c| {
///     c.where_clause(|w| {
///         w.like("name", "R%");
///     });
/// })
/// .unwrap();
///
/// let compiler = SqlCompiler::new(Box::new(GenericDialect), false);
/// let statement = compiler
///     .compile(&SelectContext::new(meta, criteria).into())
///     .unwrap();
/// assert_eq!(statement.text(), "SELECT id, name FROM Dept WHERE name LIKE ?");
/// ```
#[derive(Debug)]
pub struct SqlCompiler {
    dialect: Box<dyn Dialect>,
    log_statements: bool,
}

impl SqlCompiler {
    /// Creates a compiler. `log_statements` controls whether compiled
    /// statements carry an interpolated log rendering.
    #[must_use]
    pub fn new(dialect: Box<dyn Dialect>, log_statements: bool) -> Self {
        Self {
            dialect,
            log_statements,
        }
    }

    /// Creates a compiler for the configured dialect.
    #[must_use]
    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.dialect.dialect(), config.log_statements)
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Returns whether statements carry a log rendering.
    #[must_use]
    pub const fn log_statements(&self) -> bool {
        self.log_statements
    }

    /// Renders a context.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a property is unknown, the context is
    /// incomplete, or a mapped name smuggles a `?` into the text.
    pub fn compile(&self, context: &QueryContext) -> Result<Statement, CompileError> {
        let buf = match context {
            QueryContext::Select(c) => self.select(c)?,
            QueryContext::Insert(c) => self.insert(c)?,
            QueryContext::Update(c) => self.update(c)?,
            QueryContext::Delete(c) => self.delete(c)?,
        };
        Ok(buf.build(self.log_statements)?)
    }

    /// Renders the query fetching the next value of a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnsupportedSequence`] if the dialect has no
    /// sequences.
    pub fn sequence_statement(
        &self,
        spec: &SequenceGeneratorSpec,
    ) -> Result<Statement, CompileError> {
        let name = self.dialect.enquote(&spec.name, spec.quoted);
        let sql = self
            .dialect
            .sequence_sql(&name)
            .ok_or_else(|| CompileError::UnsupportedSequence {
                dialect: self.dialect.name(),
                sequence: spec.name.clone(),
            })?;
        let mut buf = StatementBuffer::new();
        buf.push_str(&sql);
        Ok(buf.build(self.log_statements)?)
    }

    /// `schema.table`, each part quoted when the table is.
    fn table_sql(&self, target: &EntityMetamodel) -> String {
        let table = target.table();
        let name = self.dialect.enquote(table.name(), table.is_quoted());
        match table.schema() {
            Some(schema) => format!(
                "{}.{name}",
                self.dialect.enquote(schema, table.is_quoted())
            ),
            None => name,
        }
    }

    fn column_sql(&self, column: &ColumnMeta) -> String {
        self.dialect
            .enquote(column.column_name(), column.is_quoted())
    }

    fn resolve<'a>(
        target: &'a EntityMetamodel,
        property: &str,
    ) -> Result<&'a ColumnMeta, CompileError> {
        target
            .column(property)
            .ok_or_else(|| CompileError::UnknownProperty {
                entity: target.entity_name().to_owned(),
                property: property.to_owned(),
            })
    }

    fn property_sql(&self, target: &EntityMetamodel, property: &str) -> Result<String, CompileError> {
        Self::resolve(target, property).map(|c| self.column_sql(c))
    }

    /// Appends ` WHERE …` when the criteria have a predicate.
    fn write_where(
        &self,
        buf: &mut StatementBuffer,
        target: &EntityMetamodel,
        criteria: &Criteria,
    ) -> Result<(), CompileError> {
        if criteria.has_where() {
            let predicate = self.predicate(target, criteria.where_clause())?;
            buf.push_str(" WHERE ").append(predicate);
        }
        Ok(())
    }

    /// Appends ` ORDER BY …` when the criteria sort.
    fn write_order_by(
        &self,
        buf: &mut StatementBuffer,
        target: &EntityMetamodel,
        criteria: &Criteria,
    ) -> Result<(), CompileError> {
        if criteria.order_by().is_empty() {
            return Ok(());
        }
        let mut items = Vec::with_capacity(criteria.order_by().len());
        for item in criteria.order_by() {
            let mut sql = format!(
                "{} {}",
                self.property_sql(target, &item.property)?,
                item.direction.as_sql()
            );
            if let Some(nulls) = item.nulls {
                if !self.dialect.supports_nulls_ordering() {
                    return Err(CompileError::UnsupportedNullOrdering {
                        dialect: self.dialect.name(),
                    });
                }
                sql.push(' ');
                sql.push_str(nulls.as_sql());
            }
            items.push(sql);
        }
        buf.push_str(" ORDER BY ").push_str(&items.join(", "));
        Ok(())
    }

    /// Appends `ORDER BY … LIMIT ?` to an UPDATE or DELETE. Fails when the
    /// dialect cannot restrict the statement that way, so the declared
    /// restriction is never dropped.
    fn write_mutation_paging(
        &self,
        buf: &mut StatementBuffer,
        target: &EntityMetamodel,
        criteria: &Criteria,
        operation: &'static str,
    ) -> Result<(), CompileError> {
        let unsupported = |clause: &'static str| CompileError::UnsupportedPaging {
            operation,
            dialect: self.dialect.name(),
            clause,
        };
        if criteria.offset().is_some() {
            return Err(unsupported("OFFSET"));
        }
        let limit = criteria.limit();
        if limit.is_none() && criteria.order_by().is_empty() {
            return Ok(());
        }
        if !self.dialect.supports_mutation_limit() {
            return Err(unsupported(if limit.is_some() { "LIMIT" } else { "ORDER BY" }));
        }
        self.write_order_by(buf, target, criteria)?;
        if let Some(n) = limit {
            buf.push_str(" LIMIT ").bind(count_value(n));
        }
        Ok(())
    }

    /// Fails unless the criteria restrict the rows or the caller opted out.
    fn require_where(
        target: &EntityMetamodel,
        criteria: &Criteria,
        allowed: bool,
        operation: &'static str,
    ) -> Result<(), CompileError> {
        if criteria.has_where() || allowed {
            Ok(())
        } else {
            Err(CompileError::MissingWhereClause {
                entity: target.entity_name().to_owned(),
                operation,
            })
        }
    }
}
