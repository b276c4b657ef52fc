//! Sessions: compile, log, and drive entity mutations.
//!
//! A [`Session`] ties the compiler to a logger and a metamodel registry.
//! Query methods return compiled statements; entity methods run lifecycle
//! hooks around an external [`Executor`].

use std::sync::Arc;

use sqlscope_core::{Datum, SqlType, Statement, StatementLogger, TracingLogger, Value};
use tracing::debug;

use crate::compiler::SqlCompiler;
use crate::config::QueryConfig;
use crate::context::{DeleteContext, InsertContext, QueryContext, SelectContext, UpdateContext};
use crate::criteria::{Criteria, CriteriaScope};
use crate::entity::Entity;
use crate::error::{BoxError, QueryError, Result};
use crate::listener::{EntityListener, next_version};
use crate::metamodel::{EntityMetamodel, MetamodelRegistry};
use crate::sequence::SequenceAllocator;

/// Runs statements against a database.
pub trait Executor {
    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying driver.
    fn execute(&mut self, statement: &Statement) -> std::result::Result<u64, BoxError>;

    /// Runs a sequence query and returns the value it produced.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying driver.
    fn next_sequence_value(&mut self, statement: &Statement) -> std::result::Result<i64, BoxError>;
}

/// Compiles and logs statements, and persists entities through an
/// [`Executor`].
pub struct Session {
    compiler: SqlCompiler,
    config: QueryConfig,
    logger: Arc<dyn StatementLogger>,
    registry: Arc<MetamodelRegistry>,
    sequences: SequenceAllocator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

impl Session {
    /// Creates a session logging through `tracing` and resolving
    /// metamodels from the process-wide registry.
    #[must_use]
    pub fn new(config: QueryConfig) -> Self {
        Self {
            compiler: SqlCompiler::from_config(&config),
            config,
            logger: Arc::new(TracingLogger),
            registry: MetamodelRegistry::global(),
            sequences: SequenceAllocator::default(),
        }
    }

    /// Replaces the statement logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn StatementLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the metamodel registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<MetamodelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Returns the compiler.
    #[must_use]
    pub const fn compiler(&self) -> &SqlCompiler {
        &self.compiler
    }

    /// Returns the metamodel of `E`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Metamodel`] if `E`'s descriptor is invalid.
    pub fn metamodel<E: Entity>(&self) -> Result<Arc<EntityMetamodel>> {
        Ok(self.registry.get::<E>()?)
    }

    /// Compiles a context and hands the statement to the logger.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Compile`] if the context cannot be rendered.
    pub fn compile(&self, context: impl Into<QueryContext>) -> Result<Statement> {
        let context = context.into();
        let statement = self.compiler.compile(&context)?;
        self.log(&statement);
        Ok(statement)
    }

    /// Compiles `SELECT … FROM E` with the declared criteria.
    ///
    /// # Errors
    ///
    /// Returns a metamodel, criteria or compile error.
    pub fn select<E: Entity>(&self, f: impl FnOnce(&mut CriteriaScope)) -> Result<Statement> {
        let criteria = Criteria::build(f)?;
        self.compile(SelectContext::new(self.metamodel::<E>()?, criteria))
    }

    /// Compiles `SELECT COUNT(*) FROM E` with the declared criteria.
    ///
    /// # Errors
    ///
    /// Returns a metamodel, criteria or compile error.
    pub fn count<E: Entity>(&self, f: impl FnOnce(&mut CriteriaScope)) -> Result<Statement> {
        let criteria = Criteria::build(f)?;
        self.compile(SelectContext::new(self.metamodel::<E>()?, criteria).count())
    }

    /// Compiles an UPDATE of every `E` row matching the criteria. `set`
    /// declares the assignments.
    ///
    /// # Errors
    ///
    /// Returns a metamodel, criteria or compile error. A missing where
    /// clause is an error unless the configuration allows it.
    pub fn update_where<E: Entity>(
        &self,
        set: impl FnOnce(UpdateContext) -> UpdateContext,
        f: impl FnOnce(&mut CriteriaScope),
    ) -> Result<Statement> {
        let criteria = Criteria::build(f)?;
        let mut context = set(UpdateContext::new(self.metamodel::<E>()?, criteria));
        if self.config.allow_missing_where {
            context = context.allow_missing_where();
        }
        self.compile(context)
    }

    /// Compiles a DELETE of every `E` row matching the criteria.
    ///
    /// # Errors
    ///
    /// Same as [`Session::update_where`].
    pub fn delete_where<E: Entity>(&self, f: impl FnOnce(&mut CriteriaScope)) -> Result<Statement> {
        let criteria = Criteria::build(f)?;
        let mut context = DeleteContext::new(self.metamodel::<E>()?, criteria);
        if self.config.allow_missing_where {
            context = context.allow_missing_where();
        }
        self.compile(context)
    }

    /// Inserts an entity.
    ///
    /// Runs `pre_insert`, assigns sequence-generated identifiers, executes
    /// the INSERT and runs `post_insert`. Returns the entity produced by
    /// the post-hook.
    ///
    /// # Errors
    ///
    /// A hook error aborts the operation before anything further runs. An
    /// executor error is returned as [`QueryError::Execution`].
    pub fn insert<E: Entity>(
        &self,
        entity: E,
        listener: &dyn EntityListener<E>,
        executor: &mut dyn Executor,
    ) -> Result<E> {
        let meta = self.metamodel::<E>()?;
        let mut entity = listener
            .pre_insert(entity, &meta)
            .map_err(QueryError::Hook)?;

        for column in meta.id_columns() {
            let Some(spec) = column.sequence() else {
                continue;
            };
            let id = self.sequences.next(spec, || -> Result<i64> {
                let statement = self.compiler.sequence_statement(spec)?;
                self.log(&statement);
                executor
                    .next_sequence_value(&statement)
                    .map_err(QueryError::Execution)
            })?;
            let ty = entity
                .value_of(column.property_path())
                .map_or(SqlType::BigInt, |v| v.sql_type());
            entity.assign(column.property_path(), Value::new(Datum::Int(id), ty))?;
        }

        let statement = self.compile(InsertContext::for_entity(Arc::clone(&meta), &entity)?)?;
        let rows = executor.execute(&statement).map_err(QueryError::Execution)?;
        debug!(entity = meta.entity_name(), table = meta.table().name(), rows, "inserted entity");

        listener.post_insert(entity, &meta).map_err(QueryError::Hook)
    }

    /// Updates an entity's row.
    ///
    /// For versioned entities the UPDATE matches the current version and
    /// advances it. The entity's version is advanced before the statement
    /// runs, so an entity that rejects the write fails without touching the
    /// row.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::OptimisticLock`] if a versioned UPDATE matched
    /// no row. Otherwise as [`Session::insert`].
    pub fn update<E: Entity>(
        &self,
        entity: E,
        listener: &dyn EntityListener<E>,
        executor: &mut dyn Executor,
    ) -> Result<E> {
        let meta = self.metamodel::<E>()?;
        let mut entity = listener
            .pre_update(entity, &meta)
            .map_err(QueryError::Hook)?;

        let statement = self.compile(UpdateContext::for_entity(Arc::clone(&meta), &entity)?)?;
        // a rejected version write must fail before the row changes
        if let Some(version) = meta.version_column() {
            let path = version.property_path();
            let next = next_version(entity.value_of(path).as_ref());
            entity.assign(path, next)?;
        }

        let rows = executor.execute(&statement).map_err(QueryError::Execution)?;
        debug!(entity = meta.entity_name(), table = meta.table().name(), rows, "updated entity");
        if meta.version_column().is_some() {
            check_lock(&meta, rows)?;
        }

        listener.post_update(entity, &meta).map_err(QueryError::Hook)
    }

    /// Deletes an entity's row.
    ///
    /// # Errors
    ///
    /// Same as [`Session::update`].
    pub fn delete<E: Entity>(
        &self,
        entity: E,
        listener: &dyn EntityListener<E>,
        executor: &mut dyn Executor,
    ) -> Result<E> {
        let meta = self.metamodel::<E>()?;
        let entity = listener
            .pre_delete(entity, &meta)
            .map_err(QueryError::Hook)?;

        let statement = self.compile(DeleteContext::for_entity(Arc::clone(&meta), &entity)?)?;
        let rows = executor.execute(&statement).map_err(QueryError::Execution)?;
        debug!(entity = meta.entity_name(), table = meta.table().name(), rows, "deleted entity");

        if meta.version_column().is_some() {
            check_lock(&meta, rows)?;
        }

        listener.post_delete(entity, &meta).map_err(QueryError::Hook)
    }

    fn log(&self, statement: &Statement) {
        if self.compiler.log_statements() {
            self.logger.log_statement(statement);
        }
    }
}

fn check_lock(meta: &EntityMetamodel, rows: u64) -> Result<()> {
    if rows == 0 {
        return Err(QueryError::OptimisticLock {
            entity: meta.entity_name().to_owned(),
        });
    }
    Ok(())
}
