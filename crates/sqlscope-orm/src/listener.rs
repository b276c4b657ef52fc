//! Entity lifecycle hooks.
//!
//! A listener sees an entity before and after each insert, update and
//! delete. Pre-hooks return the entity that is actually persisted;
//! post-hooks return the entity handed back to the caller. Any error
//! aborts the operation.

use chrono::{NaiveDateTime, Utc};
use sqlscope_core::{Datum, SqlType, Value};

use crate::entity::Entity;
use crate::error::BoxError;
use crate::metamodel::EntityMetamodel;

/// Result of a lifecycle hook.
pub type HookResult<E> = Result<E, BoxError>;

/// Hooks around entity mutations. Every hook defaults to the identity.
#[allow(unused_variables)]
pub trait EntityListener<E>: Send + Sync {
    /// Runs before the INSERT is compiled.
    fn pre_insert(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }

    /// Runs after the INSERT executed.
    fn post_insert(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }

    /// Runs before the UPDATE is compiled.
    fn pre_update(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }

    /// Runs after the UPDATE executed.
    fn post_update(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }

    /// Runs before the DELETE is compiled.
    fn pre_delete(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }

    /// Runs after the DELETE executed.
    fn post_delete(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        Ok(entity)
    }
}

/// A listener that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultListener;

impl<E> EntityListener<E> for DefaultListener {}

/// Runs several listeners in registration order.
pub struct ListenerChain<E> {
    listeners: Vec<Box<dyn EntityListener<E>>>,
}

impl<E> Default for ListenerChain<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E> ListenerChain<E> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener.
    #[must_use]
    pub fn with(mut self, listener: impl EntityListener<E> + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Appends a listener in place.
    pub fn push(&mut self, listener: impl EntityListener<E> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns the number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn fold(
        &self,
        entity: E,
        hook: impl Fn(&dyn EntityListener<E>, E) -> HookResult<E>,
    ) -> HookResult<E> {
        self.listeners
            .iter()
            .try_fold(entity, |entity, listener| hook(listener.as_ref(), entity))
    }
}

impl<E> EntityListener<E> for ListenerChain<E> {
    fn pre_insert(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.pre_insert(e, metamodel))
    }

    fn post_insert(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.post_insert(e, metamodel))
    }

    fn pre_update(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.pre_update(e, metamodel))
    }

    fn post_update(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.post_update(e, metamodel))
    }

    fn pre_delete(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.pre_delete(e, metamodel))
    }

    fn post_delete(&self, entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        self.fold(entity, |l, e| l.post_delete(e, metamodel))
    }
}

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> NaiveDateTime;
}

/// UTC wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime + Send + Sync,
{
    fn now(&self) -> NaiveDateTime {
        self()
    }
}

/// Stamps audit columns.
///
/// On insert, sets the created-at and updated-at columns and initializes
/// a null version to 0. On update, sets the updated-at column.
#[derive(Debug, Default, Clone)]
pub struct AuditListener<C = SystemClock> {
    clock: C,
}

impl AuditListener {
    /// Creates a listener stamping UTC wall-clock time.
    #[must_use]
    pub const fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> AuditListener<C> {
    /// Creates a listener reading time from `clock`.
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

impl<E: Entity, C: Clock> EntityListener<E> for AuditListener<C> {
    fn pre_insert(&self, mut entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        let now = self.clock.now();
        if let Some(column) = metamodel.created_at_column() {
            entity.assign(column.property_path(), Value::of(now))?;
        }
        if let Some(column) = metamodel.updated_at_column() {
            entity.assign(column.property_path(), Value::of(now))?;
        }
        if let Some(column) = metamodel.version_column() {
            let path = column.property_path();
            match entity.value_of(path) {
                None => entity.assign(path, Value::of(0_i64))?,
                Some(current) if current.is_null() => {
                    entity.assign(path, Value::new(Datum::Int(0), current.sql_type()))?;
                }
                Some(_) => {}
            }
        }
        Ok(entity)
    }

    fn pre_update(&self, mut entity: E, metamodel: &EntityMetamodel) -> HookResult<E> {
        if let Some(column) = metamodel.updated_at_column() {
            entity.assign(column.property_path(), Value::of(self.clock.now()))?;
        }
        Ok(entity)
    }
}

/// Returns the version value following `current`, keeping its binding
/// type. A null or non-integer version restarts at 1.
pub(crate) fn next_version(current: Option<&Value>) -> Value {
    match current {
        Some(value) => match value.datum().as_i64() {
            Some(n) => Value::new(Datum::Int(n.saturating_add(1)), value.sql_type()),
            None => Value::new(Datum::Int(1), value.sql_type()),
        },
        None => Value::new(Datum::Int(1), SqlType::BigInt),
    }
}
