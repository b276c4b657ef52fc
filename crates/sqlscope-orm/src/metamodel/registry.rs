//! Per-type metamodel memoization.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use super::EntityMetamodel;
use crate::entity::Entity;
use crate::error::MetamodelError;

/// Caches one [`EntityMetamodel`] per entity type.
///
/// Metamodels are built outside the lock. When two threads race on the
/// same type, the first insertion wins and both get the same `Arc`.
#[derive(Debug, Default)]
pub struct MetamodelRegistry {
    entries: RwLock<HashMap<TypeId, Arc<EntityMetamodel>>>,
}

impl MetamodelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<MetamodelRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Returns the metamodel of `E`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the [`MetamodelError`] raised by `E`'s descriptor. Failed
    /// builds are not cached.
    pub fn get<E: Entity>(&self) -> Result<Arc<EntityMetamodel>, MetamodelError> {
        let key = TypeId::of::<E>();
        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(found));
        }

        let built = Arc::new(EntityMetamodel::from_descriptor(&E::descriptor())?);
        debug!(
            entity = built.entity_name(),
            table = built.table().name(),
            columns = built.columns().len(),
            "built entity metamodel"
        );

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(key).or_insert(built)))
    }

    /// Returns the number of cached metamodels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
