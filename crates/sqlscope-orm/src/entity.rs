//! The `Entity` trait.
//!
//! An entity type declares its metadata once, through
//! [`Entity::descriptor`], and exposes its state to the query layer by
//! property path. Nothing else is required: there is no reflection, and
//! rows are never materialized back into entities here.

use std::sync::Arc;

use sqlscope_core::Value;

use crate::error::{AssignError, MetamodelError};
use crate::metamodel::{EntityDescriptor, EntityMetamodel, MetamodelRegistry};

/// A record type mapped to a table.
///
/// # Example
///
/// ```rust
/// use sqlscope_orm::metamodel::{EntityDescriptor, PropertyDescriptor};
/// use sqlscope_orm::{AssignError, Entity, Value};
///
/// struct Department {
///     id: i64,
///     name: String,
/// }
///
/// impl Entity for Department {
///     fn descriptor() -> EntityDescriptor {
///         EntityDescriptor::new("Department")
///             .property(PropertyDescriptor::new("id").id())
///             .property(PropertyDescriptor::new("name"))
///     }
///
///     fn value_of(&self, property_path: &str) -> Option<Value> {
///         match property_path {
///             "id" => Some(Value::of(self.id)),
///             "name" => Some(Value::of(self.name.as_str())),
///             _ => None,
///         }
///     }
/// }
///
/// let metamodel = Department::metamodel().unwrap();
/// assert_eq!(metamodel.id_columns().len(), 1);
/// ```
pub trait Entity: Sized + 'static {
    /// Declares the entity's table, properties and markers.
    fn descriptor() -> EntityDescriptor;

    /// Reads a property by its dotted path. Returns `None` for unknown
    /// paths.
    fn value_of(&self, property_path: &str) -> Option<Value>;

    /// Writes a generated or stamped value back into the entity.
    ///
    /// # Errors
    ///
    /// The default rejects every property with
    /// [`AssignError::Unsupported`]; entities that use sequences, audit
    /// stamping or versioning override it.
    fn assign(&mut self, property_path: &str, _value: Value) -> Result<(), AssignError> {
        Err(AssignError::Unsupported {
            property: property_path.to_owned(),
        })
    }

    /// Returns the entity's metamodel from the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns the [`MetamodelError`] raised by the descriptor.
    fn metamodel() -> Result<Arc<EntityMetamodel>, MetamodelError> {
        MetamodelRegistry::global().get::<Self>()
    }
}
