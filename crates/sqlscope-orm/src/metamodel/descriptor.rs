//! Declarative entity descriptors.
//!
//! A descriptor is the raw, unvalidated declaration of an entity: its
//! table marker, its properties with their markers, and its embedded
//! sub-entities. [`EntityMetamodel::from_descriptor`] turns it into a
//! validated metamodel.
//!
//! [`EntityMetamodel::from_descriptor`]: super::EntityMetamodel::from_descriptor

/// Table naming and quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMarker {
    pub(crate) name: String,
    pub(crate) schema: Option<String>,
    pub(crate) quoted: bool,
}

impl TableMarker {
    /// Maps the entity to `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            quoted: false,
        }
    }

    /// Qualifies the table with a schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Renders the table name in dialect quotes.
    #[must_use]
    pub const fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }
}

/// A database sequence feeding an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceGeneratorSpec {
    /// Sequence name.
    pub name: String,
    /// How far the sequence advances per fetch. Values in between are
    /// handed out without another round trip.
    pub increment_by: i64,
    /// Renders the sequence name in dialect quotes.
    pub quoted: bool,
}

impl SequenceGeneratorSpec {
    /// Creates a sequence spec with an increment of 1.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            increment_by: 1,
            quoted: false,
        }
    }

    /// Sets the increment.
    #[must_use]
    pub const fn increment_by(mut self, increment_by: i64) -> Self {
        self.increment_by = increment_by;
        self
    }

    /// Renders the sequence name in dialect quotes.
    #[must_use]
    pub const fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }
}

/// A declarative marker on a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Part of the identifier.
    Id,
    /// Optimistic-lock version counter.
    Version,
    /// Stamped when the row is inserted.
    CreatedAt,
    /// Stamped when the row is inserted or updated.
    UpdatedAt,
    /// Column rename and quoting.
    Column {
        /// Overrides the property name.
        name: Option<String>,
        /// Renders the column name in dialect quotes.
        quoted: bool,
    },
    /// Value assigned by the database on insert.
    Identity,
    /// Value fetched from a sequence before insert.
    Sequence(SequenceGeneratorSpec),
}

/// A property and its markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) markers: Vec<Marker>,
}

impl PropertyDescriptor {
    /// Declares a property mapped to a column of the same name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            markers: Vec::new(),
        }
    }

    /// Adds a marker.
    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Marks the property as (part of) the identifier.
    #[must_use]
    pub fn id(self) -> Self {
        self.marker(Marker::Id)
    }

    /// Marks the property as the version counter.
    #[must_use]
    pub fn version(self) -> Self {
        self.marker(Marker::Version)
    }

    /// Marks the property as the creation timestamp.
    #[must_use]
    pub fn created_at(self) -> Self {
        self.marker(Marker::CreatedAt)
    }

    /// Marks the property as the modification timestamp.
    #[must_use]
    pub fn updated_at(self) -> Self {
        self.marker(Marker::UpdatedAt)
    }

    /// Maps the property to a differently named column.
    #[must_use]
    pub fn column(self, name: impl Into<String>) -> Self {
        self.marker(Marker::Column {
            name: Some(name.into()),
            quoted: false,
        })
    }

    /// Renders the column name in dialect quotes.
    #[must_use]
    pub fn quoted(self) -> Self {
        self.marker(Marker::Column {
            name: None,
            quoted: true,
        })
    }

    /// Declares a database-assigned identity value.
    #[must_use]
    pub fn identity(self) -> Self {
        self.marker(Marker::Identity)
    }

    /// Declares a sequence-generated value.
    #[must_use]
    pub fn sequence(self, spec: SequenceGeneratorSpec) -> Self {
        self.marker(Marker::Sequence(spec))
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One declared member of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Member {
    Property(PropertyDescriptor),
    Embedded {
        name: String,
        descriptor: EntityDescriptor,
    },
}

/// The declaration of an entity type.
///
/// # Example
///
/// ```rust
/// use sqlscope_orm::metamodel::{
///     EntityDescriptor, EntityMetamodel, PropertyDescriptor, SequenceGeneratorSpec, TableMarker,
/// };
///
/// let address = EntityDescriptor::new("Address")
///     .property(PropertyDescriptor::new("street"))
///     .property(PropertyDescriptor::new("city"));
///
/// let employee = EntityDescriptor::new("Employee")
///     .table(TableMarker::new("EMPLOYEE"))
///     .property(
///         PropertyDescriptor::new("id")
///             .id()
///             .sequence(SequenceGeneratorSpec::new("EMPLOYEE_SEQ").increment_by(50)),
///     )
///     .property(PropertyDescriptor::new("name").column("EMPLOYEE_NAME"))
///     .embedded("address", address)
///     .property(PropertyDescriptor::new("version").version());
///
/// let metamodel = EntityMetamodel::from_descriptor(&employee).unwrap();
/// assert_eq!(metamodel.table().name(), "EMPLOYEE");
/// assert_eq!(metamodel.columns().len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub(crate) name: String,
    pub(crate) table: Option<TableMarker>,
    pub(crate) members: Vec<Member>,
    pub(crate) identifier_less: bool,
}

impl EntityDescriptor {
    /// Starts a descriptor for the entity called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            members: Vec::new(),
            identifier_less: false,
        }
    }

    /// Overrides the table name (defaults to the entity name).
    #[must_use]
    pub fn table(mut self, table: TableMarker) -> Self {
        self.table = Some(table);
        self
    }

    /// Adds a property.
    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.members.push(Member::Property(property));
        self
    }

    /// Embeds another entity's properties under `name`.
    #[must_use]
    pub fn embedded(mut self, name: impl Into<String>, descriptor: Self) -> Self {
        self.members.push(Member::Embedded {
            name: name.into(),
            descriptor,
        });
        self
    }

    /// Declares that the entity has no identifier.
    #[must_use]
    pub const fn identifier_less(mut self) -> Self {
        self.identifier_less = true;
        self
    }

    /// Returns the entity name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
