//! # sqlscope-orm
//!
//! Metadata-driven statement construction on top of `sqlscope-core`.
//!
//! This crate provides:
//! - [`metamodel`]: entity descriptors and the validated, flattened
//!   [`EntityMetamodel`](metamodel::EntityMetamodel)
//! - [`Entity`]: the trait entity types implement
//! - [`criteria`]: the scoped where / order-by / limit / offset DSL
//! - [`context`]: insert, update, delete and select contexts
//! - [`SqlCompiler`]: renders a context into a [`Statement`]
//! - [`listener`]: lifecycle hooks around entity mutations
//! - [`Session`]: compiles, logs and drives mutations through an
//!   [`Executor`]
//!
//! ## Quick start
//!
//! ```rust
//! use sqlscope_orm::metamodel::{EntityDescriptor, PropertyDescriptor, TableMarker};
//! use sqlscope_orm::{Entity, QueryConfig, Session, Value};
//!
//! struct Employee {
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Entity for Employee {
//!     fn descriptor() -> EntityDescriptor {
//!         EntityDescriptor::new("Employee")
//!             .table(TableMarker::new("EMPLOYEE"))
//!             .property(PropertyDescriptor::new("id").id())
//!             .property(PropertyDescriptor::new("name").column("EMPLOYEE_NAME"))
//!             .property(PropertyDescriptor::new("age"))
//!     }
//!
//!     fn value_of(&self, property_path: &str) -> Option<Value> {
//!         match property_path {
//!             "id" => Some(Value::of(self.id)),
//!             "name" => Some(Value::of(self.name.as_str())),
//!             "age" => Some(Value::of(self.age)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let session = Session::new(QueryConfig::default());
//! let statement = session
//!     .select::<Employee>(|c| {
//!         c.where_clause(|w| {
//!             w.ge("age", 30_i32);
//!         });
//!         c.order_by(|o| {
//!             o.asc("name");
//!         });
//!         c.limit(|| 10);
//!     })
//!     .unwrap();
//!
//! assert_eq!(
//!     statement.text(),
//!     "SELECT id, EMPLOYEE_NAME, age FROM EMPLOYEE WHERE age >= ? ORDER BY EMPLOYEE_NAME ASC LIMIT ?"
//! );
//! assert_eq!(statement.values(), &[Value::of(30_i32), Value::of(10_i64)]);
//! ```

pub mod compiler;
pub mod config;
pub mod context;
pub mod criteria;
pub mod entity;
mod error;
pub mod listener;
pub mod metamodel;
mod sequence;
pub mod session;

pub use compiler::SqlCompiler;
pub use config::{DialectKind, QueryConfig};
pub use entity::Entity;
pub use error::{
    AssignError, BoxError, CompileError, ConfigError, CriteriaError, MetamodelError, QueryError,
    Result,
};
pub use listener::{AuditListener, DefaultListener, EntityListener, ListenerChain};
pub use session::{Executor, Session};

// Re-export the statement layer so users need only one dependency.
pub use sqlscope_core::{
    Datum, Dialect, GenericDialect, MySqlDialect, NoopLogger, PostgresDialect, Sql, SqlEnum,
    SqlType, Statement, StatementLogger, ToValue, TracingLogger, Value,
};
