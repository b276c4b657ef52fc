//! # sqlscope-core
//!
//! The statement layer of sqlscope.
//!
//! This crate provides:
//! - [`Value`]: a runtime datum paired with the SQL type it is bound as
//! - [`Statement`]: rendered SQL text, its ordered bind values and an
//!   optional interpolated log rendering
//! - [`StatementBuffer`]: appends SQL and binds values in lockstep
//! - [`Dialect`]: identifier quoting, limit/offset and sequence syntax
//! - [`StatementLogger`]: the logging capability handed every statement
//!
//! ## Building a statement
//!
//! ```rust
//! use sqlscope_core::{StatementBuffer, Value};
//!
//! let mut buf = StatementBuffer::new();
//! buf.push_str("SELECT id FROM employee WHERE name = ");
//! buf.bind(Value::of("O'Brien"));
//! let statement = buf.finish(true);
//!
//! assert_eq!(statement.text(), "SELECT id FROM employee WHERE name = ?");
//! assert_eq!(statement.values().len(), 1);
//! assert_eq!(
//!     statement.log(),
//!     Some("SELECT id FROM employee WHERE name = 'O''Brien'")
//! );
//! ```

pub mod dialect;
mod error;
pub mod logger;
pub mod statement;
pub mod value;

pub use dialect::{Dialect, GenericDialect, MySqlDialect, PostgresDialect};
pub use error::StatementError;
pub use logger::{NoopLogger, StatementLogger, TracingLogger};
pub use statement::{Sql, Statement, StatementBuffer};
pub use value::{Datum, SqlEnum, SqlType, SqlTyped, ToValue, Value};
