//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. This module
//! provides a trait for the few dialect-specific pieces the statement
//! compiler needs: identifier quoting, limit/offset and sequences.

mod generic;
mod mysql;
mod postgres;

use std::fmt;

pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use crate::statement::StatementBuffer;
use crate::value::Value;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Renders an identifier, quoting it only when asked to.
    fn enquote(&self, name: &str, quoted: bool) -> String {
        if quoted {
            self.quote_identifier(name)
        } else {
            name.to_owned()
        }
    }

    /// Returns whether `NULLS FIRST` / `NULLS LAST` are understood.
    fn supports_nulls_ordering(&self) -> bool {
        true
    }

    /// Returns whether single-table UPDATE and DELETE accept
    /// `ORDER BY … LIMIT ?`. No dialect accepts an offset there.
    fn supports_mutation_limit(&self) -> bool {
        false
    }

    /// Appends the row-limiting clause. Both values are bound, not inlined.
    fn write_offset_limit(&self, buf: &mut StatementBuffer, offset: Option<u64>, limit: Option<u64>) {
        if let Some(n) = limit {
            buf.push_str(" LIMIT ").bind(count_value(n));
        }
        if let Some(n) = offset {
            buf.push_str(" OFFSET ").bind(count_value(n));
        }
    }

    /// Returns the query that fetches the next value of a sequence, or
    /// `None` if the dialect has no sequences.
    fn sequence_sql(&self, sequence: &str) -> Option<String> {
        Some(format!("SELECT NEXT VALUE FOR {sequence}"))
    }
}

/// Binds a row count. Counts come from non-negative `i64`s, so the
/// conversion back never saturates in practice.
#[must_use]
pub fn count_value(n: u64) -> Value {
    Value::of(i64::try_from(n).unwrap_or(i64::MAX))
}
