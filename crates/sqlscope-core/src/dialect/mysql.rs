//! MySQL dialect.

use super::{Dialect, count_value};
use crate::statement::StatementBuffer;

/// Largest row count MySQL accepts; used when only an offset is given.
const MAX_ROWS: u64 = 18_446_744_073_709_551_615;

/// MySQL: backtick quoting, no sequences, no `NULLS FIRST/LAST`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn supports_mutation_limit(&self) -> bool {
        true
    }

    fn write_offset_limit(&self, buf: &mut StatementBuffer, offset: Option<u64>, limit: Option<u64>) {
        match (offset, limit) {
            (None, None) => {}
            (None, Some(limit)) => {
                buf.push_str(" LIMIT ").bind(count_value(limit));
            }
            (Some(offset), limit) => {
                // MySQL has no OFFSET without LIMIT
                buf.push_str(" LIMIT ");
                match limit {
                    Some(limit) => buf.bind(count_value(limit)),
                    None => buf.push_str(&MAX_ROWS.to_string()),
                };
                buf.push_str(" OFFSET ").bind(count_value(offset));
            }
        }
    }

    fn sequence_sql(&self, _sequence: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_mysql_dialect() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.enquote("order", true), "`order`");
        assert!(dialect.sequence_sql("seq").is_none());
        assert!(!dialect.supports_nulls_ordering());
        assert!(dialect.supports_mutation_limit());
    }

    #[test]
    fn test_offset_without_limit() {
        let mut buf = StatementBuffer::new();
        MySqlDialect::new().write_offset_limit(&mut buf, Some(20), None);
        assert_eq!(buf.text(), " LIMIT 18446744073709551615 OFFSET ?");
        assert_eq!(buf.values(), &[Value::of(20_i64)]);
    }

    #[test]
    fn test_limit_and_offset() {
        let mut buf = StatementBuffer::new();
        MySqlDialect::new().write_offset_limit(&mut buf, Some(5), Some(10));
        assert_eq!(buf.text(), " LIMIT ? OFFSET ?");
        assert_eq!(buf.values(), &[Value::of(10_i64), Value::of(5_i64)]);
    }
}
