//! PostgreSQL dialect.

use super::Dialect;

/// PostgreSQL: `nextval('seq')` for sequences, otherwise standard SQL.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn sequence_sql(&self, sequence: &str) -> Option<String> {
        let escaped = sequence.replace('\'', "''");
        Some(format!("SELECT nextval('{escaped}')"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_sql() {
        let dialect = PostgresDialect::new();
        assert_eq!(
            dialect.sequence_sql("emp_seq").as_deref(),
            Some("SELECT nextval('emp_seq')")
        );
        assert_eq!(
            dialect.sequence_sql("\"Emp_Seq\"").as_deref(),
            Some("SELECT nextval('\"Emp_Seq\"')")
        );
    }
}
