//! Rendered statements.
//!
//! A [`Statement`] is the only artifact handed to an executor: SQL text
//! with positional `?` placeholders, the values bound to them in
//! left-to-right order, and an optional log rendering with the values
//! interpolated. Statements are assembled through a [`StatementBuffer`],
//! which appends text and binds values in lockstep so the placeholder
//! count always matches the value count.

use crate::error::StatementError;
use crate::value::Value;

/// The positional parameter placeholder.
pub const PLACEHOLDER: char = '?';

/// An immutable SQL statement with its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    values: Vec<Value>,
    log: Option<String>,
}

/// Alias matching the name used by executors.
pub type Sql = Statement;

impl Statement {
    /// Creates a statement from already rendered text.
    ///
    /// `log_enabled` controls whether the interpolated log rendering is
    /// produced.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::PlaceholderMismatch`] if the number of
    /// placeholders in `text` differs from `values.len()`.
    pub fn new(
        text: impl Into<String>,
        values: Vec<Value>,
        log_enabled: bool,
    ) -> Result<Self, StatementError> {
        let text = text.into();
        let placeholders = placeholder_count(&text);
        if placeholders != values.len() {
            return Err(StatementError::PlaceholderMismatch {
                placeholders,
                values: values.len(),
            });
        }
        let log = log_enabled.then(|| render_log(&text, &values));
        Ok(Self { text, values, log })
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the bind values in placeholder order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the interpolated log rendering, if logging was enabled.
    #[must_use]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Returns the number of placeholders in the text.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        placeholder_count(&self.text)
    }

    /// Consumes the statement and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>, Option<String>) {
        (self.text, self.values, self.log)
    }
}

/// Accumulates SQL text and bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementBuffer {
    text: String,
    values: Vec<Value>,
}

impl StatementBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw SQL text.
    ///
    /// **Warning**: Only use this for SQL fragments that don't contain user input.
    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        self.text.push_str(sql);
        self
    }

    /// Appends a placeholder and binds `value` to it.
    pub fn bind(&mut self, value: Value) -> &mut Self {
        self.text.push(PLACEHOLDER);
        self.values.push(value);
        self
    }

    /// Binds each value, separating placeholders with `separator`.
    pub fn bind_all(
        &mut self,
        values: impl IntoIterator<Item = Value>,
        separator: &str,
    ) -> &mut Self {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.text.push_str(separator);
            }
            self.bind(value);
        }
        self
    }

    /// Appends another buffer, text and values alike.
    pub fn append(&mut self, other: Self) -> &mut Self {
        self.text.push_str(&other.text);
        self.values.extend(other.values);
        self
    }

    /// Wraps the accumulated text in parentheses.
    #[must_use]
    pub fn paren(self) -> Self {
        Self {
            text: format!("({})", self.text),
            values: self.values,
        }
    }

    /// Returns the text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the values bound so far.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Finishes the statement after checking that raw text pushed
    /// through [`push_str`](Self::push_str) added no stray placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`StatementError::PlaceholderMismatch`] if the text and the
    /// bound values disagree.
    pub fn build(self, log_enabled: bool) -> Result<Statement, StatementError> {
        Statement::new(self.text, self.values, log_enabled)
    }

    /// Finishes the statement.
    #[must_use]
    pub fn finish(self, log_enabled: bool) -> Statement {
        let log = log_enabled.then(|| render_log(&self.text, &self.values));
        Statement {
            text: self.text,
            values: self.values,
            log,
        }
    }
}

/// Counts `?` placeholders outside quoted regions.
#[must_use]
pub fn placeholder_count(text: &str) -> usize {
    let mut count = 0;
    scan(text, |c, quoted| {
        if c == PLACEHOLDER && !quoted {
            count += 1;
        }
    });
    count
}

/// Replaces each placeholder with the literal of the value bound to it.
///
/// Placeholders without a matching value are left in place.
#[must_use]
pub fn render_log(text: &str, values: &[Value]) -> String {
    let mut out = String::with_capacity(text.len() + values.len() * 8);
    let mut values = values.iter();
    scan(text, |c, quoted| {
        if c == PLACEHOLDER && !quoted {
            match values.next() {
                Some(value) => out.push_str(&value.to_literal()),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    });
    out
}

/// Walks `text`, reporting for each char whether it sits inside a quoted
/// string or identifier. Doubled quotes leave and re-enter the region, so
/// escapes need no special case.
fn scan(text: &str, mut visit: impl FnMut(char, bool)) {
    let mut open: Option<char> = None;
    for c in text.chars() {
        match open {
            Some(q) if c == q => {
                open = None;
                visit(c, true);
            }
            Some(_) => visit(c, true),
            None if matches!(c, '\'' | '"' | '`') => {
                open = Some(c);
                visit(c, true);
            }
            None => visit(c, false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_binds_in_lockstep() {
        let mut buf = StatementBuffer::new();
        buf.push_str("SELECT id FROM users WHERE age > ")
            .bind(Value::of(18_i32))
            .push_str(" AND name IN (")
            .bind_all([Value::of("a"), Value::of("b")], ", ")
            .push_str(")");
        let statement = buf.finish(false);
        assert_eq!(
            statement.text(),
            "SELECT id FROM users WHERE age > ? AND name IN (?, ?)"
        );
        assert_eq!(statement.values().len(), 3);
        assert_eq!(statement.placeholder_count(), 3);
        assert_eq!(statement.log(), None);
    }

    #[test]
    fn test_build_rejects_stray_placeholders() {
        let mut buf = StatementBuffer::new();
        buf.push_str("SELECT * FROM odd?name WHERE id = ")
            .bind(Value::of(1_i64));
        assert_eq!(
            buf.build(false).unwrap_err(),
            StatementError::PlaceholderMismatch {
                placeholders: 2,
                values: 1,
            }
        );
    }

    #[test]
    fn test_log_interpolates_values() {
        let mut buf = StatementBuffer::new();
        buf.push_str("UPDATE users SET name = ")
            .bind(Value::of("it's"))
            .push_str(" WHERE id = ")
            .bind(Value::of(1_i64));
        let statement = buf.finish(true);
        assert_eq!(
            statement.log(),
            Some("UPDATE users SET name = 'it''s' WHERE id = 1")
        );
    }

    #[test]
    fn test_quoted_question_marks_are_not_placeholders() {
        assert_eq!(placeholder_count("SELECT \"a?\" FROM t WHERE b = ?"), 1);
        assert_eq!(placeholder_count("SELECT 'what?' , `x?`"), 0);
        assert_eq!(placeholder_count("SELECT 'it''s?' WHERE a = ?"), 1);
    }

    #[test]
    fn test_new_checks_placeholder_count() {
        let err = Statement::new("SELECT ? , ?", vec![Value::of(1_i32)], false).unwrap_err();
        assert_eq!(
            err,
            StatementError::PlaceholderMismatch {
                placeholders: 2,
                values: 1
            }
        );
        let ok = Statement::new("SELECT ?", vec![Value::of(1_i32)], true).unwrap();
        assert_eq!(ok.log(), Some("SELECT 1"));
    }

    #[test]
    fn test_append_and_paren() {
        let mut left = StatementBuffer::new();
        left.push_str("a = ").bind(Value::of(1_i32));
        let mut right = StatementBuffer::new();
        right.push_str("b = ").bind(Value::of(2_i32));
        let mut joined = left;
        joined.push_str(" OR ").append(right);
        let wrapped = joined.paren();
        assert_eq!(wrapped.text(), "(a = ? OR b = ?)");
        assert_eq!(wrapped.values(), &[Value::of(1_i32), Value::of(2_i32)]);
    }

    #[test]
    fn test_render_log_leaves_unbound_placeholders() {
        assert_eq!(render_log("a = ? AND b = ?", &[Value::of(1_i32)]), "a = 1 AND b = ?");
    }
}
