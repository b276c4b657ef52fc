//! Statement logging through `tracing`.

use std::io;
use std::sync::{Arc, Mutex};

use sqlscope_core::{NoopLogger, StatementBuffer, StatementLogger, TracingLogger, Value};
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(f: impl FnOnce()) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    captured.contents()
}

fn statement(log_enabled: bool) -> sqlscope_core::Statement {
    let mut buf = StatementBuffer::new();
    buf.push_str("SELECT name FROM employee WHERE id = ")
        .bind(Value::of(42_i64));
    buf.finish(log_enabled)
}

#[test]
fn tracing_logger_emits_interpolated_statement() {
    let out = capture(|| TracingLogger.log_statement(&statement(true)));
    assert!(out.contains("SELECT name FROM employee WHERE id = 42"), "{out}");
    assert!(out.contains("sqlscope::sql"), "{out}");
}

#[test]
fn tracing_logger_skips_statement_without_log() {
    let out = capture(|| TracingLogger.log_statement(&statement(false)));
    assert!(out.is_empty(), "{out}");
}

#[test]
fn tracing_logger_evaluates_message_lazily() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let out = capture(|| {
        TracingLogger.log_message(&|| {
            *counter.lock().unwrap() += 1;
            String::from("metamodel built")
        });
    });
    assert!(out.contains("metamodel built"), "{out}");
    assert_eq!(*calls.lock().unwrap(), 1);

    let silent = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&silent);
    NoopLogger.log_message(&|| {
        *counter.lock().unwrap() += 1;
        String::new()
    });
    assert_eq!(*silent.lock().unwrap(), 0);
}
