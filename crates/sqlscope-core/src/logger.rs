//! Statement logging.
//!
//! The compiler never formats log output itself: a [`Statement`] carries its
//! own interpolated rendering, and a [`StatementLogger`] only decides where
//! that rendering goes.

use tracing::{Level, debug};

use crate::statement::Statement;

/// Target for statement log events.
pub const STATEMENT_TARGET: &str = "sqlscope::sql";

/// Target for free-form log messages.
pub const MESSAGE_TARGET: &str = "sqlscope";

/// Receives rendered statements and diagnostic messages.
pub trait StatementLogger: Send + Sync {
    /// Logs a message. The supplier is only invoked if the message will be
    /// emitted.
    fn log_message(&self, message: &dyn Fn() -> String);

    /// Logs a statement. Only [`Statement::log`] is consulted.
    fn log_statement(&self, statement: &Statement);
}

/// Forwards to `tracing` at DEBUG level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl StatementLogger for TracingLogger {
    fn log_message(&self, message: &dyn Fn() -> String) {
        if tracing::enabled!(target: MESSAGE_TARGET, Level::DEBUG) {
            debug!(target: MESSAGE_TARGET, "{}", message());
        }
    }

    fn log_statement(&self, statement: &Statement) {
        if let Some(log) = statement.log() {
            debug!(target: STATEMENT_TARGET, sql = %log, "statement");
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl StatementLogger for NoopLogger {
    fn log_message(&self, _message: &dyn Fn() -> String) {}

    fn log_statement(&self, _statement: &Statement) {}
}
