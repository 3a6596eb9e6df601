use faultline_core::{ErrorSink, LogDirective, Severity};

/// Logging sink over the `tracing` ecosystem
///
/// Critical directives log at error level, warnings at warn level; both
/// attach the request headers and the captured trace as fields. Never
/// blocks or fails the response path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn emit(&self, directive: &LogDirective) {
        match directive.severity {
            Severity::Critical => {
                tracing::error!(
                    headers = ?directive.context.headers,
                    stack = %directive.stack_trace,
                    "{}",
                    directive.message
                );
            }
            Severity::Warning => {
                tracing::warn!(
                    headers = ?directive.context.headers,
                    stack = %directive.stack_trace,
                    "{}",
                    directive.message
                );
            }
            Severity::None => {}
        }
    }
}
