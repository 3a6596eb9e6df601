use http::{HeaderMap, Method, StatusCode, Uri};

/// Logging priority derived from the resolved status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Below 400; nothing is logged
    None,
    /// Client error (400-499)
    Warning,
    /// Server error (500 and above)
    Critical,
}

impl Severity {
    /// Bucket a status: >= 500 critical, 400-499 warning, below none
    #[must_use]
    pub const fn from_status(status: StatusCode) -> Self {
        let status = status.as_u16();
        if status >= 500 {
            Self::Critical
        } else if status >= 400 {
            Self::Warning
        } else {
            Self::None
        }
    }
}

/// Request fields attached to every emitted log line
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Request method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
}

/// Instruction handed to the logging collaborator
///
/// Assembled once per caught error; severity [`Severity::None`]
/// directives are never handed out.
#[derive(Debug, Clone)]
pub struct LogDirective {
    /// Bucket deciding how the sink records the line
    pub severity: Severity,
    /// Pre-rendered log line
    pub message: String,
    /// Originating request fields
    pub context: LogContext,
    /// Captured trace, empty when the error carried none
    pub stack_trace: String,
}

/// Logging collaborator handed into the filter at construction
///
/// Emission is fire-and-forget: implementations must not block or fail
/// the response path.
pub trait ErrorSink: Send + Sync {
    /// Record one directive
    fn emit(&self, directive: &LogDirective);
}
