use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SuiteError>;

/// Errors raised by the browser session and page abstractions.
///
/// Probe-style methods never surface these; they degrade to
/// [`Probe`](crate::pages::Probe) or an empty collection instead. Action
/// methods propagate them after their fallback chain is exhausted.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("no tab exists at index {index} ({open} open)")]
    TabIndexOutOfRange { index: usize, open: usize },

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timeout after {ms}ms waiting for: {condition}")]
    Timeout { ms: u64, condition: String },

    /// Unexpected error from the automation layer.
    #[error("driver error: {0}")]
    Driver(String),

    /// A scenario step observed an outcome that contradicts its assertion.
    #[error("step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SuiteError {
    /// Timeout error for a polled condition, tagged with its deadline.
    pub fn timeout(ms: u64, condition: impl Into<String>) -> Self {
        SuiteError::Timeout { ms, condition: condition.into() }
    }

    /// Orchestration-level assertion failure.
    pub fn step(step: impl Into<String>, reason: impl Into<String>) -> Self {
        SuiteError::StepFailed { step: step.into(), reason: reason.into() }
    }

    /// Whether this error is a polled-condition timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SuiteError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = SuiteError::timeout(5000, "element '#search' visible");
        assert_eq!(err.to_string(), "timeout after 5000ms waiting for: element '#search' visible");
        assert!(err.is_timeout());
    }

    #[test]
    fn test_tab_index_out_of_range_display() {
        let err = SuiteError::TabIndexOutOfRange { index: 3, open: 2 };
        assert_eq!(err.to_string(), "no tab exists at index 3 (2 open)");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_step_failed_display() {
        let err = SuiteError::step("validate suggestions", "no suggestions rendered");
        assert_eq!(err.to_string(), "step 'validate suggestions' failed: no suggestions rendered");
    }
}
