//! Status line and notification sink

/// Where the pipeline reports progress and transient notices. Hosts map
/// this onto a status bar and toast notifications; tests capture it.
pub trait StatusSink: Send + Sync {
    /// Replace the status line text. Empty string clears it.
    fn set_status(&self, text: &str);

    /// Show a transient notice to the user.
    fn notify(&self, message: &str);
}

/// A sink that drops everything, for headless use.
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn set_status(&self, _text: &str) {}
    fn notify(&self, _message: &str) {}
}
