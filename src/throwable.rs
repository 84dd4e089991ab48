use crate::stacktrace::{self, StackFrame};

/// Capability for anything the agent can capture as an error report: a
/// message, an error kind, and a backtrace. The blanket impl below makes
/// every `std::error::Error` capturable without further ceremony; types with
/// richer context can implement the trait directly.
pub trait Throwable {
    fn message(&self) -> String;

    fn kind(&self) -> String;

    /// Defaults to snapshotting the stack at the capture site.
    fn backtrace(&self) -> Vec<StackFrame> {
        stacktrace::capture()
    }
}

impl<E: std::error::Error + ?Sized> Throwable for E {
    fn message(&self) -> String {
        self.to_string()
    }

    fn kind(&self) -> String {
        std::any::type_name::<E>().to_string()
    }
}
