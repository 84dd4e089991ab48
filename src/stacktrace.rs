use serde::{Deserialize, Serialize};

/// One resolved stack frame. Fields are optional because symbol resolution is
/// best-effort (stripped binaries, inlined frames).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

/// Captures the current call stack as an ordered, outermost-last sequence of
/// frames. The result is never empty: when no symbol resolves at all, a single
/// placeholder frame stands in so downstream consumers can rely on at least
/// one entry.
pub fn capture() -> Vec<StackFrame> {
    let mut frames = Vec::new();
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            frames.push(StackFrame {
                function: symbol.name().map(|name| name.to_string()),
                file: symbol.filename().map(|path| path.display().to_string()),
                line: symbol.lineno(),
            });
        });
        true
    });
    if frames.is_empty() {
        frames.push(StackFrame {
            function: Some("<unresolved>".to_string()),
            file: None,
            line: None,
        });
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_returns_at_least_one_frame() {
        let frames = capture();
        assert!(!frames.is_empty());
    }

    #[test]
    fn capture_resolves_this_test() {
        let frames = capture();
        let resolved = frames
            .iter()
            .filter_map(|frame| frame.function.as_deref())
            .any(|name| name.contains("capture_resolves_this_test"));
        assert!(resolved, "expected the test frame to resolve: {frames:?}");
    }
}
