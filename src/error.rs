use std::fmt::{self, Display, Formatter};

/// A single scanner or parser diagnostic, positioned as a byte offset into
/// the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub at: usize,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "error at byte {}: {}", self.at, self.message)
    }
}

/// Consumer of scanner diagnostics.
///
/// The scanner reports at most one diagnostic per stream; everything after
/// the first failure is suppressed as a cascade.
pub trait DiagnosticSink {
    fn report(&mut self, at: usize, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, at: usize, message: &str) {
        (**self).report(at, message);
    }
}

/// Collects diagnostics into a vector.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, at: usize, message: &str) {
        self.diagnostics.push(Diagnostic {
            at,
            message: message.to_string(),
        });
    }
}

/// Sink that drops every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDiagnostics;

impl DiagnosticSink for IgnoreDiagnostics {
    fn report(&mut self, _at: usize, _message: &str) {}
}

/// Sticky scanner failure. By the time a value of this type exists the
/// diagnostic has already been delivered to the sink and the scanner only
/// produces `Error` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanError;

/// A specialized `Result` for scanner internals where the error is
/// hard-wired to [`ScanError`].
pub type ScanResult = Result<(), ScanError>;
