//! Compiler diagnostics infrastructure.
//!
//! Every pass reports problems into a shared [`Diagnostics`] sink
//! instead of returning `Result` and bailing on the first error, so one
//! run of the compiler surfaces everything it can find. [`DiagnosticsPrinter`]
//! turns the collected messages into readable output.

mod kind;
mod message;
mod printer;


pub use kind::DiagnosticKind;
pub use message::{RelatedInfo, Severity};
pub use printer::DiagnosticsPrinter;

use cmm_core::Position;
use message::DiagnosticMessage;

/// Collection of diagnostics accumulated across lexing, parsing, and
/// semantic analysis.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for a diagnostic in progress. Call [`DiagnosticBuilder::emit`]
/// to commit it; dropping the builder without emitting silently
/// discards it, which is why every call site ends in `.emit()`.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report one of the fixed-text semantic diagnostics.
    pub fn report(&mut self, pos: Position, kind: DiagnosticKind) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(pos, kind.message()),
        }
    }

    /// Report a free-form diagnostic, for lexer/parser errors whose
    /// text depends on what was actually found in the source.
    pub fn error(&mut self, pos: Position, message: impl Into<String>) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(pos, message),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(DiagnosticMessage::is_error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer<'a>(&'a self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(&self.messages, source)
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Attach a secondary location, e.g. where a name was first declared.
    pub fn related_to(mut self, pos: Position, message: impl Into<String>) -> Self {
        self.message.related.push(RelatedInfo::new(pos, message));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
