//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::message::DiagnosticMessage;
use super::Severity;

/// Renders a slice of diagnostics, optionally against the source text
/// they were produced from.
pub struct DiagnosticsPrinter<'a> {
    messages: &'a [DiagnosticMessage],
    source: Option<&'a str>,
    path: Option<&'a str>,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub(crate) fn new(messages: &'a [DiagnosticMessage], source: &'a str) -> Self {
        Self {
            messages,
            source: Some(source),
            path: None,
            colored: false,
        }
    }

    /// Render without source context, one line per diagnostic.
    pub fn plain(messages: &'a [DiagnosticMessage]) -> Self {
        Self {
            messages,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };
        if self.messages.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let lines: Vec<&'a str> = source.lines().collect();

        for (i, diag) in self.messages.iter().enumerate() {
            let line_text = line_at(&lines, diag.pos.line);
            let span = column_span(line_text, diag.pos.column);

            let level = severity_to_level(diag.severity);
            let mut snippet = Snippet::source(line_text)
                .line_start(diag.pos.line.max(1) as usize)
                .annotation(AnnotationKind::Primary.span(span).label(&diag.message));
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }
            for related in &diag.related {
                let related_line = line_at(&lines, related.pos.line);
                let related_span = column_span(related_line, related.pos.column);
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(related_span)
                        .label(&related.message),
                );
            }

            let title_group = level.primary_title(&diag.message).element(snippet);
            let report: Vec<Group> = vec![title_group];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }
        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.messages.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn line_at<'a>(lines: &[&'a str], line: u32) -> &'a str {
    let idx = line.saturating_sub(1) as usize;
    lines.get(idx).copied().unwrap_or("")
}

fn column_span(line_text: &str, column: u32) -> std::ops::Range<usize> {
    let start = (column.saturating_sub(1) as usize).min(line_text.len());
    let end = (start + 1).min(line_text.len().max(start));
    start..end.max(start)
}
