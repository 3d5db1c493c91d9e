//! The structured diagnostic value every pipeline stage produces on failure
//! (§6 "Structured error format", §7 "Error handling design").
//!
//! A `Diagnostic` is wrapped, not stringified, as it crosses stage
//! boundaries, so both the JSON envelope and test assertions see the full
//! structure (§7 "Propagation policy").

use std::collections::BTreeMap;
use std::fmt;

use ailang_ir::{NodeId, SourceSpan};
use serde::Serialize;
use serde_json::Value as Json;

use crate::error_code::ErrorCode;
use crate::phase::Phase;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// A suggested fix, with a confidence the caller can use to decide whether
/// to surface it at all.
#[derive(Clone, Debug)]
pub struct Fix {
    pub suggestion: String,
    pub confidence: f64,
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub phase: Phase,
    pub severity: Severity,
    pub message: String,
    /// The Core node this diagnostic is anchored to, if any (`sid` in the
    /// JSON envelope; "unknown" when absent).
    pub node: Option<NodeId>,
    /// Arbitrary structured payload. Serialized with sorted keys
    /// (`BTreeMap`) per §6 "Data arrays are sorted ... JSON field ordering
    /// stable".
    pub data: BTreeMap<String, Json>,
    pub fix: Option<Fix>,
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: ErrorCode, phase: Phase, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            phase,
            severity: Severity::Error,
            message: message.into(),
            data: BTreeMap::new(),
            fix: None,
            span: None,
        }
    }

    #[must_use]
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    #[must_use]
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_fix(mut self, suggestion: impl Into<String>, confidence: f64) -> Self {
        self.fix = Some(Fix {
            suggestion: suggestion.into(),
            confidence,
        });
        self
    }

    /// Serializable view matching the `ailang.error/v1` schema exactly.
    #[must_use]
    pub fn to_envelope(&self, line_index: Option<&LineIndex>) -> Envelope {
        Envelope {
            schema: "ailang.error/v1",
            code: self.code.0.clone(),
            phase: self.phase.to_string(),
            sid: self
                .node
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            message: self.message.clone(),
            data: self.data.clone(),
            fix: self.fix.as_ref().map(|f| FixEnvelope {
                suggestion: f.suggestion.clone(),
                confidence: f.confidence,
            }),
            span: self.span.as_ref().map(|s| {
                let (line, col) = line_index
                    .map(|idx| idx.line_col(s.span.start))
                    .unwrap_or((0, 0));
                SpanEnvelope {
                    file: s.file.clone(),
                    line,
                    col,
                }
            }),
        }
    }

    #[must_use]
    pub fn to_json(&self, line_index: Option<&LineIndex>, compact: bool) -> String {
        let env = self.to_envelope(line_index);
        if compact {
            serde_json::to_string(&env).unwrap_or_default()
        } else {
            serde_json::to_string_pretty(&env).unwrap_or_default()
        }
    }
}

#[derive(Serialize)]
pub struct FixEnvelope {
    pub suggestion: String,
    pub confidence: f64,
}

#[derive(Serialize)]
pub struct SpanEnvelope {
    pub file: String,
    pub line: u32,
    pub col: u32,
}

#[derive(Serialize)]
pub struct Envelope {
    pub schema: &'static str,
    pub code: String,
    pub phase: String,
    pub sid: String,
    pub message: String,
    pub data: BTreeMap<String, Json>,
    pub fix: Option<FixEnvelope>,
    pub span: Option<SpanEnvelope>,
}

/// Maps byte offsets to 1-based (line, col), built once per source file.
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<u32>,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineIndex { line_starts }
    }

    #[must_use]
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col + 1)
    }
}
