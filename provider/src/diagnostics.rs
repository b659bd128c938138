//! User-visible errors and warnings collected during one lifecycle call.
//!
//! The host creates a `Diagnostics`, passes it `&mut` into the call, and
//! inspects `has_error` afterwards to decide whether to abort.

use std::fmt;

use dataminded_core::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Configuration attribute the diagnostic points at, if any.
    pub attribute: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.attribute {
            Some(attribute) => write!(f, "{level}: {} ({attribute}): {}", self.summary, self.detail),
            None => write!(f, "{level}: {}: {}", self.summary, self.detail),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Error, summary.into(), detail.into(), None);
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, summary.into(), detail.into(), None);
    }

    pub fn add_attribute_error(
        &mut self,
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.push(
            Severity::Error,
            summary.into(),
            detail.into(),
            Some(attribute.into()),
        );
    }

    /// Record a failed API call under an operation-specific summary.
    pub fn add_api_error(&mut self, summary: impl Into<String>, err: &ApiError) {
        self.add_error(summary, err.to_string());
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn has_error(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn push(&mut self, severity: Severity, summary: String, detail: String, attribute: Option<String>) {
        match severity {
            Severity::Error => tracing::error!(summary = %summary, attribute = ?attribute, "{detail}"),
            Severity::Warning => tracing::warn!(summary = %summary, attribute = ?attribute, "{detail}"),
        }
        self.entries.push(Diagnostic {
            severity,
            summary,
            detail,
            attribute,
        });
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
