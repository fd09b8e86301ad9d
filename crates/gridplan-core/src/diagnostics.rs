//! Diagnostics collected while loading demand nodes.
//!
//! A bad row never aborts a load. It is either skipped (counted in
//! `rows_skipped`) or kept and flagged, and the reason lands here.
//!
//! ```
//! use gridplan_core::diagnostics::{LoadDiagnostics, Severity};
//!
//! let mut diag = LoadDiagnostics::default();
//! diag.skip_row(Severity::Warning, "non_finite", "x is NaN", 7);
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.stats.rows_skipped, 1);
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Row skipped or kept with a questionable value
    Warning,
    /// Row could not be read at all
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Grouping key such as `non_finite` or `negative_weight`
    pub category: String,
    pub message: String,
    /// 1-based input line of a skipped row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Location of a kept but flagged node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level} [{}]: {}", self.category, self.message)?;
        match (self.line, &self.entity) {
            (Some(line), _) => write!(f, " (line {line})"),
            (None, Some(entity)) => write!(f, " at {entity}"),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_skipped: usize,
    /// Kept rows whose coordinates repeat an earlier row
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadDiagnostics {
    pub stats: LoadStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl LoadDiagnostics {
    /// Record why the row at `line` was dropped.
    pub fn skip_row(&mut self, severity: Severity, category: &str, message: &str, line: usize) {
        self.stats.rows_skipped += 1;
        self.issues.push(DiagnosticIssue {
            severity,
            category: category.to_string(),
            message: message.to_string(),
            line: Some(line),
            entity: None,
        });
    }

    /// Warn about a row that was kept.
    pub fn flag(&mut self, category: &str, message: &str, entity: &str) {
        self.issues.push(DiagnosticIssue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.to_string(),
            line: None,
            entity: Some(entity.to_string()),
        });
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// One-line account of the load, e.g.
    /// `10 rows: 8 kept, 2 skipped, 1 duplicate coordinate(s); 2 warning(s), 0 error(s)`.
    pub fn summary(&self) -> String {
        let LoadStats {
            rows_read,
            rows_kept,
            rows_skipped,
            duplicates,
        } = self.stats;
        format!(
            "{rows_read} rows: {rows_kept} kept, {rows_skipped} skipped, \
             {duplicates} duplicate coordinate(s); {} warning(s), {} error(s)",
            self.warning_count(),
            self.error_count()
        )
    }
}
