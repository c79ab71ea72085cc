//! AnalysisReport -- aggregated output from the schema checks.
//!
//! The report keeps each check's raw result and flattens them into a list
//! of findings for display.

use crate::conditionals::ConditionalsResult;
use crate::identities::IdentitiesResult;
use crate::references::{ReferenceSite, ReferencesResult};
use serde::Serialize;

/// Severity level for an analysis finding.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingSeverity {
    Info,
    Warning,
    Error,
}

impl FindingSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingSeverity::Info => "info",
            FindingSeverity::Warning => "warning",
            FindingSeverity::Error => "error",
        }
    }
}

/// A notable finding from analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub analysis: String,
    pub severity: FindingSeverity,
    pub message: String,
    pub declaration: Option<String>,
    pub line: Option<u32>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub references: Option<ReferencesResult>,
    pub identities: Option<IdentitiesResult>,
    pub conditionals: Option<ConditionalsResult>,
    pub analyses_run: Vec<String>,
    /// Number of declarations in the analyzed program.
    pub declarations: usize,
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.count(FindingSeverity::Error) > 0
    }

    pub fn count(&self, severity: FindingSeverity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Extract findings from populated analysis results.
    pub fn extract_findings(&mut self) {
        self.findings.clear();

        if let Some(ref refs) = self.references {
            for u in &refs.unresolved {
                let message = match u.site {
                    ReferenceSite::FunctionResult => format!(
                        "function '{}' returns undeclared type '{}'",
                        u.declaration, u.name
                    ),
                    ReferenceSite::TypeDeclaration => format!(
                        "type declaration names undeclared type '{}'",
                        u.name
                    ),
                    ReferenceSite::Argument | ReferenceSite::ResultArgument => format!(
                        "'{}' references undeclared type '{}'",
                        u.declaration, u.name
                    ),
                };
                self.findings.push(Finding {
                    analysis: "references".to_string(),
                    severity: FindingSeverity::Error,
                    message,
                    declaration: Some(u.declaration.clone()),
                    line: Some(u.line),
                    details: Some(serde_json::json!({
                        "name": u.name,
                        "section": u.section,
                        "site": u.site,
                    })),
                });
            }
        }

        if let Some(ref ids) = self.identities {
            for dup in &ids.duplicate_names {
                self.findings.push(Finding {
                    analysis: "identities".to_string(),
                    severity: FindingSeverity::Error,
                    message: format!(
                        "'{}' is declared {} times in the {} section",
                        dup.name,
                        dup.lines.len(),
                        dup.section.as_str()
                    ),
                    declaration: Some(dup.name.clone()),
                    line: dup.lines.first().copied(),
                    details: Some(serde_json::json!({ "lines": dup.lines })),
                });
            }
            for collision in &ids.collisions {
                let names: Vec<&str> = collision
                    .combinators
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect();
                self.findings.push(Finding {
                    analysis: "identities".to_string(),
                    severity: FindingSeverity::Error,
                    message: format!(
                        "identity #{} is shared by {}",
                        collision.identity,
                        names.join(", ")
                    ),
                    declaration: names.first().map(|n| n.to_string()),
                    line: collision.combinators.first().map(|(_, line)| *line),
                    details: Some(serde_json::json!({
                        "identity": collision.identity,
                        "combinators": collision.combinators,
                    })),
                });
            }
        }

        if let Some(ref conds) = self.conditionals {
            for issue in &conds.issues {
                self.findings.push(Finding {
                    analysis: "conditionals".to_string(),
                    severity: FindingSeverity::Warning,
                    message: format!(
                        "'{}' reads flag field '{}' of type '{}', expected '#'",
                        issue.argument, issue.field, issue.field_type
                    ),
                    declaration: Some(issue.combinator.clone()),
                    line: Some(issue.line),
                    details: None,
                });
            }
        }

        // Deterministic output: by line, then severity, then message
        self.findings.sort_by(|a, b| {
            a.line
                .cmp(&b.line)
                .then_with(|| b.severity.cmp(&a.severity))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditionals::FlagFieldIssue;

    #[test]
    fn empty_report_has_no_errors() {
        let mut report = AnalysisReport::new();
        report.extract_findings();
        assert!(report.findings.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut report = AnalysisReport::new();
        report.conditionals = Some(ConditionalsResult {
            checked: 1,
            issues: vec![FlagFieldIssue {
                combinator: "msg".into(),
                line: 3,
                argument: "text".into(),
                field: "flags".into(),
                field_type: "int".into(),
            }],
        });
        report.extract_findings();
        assert_eq!(report.count(FindingSeverity::Warning), 1);
        assert!(!report.has_errors());
        assert_eq!(report.findings[0].line, Some(3));
    }

    #[test]
    fn report_serializes() {
        let report = AnalysisReport::new();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("analyses_run").unwrap().is_array());
        assert!(json.get("findings").unwrap().is_array());
    }
}
