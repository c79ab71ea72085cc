//! TL static analyzer -- checks over a parsed schema with structured output.
//!
//! The parser only checks syntax and identities. This crate resolves what
//! the parsed declarations refer to. Each analysis is a separate module
//! producing a serializable result struct; `analyze()` runs all of them and
//! aggregates the results into an `AnalysisReport`.

pub mod conditionals;
pub mod identities;
pub mod references;
pub mod report;
pub mod symbols;

pub use conditionals::{ConditionalsResult, FlagFieldIssue};
pub use identities::{DuplicateName, IdentitiesResult, IdentityCollision};
pub use references::{ReferenceSite, ReferencesResult, UnresolvedReference};
pub use report::{AnalysisReport, Finding, FindingSeverity};
pub use symbols::{AnalysisError, SymbolTable};

use tl_core::Program;

/// Every analysis, in the order it runs.
pub const ANALYSES: [&str; 3] = ["references", "identities", "conditionals"];

/// Run every analysis on a parsed program.
pub fn analyze(program: &Program) -> AnalysisReport {
    run(program, &ANALYSES)
}

/// Run selected analyses on a parsed program.
///
/// Valid analysis names are listed in [`ANALYSES`]. Order and duplicates
/// in `analyses` do not matter.
pub fn analyze_selected(
    program: &Program,
    analyses: &[&str],
) -> Result<AnalysisReport, AnalysisError> {
    if let Some(unknown) = analyses.iter().find(|a| !ANALYSES.contains(*a)) {
        return Err(AnalysisError::UnknownAnalysis {
            name: unknown.to_string(),
            known: ANALYSES.join(", "),
        });
    }
    let needed: Vec<&str> = ANALYSES
        .iter()
        .copied()
        .filter(|a| analyses.contains(a))
        .collect();
    Ok(run(program, &needed))
}

fn run(program: &Program, needed: &[&str]) -> AnalysisReport {
    let mut report = AnalysisReport::new();
    report.declarations = program.len();

    if needed.contains(&"references") {
        let symbols = SymbolTable::from_program(program);
        report.references = Some(references::analyze_references(program, &symbols));
        report.analyses_run.push("references".to_string());
    }
    if needed.contains(&"identities") {
        report.identities = Some(identities::analyze_identities(program));
        report.analyses_run.push("identities".to_string());
    }
    if needed.contains(&"conditionals") {
        report.conditionals = Some(conditionals::analyze_conditionals(program));
        report.analyses_run.push("conditionals".to_string());
    }

    report.extract_findings();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "\
int ?= Int;
true = True;
msg flags:int out:flags.0?true = Msg;
";

    fn program() -> Program {
        let (program, err) = tl_core::parse(SRC);
        assert_eq!(err, None);
        program
    }

    #[test]
    fn full_analyze() {
        let report = analyze(&program());
        assert_eq!(report.analyses_run, ANALYSES);
        assert_eq!(report.declarations, 3);
        assert!(report.references.is_some());
        assert!(report.identities.is_some());
        assert_eq!(report.count(FindingSeverity::Warning), 1);
        assert!(!report.has_errors());
    }

    #[test]
    fn selected_only() {
        let report = analyze_selected(&program(), &["conditionals", "identities"]).unwrap();
        assert_eq!(report.analyses_run, vec!["identities", "conditionals"]);
        assert!(report.references.is_none());
    }

    #[test]
    fn unknown_analysis() {
        let err = analyze_selected(&program(), &["s1"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownAnalysis { ref name, .. } if name == "s1"));
    }
}
