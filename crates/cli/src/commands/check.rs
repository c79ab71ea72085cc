use std::path::Path;
use std::process;

use tl_analyze::FindingSeverity;
use tl_core::ParseOptions;

use crate::commands::read_source;
use crate::{report_error, report_tl_error, OutputFormat};

pub(crate) fn cmd_check(
    file: &Path,
    options: &ParseOptions,
    analyses: Option<&[String]>,
    output: OutputFormat,
    quiet: bool,
) {
    // Step 1: Parse the .tl file
    let src = read_source(file, output, quiet);
    let outcome = tl_core::parse_with(&src, options);
    if !outcome.is_ok() {
        for e in &outcome.errors {
            report_tl_error(e, output, quiet);
        }
        process::exit(1);
    }
    if !quiet && output == OutputFormat::Text {
        for w in &outcome.warnings {
            eprintln!("warning: {}", w);
        }
    }

    // Step 2: Run analysis
    let report = match analyses {
        None => tl_analyze::analyze(&outcome.program),
        Some(selected) => {
            let selected: Vec<&str> = selected.iter().map(String::as_str).collect();
            match tl_analyze::analyze_selected(&outcome.program, &selected) {
                Ok(r) => r,
                Err(e) => {
                    let msg = format!("invalid analysis: {}", e);
                    report_error(&msg, output, quiet);
                    process::exit(1);
                }
            }
        }
    };

    // Step 3: Format output
    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("Static Analysis Report");
                println!("======================");
                println!();
                println!("  Declarations: {}", report.declarations);

                if let Some(ref refs) = report.references {
                    println!(
                        "  References: {} declarations checked, {} unresolved",
                        refs.checked,
                        refs.unresolved.len()
                    );
                }

                if let Some(ref ids) = report.identities {
                    println!(
                        "  Identities: {} combinators, {} duplicate names, {} collisions",
                        ids.checked,
                        ids.duplicate_names.len(),
                        ids.collisions.len()
                    );
                }

                if let Some(ref conds) = report.conditionals {
                    println!(
                        "  Conditionals: {} conditional fields, {} issues",
                        conds.checked,
                        conds.issues.len()
                    );
                }

                println!();
                println!("Findings:");

                if report.findings.is_empty() {
                    println!("  No findings.");
                }
                for finding in &report.findings {
                    let severity = finding.severity.as_str().to_uppercase();
                    let context = finding
                        .line
                        .map(|line| format!(" line {}", line))
                        .unwrap_or_default();
                    println!(
                        "  [{}/{}]{}: {}",
                        finding.analysis, severity, context, finding.message
                    );
                }
            }
        }
    }

    // Step 4: Exit code based on findings
    if report.has_errors() {
        if !quiet && output == OutputFormat::Text {
            eprintln!(
                "{} error(s), {} warning(s)",
                report.count(FindingSeverity::Error),
                report.count(FindingSeverity::Warning)
            );
        }
        process::exit(1);
    }
}
