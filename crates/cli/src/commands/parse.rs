use std::collections::BTreeMap;
use std::path::Path;
use std::process;

use tl_core::{
    canonical_text, format_identity, parse_with, Declaration, FinalKind, ParseOptions,
    ParseOutcome, Program, Section, TlError, TypeExpr,
};

use crate::commands::read_source;
use crate::{report_tl_error, OutputFormat};

const SECTIONS: [Section; 3] = [Section::Constructors, Section::Functions, Section::Types];

pub(crate) fn cmd_parse(
    file: &Path,
    options: &ParseOptions,
    lines: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let src = read_source(file, output, quiet);
    let failed = if lines {
        parse_lines(&src, options, output, quiet)
    } else {
        parse_document(&src, options, output, quiet)
    };
    if failed {
        process::exit(1);
    }
}

/// Parse `src` as one document. Returns whether any error was recorded.
fn parse_document(src: &str, options: &ParseOptions, output: OutputFormat, quiet: bool) -> bool {
    let outcome = parse_with(src, options);

    match output {
        OutputFormat::Json => {
            if !quiet {
                let json = outcome_json(&outcome, None);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json)
                        .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e))
                );
            }
        }
        OutputFormat::Text => {
            print_warnings(&outcome.warnings, quiet);
            if outcome.is_ok() && !quiet {
                print_summary(&outcome.program);
            }
        }
    }
    for e in &outcome.errors {
        report_tl_error(e, output, quiet);
    }

    !outcome.is_ok()
}

/// Parse every non-empty line as its own document, reporting errors with
/// their line in `src`. Returns whether any line failed.
fn parse_lines(src: &str, options: &ParseOptions, output: OutputFormat, quiet: bool) -> bool {
    let mut failed = false;
    let mut results = Vec::new();

    for (index, text) in src.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let line = index as u32 + 1;
        let mut outcome = parse_with(text, options);
        let offset = |e: TlError| e.offset_lines(line - 1);
        outcome.errors = outcome.errors.into_iter().map(offset).collect();
        outcome.warnings = outcome.warnings.into_iter().map(offset).collect();
        failed |= !outcome.is_ok();

        match output {
            OutputFormat::Json => results.push(outcome_json(&outcome, Some(line))),
            OutputFormat::Text => {
                print_warnings(&outcome.warnings, quiet);
                if !quiet {
                    for (_, decl) in outcome.program.declarations() {
                        println!("{:>4}: {}", line, describe(decl));
                    }
                }
                for e in &outcome.errors {
                    report_tl_error(e, output, quiet);
                }
            }
        }
    }

    if output == OutputFormat::Json && !quiet {
        println!(
            "{}",
            serde_json::to_string_pretty(&results)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e))
        );
    }
    failed
}

fn outcome_json(outcome: &ParseOutcome, line: Option<u32>) -> serde_json::Value {
    let mut json = serde_json::json!({
        "program": outcome.program,
        "errors": outcome.errors.iter().map(TlError::to_json_value).collect::<Vec<_>>(),
        "warnings": outcome.warnings.iter().map(TlError::to_json_value).collect::<Vec<_>>(),
    });
    if let Some(line) = line {
        json["line"] = serde_json::json!(line);
    }
    json
}

fn print_warnings(warnings: &[TlError], quiet: bool) {
    if quiet {
        return;
    }
    for w in warnings {
        eprintln!("warning: {}", w);
    }
}

fn print_summary(program: &Program) {
    let counts: Vec<String> = SECTIONS
        .iter()
        .map(|s| format!("{} {}", program.section(*s).len(), s.as_str()))
        .collect();
    println!(
        "Parsed {} declaration(s): {}",
        program.len(),
        counts.join(", ")
    );

    let namespaces = namespace_counts(program);
    if !namespaces.is_empty() {
        let list: Vec<String> = namespaces
            .iter()
            .map(|(ns, n)| format!("{} ({})", ns, n))
            .collect();
        println!("Namespaces: {}", list.join(", "));
    }

    for section in SECTIONS {
        let decls = program.section(section);
        if decls.is_empty() {
            continue;
        }
        println!();
        println!("{}:", section.as_str());
        for decl in decls {
            println!("  {}", describe(decl));
        }
    }
}

/// Combinators per namespace, e.g. `messages.sendMessage` counts for
/// `messages`.
fn namespace_counts(program: &Program) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for (_, decl) in program.declarations() {
        if let Some(ns) = decl.combinator_id().and_then(|id| id.ident.namespace()) {
            *counts.entry(ns).or_insert(0) += 1;
        }
    }
    counts
}

/// One display line: `#identity canonical text` for combinators, the
/// declaration itself for type-level ones.
fn describe(decl: &Declaration) -> String {
    match decl {
        Declaration::Combinator(_) | Declaration::Builtin(_) => {
            let identity = decl
                .identity()
                .map(format_identity)
                .unwrap_or_else(|| "--------".to_string());
            let text = canonical_text(decl).unwrap_or_default();
            format!("#{}  {}", identity, text)
        }
        Declaration::PartialTypeApp(d) => {
            let args: Vec<String> = d
                .args
                .iter()
                .map(|a| match a {
                    TypeExpr::Apply { .. } => format!("({})", a),
                    _ => a.to_string(),
                })
                .collect();
            format!("{} {}", d.ty.name, args.join(" "))
        }
        Declaration::Final(d) => {
            let kind = match d.kind {
                FinalKind::New => "New",
                FinalKind::Final => "Final",
                FinalKind::Empty => "Empty",
            };
            format!("{} {}", kind, d.ty.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(src: &str) -> Declaration {
        let (program, err) = tl_core::parse(src);
        assert_eq!(err, None);
        let decl = program.declarations().next().map(|(_, d)| d.clone());
        decl.unwrap()
    }

    #[test]
    fn describe_combinator() {
        assert_eq!(
            describe(&first("boolTrue = Bool;")),
            "#997275b5  boolTrue = Bool"
        );
        assert_eq!(describe(&first("int ?= Int;")), "#a8509bda  int ? = Int");
    }

    #[test]
    fn namespaces_are_counted() {
        let src = "\
users.user id:int = users.User;
users.empty = users.User;
ping = Pong;
---functions---
messages.get = Pong;
";
        let (program, err) = tl_core::parse(src);
        assert_eq!(err, None);
        let counts: Vec<(&str, usize)> = namespace_counts(&program).into_iter().collect();
        assert_eq!(counts, vec![("messages", 1), ("users", 2)]);
    }

    #[test]
    fn describe_type_declarations() {
        assert_eq!(describe(&first("--- functions ---\n--- types ---\nNew Foo;")), "New Foo");
        assert_eq!(
            describe(&first("--- functions ---\n--- types ---\nVector (List int);")),
            "Vector (List int)"
        );
    }
}
