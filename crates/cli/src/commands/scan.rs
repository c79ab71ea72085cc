use std::path::Path;
use std::process;

use tl_core::{Scanner, Spanned, TokenKind};

use crate::commands::read_source;
use crate::{report_error, OutputFormat};

/// Print every non-whitespace token, one per line. Illegal tokens are
/// printed too; their diagnostics go to stderr and the exit status is 1.
pub(crate) fn cmd_scan(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_source(file, output, quiet);

    let mut scanner = Scanner::new(&src);
    let mut tokens: Vec<Spanned> = Vec::new();
    let mut diagnostics: Vec<String> = Vec::new();
    loop {
        let spanned = scanner.next_spanned();
        let kind = spanned.token.kind;
        if kind == TokenKind::Illegal {
            let detail = scanner.diagnostic().unwrap_or("illegal token");
            diagnostics.push(format!("line {}: {}", spanned.line, detail));
        }
        if kind != TokenKind::Whitespace {
            tokens.push(spanned);
        }
        if kind == TokenKind::Eof {
            break;
        }
    }

    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&tokens)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                for t in &tokens {
                    let kind = format!("{:?}", t.token.kind);
                    println!("{:>4}  {:<14} {}", t.line, kind, t.token.literal);
                }
            }
        }
    }

    if !diagnostics.is_empty() {
        for d in &diagnostics {
            report_error(d, output, quiet);
        }
        process::exit(1);
    }
}
