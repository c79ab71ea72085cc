use std::process;

use crate::{report_tl_error, OutputFormat};

pub(crate) fn cmd_identity(declaration: &str, output: OutputFormat, quiet: bool) {
    match tl_core::identity_of(declaration) {
        Ok(identity) => match output {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "declaration": declaration.trim(),
                    "identity": identity,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
                );
            }
            OutputFormat::Text => println!("{}", identity),
        },
        Err(e) => {
            report_tl_error(&e, output, quiet);
            process::exit(1);
        }
    }
}
