pub(crate) mod check;
pub(crate) mod identity;
pub(crate) mod parse;
pub(crate) mod scan;

use std::io::Read;
use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

/// Read a schema from `path`, or from stdin when `path` is `-`. Exits with
/// status 1 if it cannot be read.
pub(crate) fn read_source(path: &Path, output: OutputFormat, quiet: bool) -> String {
    let result = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map(|_| buf)
            .map_err(|e| format!("error reading stdin: {}", e))
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("error reading file '{}': {}", path.display(), e))
    };

    match result {
        Ok(src) => src,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}
