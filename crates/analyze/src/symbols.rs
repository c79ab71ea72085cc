//! Symbol index over a parsed program.
//!
//! The checks work from this index instead of re-walking every section: it
//! records which boxed types and which bare constructor names a schema
//! declares, and where.

use serde::Serialize;
use std::collections::BTreeMap;
use tl_core::{Arg, Declaration, FinalKind, Program, Section};

/// Error type for analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("unknown analysis '{name}' (expected one of: {known})")]
    UnknownAnalysis { name: String, known: String },
}

/// Names a schema declares, each mapped to the line of its first
/// declaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    /// Boxed types produced by constructors, builtins and `New`.
    pub boxed_types: BTreeMap<String, u32>,
    /// Constructor and builtin names, usable as bare types.
    pub constructors: BTreeMap<String, u32>,
    pub functions: BTreeMap<String, u32>,
}

impl SymbolTable {
    pub fn from_program(program: &Program) -> Self {
        let mut table = SymbolTable::default();

        for (section, decl) in program.declarations() {
            let line = decl.line();
            match decl {
                Declaration::Combinator(c) if section == Section::Functions => {
                    table
                        .functions
                        .entry(c.id.name().to_owned())
                        .or_insert(line);
                }
                Declaration::Combinator(c) => {
                    table
                        .constructors
                        .entry(c.id.name().to_owned())
                        .or_insert(line);
                    table
                        .boxed_types
                        .entry(c.result.ty.name.clone())
                        .or_insert(line);
                }
                Declaration::Builtin(b) => {
                    table
                        .constructors
                        .entry(b.id.name().to_owned())
                        .or_insert(line);
                    table.boxed_types.entry(b.result.name.clone()).or_insert(line);
                }
                Declaration::Final(f) if f.kind == FinalKind::New => {
                    table.boxed_types.entry(f.ty.name.clone()).or_insert(line);
                }
                Declaration::Final(_) | Declaration::PartialTypeApp(_) => {}
            }
        }

        table
    }

    pub fn has_boxed_type(&self, name: &str) -> bool {
        self.boxed_types.contains_key(name)
    }

    pub fn has_constructor(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }
}

/// All arguments in declaration order, with the contents of repeated
/// groups following the group itself.
pub fn flatten_args(args: &[Arg]) -> Vec<&Arg> {
    let mut out = Vec::new();
    for arg in args {
        out.push(arg);
        if let Arg::Repeated { args: inner, .. } = arg {
            out.extend(flatten_args(inner));
        }
    }
    out
}
