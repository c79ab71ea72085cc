//! Identity collisions and duplicate combinator names.
//!
//! Identities are what a decoder dispatches on, so two distinct combinators
//! may never share one, and a name may appear only once per section.

use serde::Serialize;
use std::collections::BTreeMap;
use tl_core::{format_identity, Program, Section};

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateName {
    pub name: String,
    pub section: Section,
    pub lines: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityCollision {
    pub identity: String,
    /// `(name, line)` of every combinator carrying the identity.
    pub combinators: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentitiesResult {
    pub checked: usize,
    pub duplicate_names: Vec<DuplicateName>,
    pub collisions: Vec<IdentityCollision>,
}

pub fn analyze_identities(program: &Program) -> IdentitiesResult {
    let mut names: BTreeMap<(Section, &str), Vec<u32>> = BTreeMap::new();
    let mut by_identity: BTreeMap<u32, Vec<(&str, u32)>> = BTreeMap::new();
    let mut checked = 0;

    for (section, decl) in program.declarations() {
        let Some(id) = decl.combinator_id() else {
            continue;
        };
        checked += 1;
        names
            .entry((section, id.name()))
            .or_default()
            .push(decl.line());
        if let Some(identity) = id.identity {
            by_identity
                .entry(identity)
                .or_default()
                .push((id.name(), decl.line()));
        }
    }

    let duplicate_names = names
        .into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|((section, name), lines)| DuplicateName {
            name: name.to_owned(),
            section,
            lines,
        })
        .collect();

    let collisions = by_identity
        .into_iter()
        .filter(|(_, users)| users.iter().any(|(name, _)| *name != users[0].0))
        .map(|(identity, users)| IdentityCollision {
            identity: format_identity(identity),
            combinators: users
                .into_iter()
                .map(|(name, line)| (name.to_owned(), line))
                .collect(),
        })
        .collect();

    IdentitiesResult {
        checked,
        duplicate_names,
        collisions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::{parse_with, IdentityCheck, ParseOptions};

    fn lenient(src: &str) -> Program {
        let options = ParseOptions {
            identity_check: IdentityCheck::Off,
            ..ParseOptions::default()
        };
        let outcome = parse_with(src, &options);
        assert!(outcome.is_ok(), "{:?}", outcome.errors);
        outcome.program
    }

    #[test]
    fn distinct_combinators_are_clean() {
        let result = analyze_identities(&lenient("boolTrue = Bool;\nboolFalse = Bool;"));
        assert_eq!(result.checked, 2);
        assert!(result.duplicate_names.is_empty());
        assert!(result.collisions.is_empty());
    }

    #[test]
    fn duplicate_name_in_one_section() {
        let result = analyze_identities(&lenient("user id:int = User;\nuser id:long = User;"));
        assert_eq!(result.duplicate_names.len(), 1);
        assert_eq!(result.duplicate_names[0].name, "user");
        assert_eq!(result.duplicate_names[0].lines, vec![1, 2]);
        assert!(result.collisions.is_empty());
    }

    #[test]
    fn same_name_in_different_sections_is_allowed() {
        let result =
            analyze_identities(&lenient("ping = Pong;\n--- functions ---\nping = Pong;"));
        assert!(result.duplicate_names.is_empty());
    }

    #[test]
    fn signatures_can_collide() {
        let result = analyze_identities(&lenient("a#0000002a = A;\nb#0000002a = B;"));
        assert_eq!(result.collisions.len(), 1);
        assert_eq!(result.collisions[0].identity, "0000002a");
        assert_eq!(
            result.collisions[0].combinators,
            vec![("a".to_owned(), 1), ("b".to_owned(), 2)]
        );
    }
}
