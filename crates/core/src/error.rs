use serde::Serialize;

/// A scan, parse or identity-validation error.
///
/// Lexical errors come from illegal tokens, structural errors from the
/// grammar, and identity mismatches from a declared signature that disagrees
/// with the checksum of the declaration's canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TlError {
    #[error("line {line}: {message}")]
    Lexical { line: u32, message: String },

    #[error("line {line}: {message}")]
    Structural { line: u32, message: String },

    #[error(
        "line {line}: identity mismatch for '{combinator}': declared #{declared:08x}, computed #{computed:08x}"
    )]
    IdentityMismatch {
        line: u32,
        combinator: String,
        declared: u32,
        computed: u32,
    },
}

impl TlError {
    pub fn lexical(line: u32, message: impl Into<String>) -> Self {
        TlError::Lexical {
            line,
            message: message.into(),
        }
    }

    pub fn structural(line: u32, message: impl Into<String>) -> Self {
        TlError::Structural {
            line,
            message: message.into(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            TlError::Lexical { line, .. }
            | TlError::Structural { line, .. }
            | TlError::IdentityMismatch { line, .. } => *line,
        }
    }

    /// The same error reported `offset` lines further down, for documents
    /// cut out of a larger file.
    pub fn offset_lines(mut self, offset: u32) -> Self {
        match &mut self {
            TlError::Lexical { line, .. }
            | TlError::Structural { line, .. }
            | TlError::IdentityMismatch { line, .. } => *line += offset,
        }
        self
    }

    /// Short kind name, as used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            TlError::Lexical { .. } => "lexical",
            TlError::Structural { .. } => "structural",
            TlError::IdentityMismatch { .. } => "identity_mismatch",
        }
    }

    pub fn is_identity_mismatch(&self) -> bool {
        matches!(self, TlError::IdentityMismatch { .. })
    }

    /// Serialize to JSON. Always includes `kind`, `line` and the rendered
    /// `message`, whatever the variant.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "kind":    self.kind(),
            "line":    self.line(),
            "message": self.to_string(),
        });
        if let TlError::IdentityMismatch {
            combinator,
            declared,
            computed,
            ..
        } = self
        {
            value["combinator"] = serde_json::json!(combinator);
            value["declared"] = serde_json::json!(format!("{:08x}", declared));
            value["computed"] = serde_json::json!(format!("{:08x}", computed));
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_pads_identities() {
        let e = TlError::IdentityMismatch {
            line: 3,
            combinator: "user".into(),
            declared: 0xdecafbad,
            computed: 0x0000beef,
        };
        assert_eq!(
            e.to_string(),
            "line 3: identity mismatch for 'user': declared #decafbad, computed #0000beef"
        );
        let json = e.to_json_value();
        assert_eq!(json["kind"], "identity_mismatch");
        assert_eq!(json["computed"], "0000beef");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn structural_json_has_message() {
        let e = TlError::structural(7, "expected ';'");
        let json = e.to_json_value();
        assert_eq!(json["kind"], "structural");
        assert_eq!(json["message"], "line 7: expected ';'");
        assert!(json.get("combinator").is_none());
    }

    #[test]
    fn offset_moves_the_line() {
        let e = TlError::lexical(1, "unexpected '@'").offset_lines(41);
        assert_eq!(e.line(), 42);
        assert_eq!(e.to_string(), "line 42: unexpected '@'");
    }
}
