use serde::{Deserialize, Serialize};

/// Default maximum number of errors collected in recovering mode.
pub const DEFAULT_MAX_ERRORS: usize = 10;

/// What to do when a declared signature disagrees with the computed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityCheck {
    /// Record an identity-mismatch error.
    #[default]
    Strict,
    /// Record a warning and keep the declared signature.
    Warn,
    /// Trust the declared signature without comparing.
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub identity_check: IdentityCheck,
    /// Keep parsing after an error, resynchronizing at the next `;`.
    pub recover: bool,
    /// Upper bound on errors collected when `recover` is set.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            identity_check: IdentityCheck::Strict,
            recover: false,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}
