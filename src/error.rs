use std::fmt;

use crate::decl::Location;

/// Fatal errors: the run stops and no symbol is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Two function declarations share the same raw name.
    DuplicateRawName {
        name: String,
        first: Location,
        second: Location,
    },
    /// A rule pattern is empty or is not an identifier (prefix).
    InvalidPattern { pattern: String, reason: String },
    /// A `Rename` or `KeepMethod` directive names something that is not an identifier.
    InvalidDirective { pattern: String, reason: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRawName {
                name,
                first,
                second,
            } => write!(
                f,
                "duplicate function `{name}`: declared at {first} and again at {second}"
            ),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid rule pattern `{pattern}`: {reason}")
            }
            Self::InvalidDirective { pattern, reason } => {
                write!(f, "invalid directive for `{pattern}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Recoverable problems, recorded next to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A method directive points at a type that is not declared, so the
    /// symbol stays a plain function.
    UnknownRuleTarget { symbol: String, target: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRuleTarget { symbol, target } if target.is_empty() => write!(
                f,
                "`{symbol}` asks for a method but has no owner type, kept as function"
            ),
            Self::UnknownRuleTarget { symbol, target } => write!(
                f,
                "`{symbol}` targets unknown type `{target}`, kept as function"
            ),
        }
    }
}
