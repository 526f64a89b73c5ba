//! Regular expression engines behind `pattern`, `patternProperties` and the `regex` format.
use std::fmt;

use regex_syntax::ast::{parse::Parser, ErrorKind};

use crate::ecma;

/// Which regular expression semantics patterns follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegexEngine {
    /// Rust `regex` syntax. Patterns with look-arounds or backreferences are handled by
    /// `fancy-regex`.
    #[default]
    Native,
    /// ECMA 262 semantics: ASCII-only Perl classes and `\cX` escapes.
    Ecma,
}

/// A compiled pattern.
#[derive(Clone)]
pub(crate) enum Regex {
    Linear(regex::Regex),
    Backtracking(fancy_regex::Regex),
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl Regex {
    /// Unanchored search. A backtracking limit hit counts as no match.
    pub(crate) fn is_match(&self, input: &str) -> bool {
        match self {
            Regex::Linear(regex) => regex.is_match(input),
            Regex::Backtracking(regex) => regex.is_match(input).unwrap_or(false),
        }
    }
    pub(crate) fn as_str(&self) -> &str {
        match self {
            Regex::Linear(regex) => regex.as_str(),
            Regex::Backtracking(regex) => regex.as_str(),
        }
    }
}

fn needs_backtracking(pattern: &str) -> bool {
    matches!(
        Parser::new().parse(pattern).map_err(|error| error.kind().clone()),
        Err(ErrorKind::UnsupportedLookAround | ErrorKind::UnsupportedBackreference)
    )
}

fn compile_rust(pattern: &str) -> Result<Regex, String> {
    if needs_backtracking(pattern) {
        fancy_regex::Regex::new(pattern)
            .map(Regex::Backtracking)
            .map_err(|error| error.to_string())
    } else {
        regex::Regex::new(pattern)
            .map(Regex::Linear)
            .map_err(|error| error.to_string())
    }
}

impl RegexEngine {
    /// Compile `pattern` under this engine's semantics.
    pub(crate) fn compile(self, pattern: &str) -> Result<Regex, String> {
        match self {
            RegexEngine::Native => compile_rust(pattern),
            RegexEngine::Ecma => {
                let translated = ecma::to_rust_regex(pattern)
                    .map_err(|()| format!("'{pattern}' is not an ECMA 262 regular expression"))?;
                compile_rust(&translated)
            }
        }
    }
}
