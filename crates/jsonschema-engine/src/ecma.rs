//! Best-effort translation of ECMA 262 patterns into the Rust regex syntax.
use std::borrow::Cow;

use regex_syntax::ast::{self, parse::Parser, Ast, ClassPerl, ClassPerlKind, ClassSetItem, ErrorKind, Span, Visitor};

const DIGIT: (&str, &str) = ("[0-9]", "[^0-9]");
const WORD: (&str, &str) = ("[A-Za-z0-9_]", "[^A-Za-z0-9_]");
// ECMA 262 white space and line terminators
const SPACE: (&str, &str) = (
    "[ \t\n\r\u{000b}\u{000c}\u{00a0}\u{1680}\u{2000}-\u{200a}\u{2028}\u{2029}\u{202f}\u{205f}\u{3000}\u{feff}]",
    "[^ \t\n\r\u{000b}\u{000c}\u{00a0}\u{1680}\u{2000}-\u{200a}\u{2028}\u{2029}\u{202f}\u{205f}\u{3000}\u{feff}]",
);

/// Rewrites `pattern` so that Rust engines give it ECMA 262 semantics.
///
/// Perl classes are ASCII-only in ECMA 262 (`\d`, `\w`) and `\cX` is a control character escape.
/// Patterns with look-arounds or backreferences are returned as they are, they are only
/// understood by `fancy-regex`.
pub(crate) fn to_rust_regex(pattern: &str) -> Result<Cow<'_, str>, ()> {
    let mut pattern = Cow::Borrowed(pattern);
    let mut ast = loop {
        match Parser::new().parse(&pattern) {
            Ok(ast) => break ast,
            Err(error) if *error.kind() == ErrorKind::EscapeUnrecognized => {
                let span = error.span();
                let (start, end) = (span.start.offset, span.end.offset);
                let control = match &pattern[start..end] {
                    r"\c" => pattern[end..]
                        .chars()
                        .next()
                        .filter(char::is_ascii_alphabetic)
                        .map(|letter| ((letter as u8) % 32) as char),
                    _ => None,
                };
                let Some(control) = control else {
                    return Err(());
                };
                let mut buffer = [0; 4];
                pattern
                    .to_mut()
                    .replace_range(start..=end, control.encode_utf8(&mut buffer));
            }
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::UnsupportedLookAround | ErrorKind::UnsupportedBackreference
                ) =>
            {
                return Ok(pattern);
            }
            Err(_) => return Err(()),
        }
    };
    loop {
        let (rewritten, changed) = ast::visit(&ast, Rewriter::new(pattern)).map_err(|_| ())?;
        pattern = rewritten;
        if !changed {
            return Ok(pattern);
        }
        ast = Parser::new().parse(&pattern).map_err(|_| ())?;
    }
}

/// Replaces the first Perl class it meets. Spans are only valid for the unmodified pattern,
/// so each pass makes at most one replacement and the caller parses again.
struct Rewriter<'a> {
    pattern: Cow<'a, str>,
    changed: bool,
}

impl<'a> Rewriter<'a> {
    fn new(pattern: Cow<'a, str>) -> Self {
        Self {
            pattern,
            changed: false,
        }
    }

    fn substitute(&mut self, span: Span, replacement: &str) {
        self.pattern
            .to_mut()
            .replace_range(span.start.offset..span.end.offset, replacement);
        self.changed = true;
    }

    fn rewrite_class(&mut self, class: &ClassPerl) {
        if self.changed {
            return;
        }
        let (positive, negative) = match class.kind {
            ClassPerlKind::Digit => DIGIT,
            ClassPerlKind::Word => WORD,
            ClassPerlKind::Space => SPACE,
        };
        self.substitute(class.span, if class.negated { negative } else { positive });
    }
}

impl<'a> Visitor for Rewriter<'a> {
    type Output = (Cow<'a, str>, bool);
    type Err = ast::Error;

    fn finish(self) -> Result<Self::Output, Self::Err> {
        Ok((self.pattern, self.changed))
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), Self::Err> {
        if let ClassSetItem::Perl(class) = item {
            self.rewrite_class(class);
        }
        Ok(())
    }

    fn visit_post(&mut self, ast: &Ast) -> Result<(), Self::Err> {
        match ast {
            Ast::ClassPerl(class) => self.rewrite_class(class),
            // `\a` does not exist in ECMA 262
            Ast::Literal(literal)
                if matches!(
                    literal.kind,
                    ast::LiteralKind::Special(ast::SpecialLiteralKind::Bell)
                ) =>
            {
                return Parser::new().parse("[").map(|_| ());
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r"\d", "[0-9]"; "digit")]
    #[test_case(r"\D", "[^0-9]"; "non-digit")]
    #[test_case(r"\w", "[A-Za-z0-9_]"; "word")]
    #[test_case(r"[\W]", "[[^A-Za-z0-9_]]"; "negated word in a set")]
    #[test_case(r"^\d+-\w*$", "^[0-9]+-[A-Za-z0-9_]*$"; "several classes")]
    #[test_case(r"\cJ", "\n"; "control character")]
    #[test_case(r"a\cab", "a\x01b"; "lowercase control character")]
    #[test_case(r"(?=a)b", "(?=a)b"; "look-around is kept")]
    #[test_case("plain", "plain"; "nothing to rewrite")]
    fn translates(input: &str, expected: &str) {
        assert_eq!(to_rust_regex(input).expect("Valid pattern"), expected);
    }

    #[test_case(r"\c"; "incomplete control character")]
    #[test_case(r"\c?"; "invalid control character")]
    #[test_case(r"[a-z"; "unclosed class")]
    #[test_case(r"(abc"; "unclosed group")]
    #[test_case(r"\a"; "bell escape")]
    fn rejects(input: &str) {
        assert!(to_rust_regex(input).is_err());
    }
}
