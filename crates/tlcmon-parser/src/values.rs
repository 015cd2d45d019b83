//! TLA+ value literal parser
//!
//! Parses the values TLC prints in error-trace states:
//!
//! - `TRUE`, `FALSE`, integers, `"strings"`, model values (`p1`)
//! - sets `{1, 2}`, sequences `<<a, b>>`
//! - records `[pc |-> "Lbl_1", x |-> 0]`
//! - functions `(p1 :> 0 @@ p2 :> 1)` (outer parens optional)
//!
//! Anything else becomes [`Value::Raw`] holding the input text.

use tlcmon_core::Value;
use tracing::trace;

use crate::traits::ValueParser;

/// Deepest value nesting parsed structurally; deeper text stays raw
pub const MAX_DEPTH: usize = 256;

/// Default [`ValueParser`] for TLC's value syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct TlaValueParser;

impl ValueParser for TlaValueParser {
    fn parse_value(&self, lines: &[String]) -> Value {
        parse_value_lines(lines)
    }
}

/// Parse the (already split) text of one value
pub fn parse_value_lines(lines: &[String]) -> Value {
    let text = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    parse_value_text(&text)
}

/// Parse a single-line value
pub fn parse_value_text(text: &str) -> Value {
    let parsed = tokenize(text).and_then(|tokens| {
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let value = parser.expr()?;
        parser.at_end().then_some(value)
    });
    parsed.unwrap_or_else(|| {
        trace!("Keeping unparsed value: {}", text);
        Value::Raw(text.to_string())
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LSeq,
    RSeq,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    MapsTo,
    SingletonFn,
    Compose,
    Str(String),
    Int(i64),
    Ident(String),
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        let rest = &text[i..];
        let (token, len) = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '{' => (Token::LBrace, 1),
            '}' => (Token::RBrace, 1),
            '[' => (Token::LBracket, 1),
            ']' => (Token::RBracket, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            ',' => (Token::Comma, 1),
            _ if rest.starts_with("<<") => (Token::LSeq, 2),
            _ if rest.starts_with(">>") => (Token::RSeq, 2),
            _ if rest.starts_with("|->") => (Token::MapsTo, 3),
            _ if rest.starts_with(":>") => (Token::SingletonFn, 2),
            _ if rest.starts_with("@@") => (Token::Compose, 2),
            '"' => {
                let (s, len) = read_string(rest)?;
                (Token::Str(s), len)
            }
            c if c.is_ascii_digit() || (c == '-' && next_is_digit(rest)) => {
                let len = rest
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map_or(rest.len(), |(j, _)| j);
                (Token::Int(rest[..len].parse().ok()?), len)
            }
            c if c.is_alphanumeric() || c == '_' => {
                let len = rest
                    .char_indices()
                    .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                    .map_or(rest.len(), |(j, _)| j);
                (Token::Ident(rest[..len].to_string()), len)
            }
            _ => return None,
        };
        tokens.push(token);
        while chars.peek().is_some_and(|&(j, _)| j < i + len) {
            chars.next();
        }
    }

    Some(tokens)
}

fn next_is_digit(rest: &str) -> bool {
    rest[1..].starts_with(|c: char| c.is_ascii_digit())
}

/// Read a quoted string starting at `rest[0] == '"'`; returns the unescaped
/// content and the byte length including both quotes
fn read_string(rest: &str) -> Option<(String, usize)> {
    let mut out = String::new();
    let mut chars = rest.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, i + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            other => out.push(other),
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Option<()> {
        self.eat(expected).then_some(())
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// One nested value; fails past [`MAX_DEPTH`]
    fn expr(&mut self) -> Option<Value> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = self.function_or_atom();
        self.depth -= 1;
        value
    }

    /// `atom` or `atom :> atom (@@ atom :> atom)*`
    fn function_or_atom(&mut self) -> Option<Value> {
        let first = self.atom()?;
        if !self.eat(&Token::SingletonFn) {
            return Some(first);
        }
        let mut pairs = vec![(first, self.atom()?)];
        while self.eat(&Token::Compose) {
            let key = self.atom()?;
            self.expect(&Token::SingletonFn)?;
            pairs.push((key, self.atom()?));
        }
        Some(Value::Function(pairs))
    }

    fn atom(&mut self) -> Option<Value> {
        match self.next()? {
            Token::LBrace => Some(Value::Set(self.list(&Token::RBrace)?)),
            Token::LSeq => Some(Value::Sequence(self.list(&Token::RSeq)?)),
            Token::LBracket => self.record(),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Some(inner)
            }
            Token::Str(s) => Some(Value::Str(s)),
            Token::Int(n) => Some(Value::Int(n)),
            Token::Ident(id) => Some(match id.as_str() {
                "TRUE" => Value::Bool(true),
                "FALSE" => Value::Bool(false),
                _ => Value::Name(id),
            }),
            _ => None,
        }
    }

    /// Comma-separated values up to `close`
    fn list(&mut self, close: &Token) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Some(items);
        }
        loop {
            items.push(self.expr()?);
            if self.eat(close) {
                return Some(items);
            }
            self.expect(&Token::Comma)?;
        }
    }

    /// `[f |-> v, ...]` after the opening bracket
    fn record(&mut self) -> Option<Value> {
        let mut fields = Vec::new();
        if self.eat(&Token::RBracket) {
            return Some(Value::Record(fields));
        }
        loop {
            let Token::Ident(name) = self.next()? else {
                return None;
            };
            self.expect(&Token::MapsTo)?;
            fields.push((name, self.expr()?));
            if self.eat(&Token::RBracket) {
                return Some(Value::Record(fields));
            }
            self.expect(&Token::Comma)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Value {
        Value::Name(s.to_string())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_value_text("TRUE"), Value::Bool(true));
        assert_eq!(parse_value_text("FALSE"), Value::Bool(false));
        assert_eq!(parse_value_text("42"), Value::Int(42));
        assert_eq!(parse_value_text("-7"), Value::Int(-7));
        assert_eq!(parse_value_text("p1"), name("p1"));
        assert_eq!(
            parse_value_text(r#""say \"hi\"""#),
            Value::Str("say \"hi\"".to_string())
        );
    }

    #[test]
    fn test_collections() {
        assert_eq!(parse_value_text("{}"), Value::Set(vec![]));
        assert_eq!(parse_value_text("<<>>"), Value::Sequence(vec![]));
        assert_eq!(
            parse_value_text("{1, 2, 3}"),
            Value::Set(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            parse_value_text(r#"<<"a", <<1>>>>"#),
            Value::Sequence(vec![
                Value::Str("a".to_string()),
                Value::Sequence(vec![Value::Int(1)])
            ])
        );
    }

    #[test]
    fn test_record() {
        assert_eq!(
            parse_value_text(r#"[pc |-> "Lbl_1", stack |-> <<>>]"#),
            Value::Record(vec![
                ("pc".to_string(), Value::Str("Lbl_1".to_string())),
                ("stack".to_string(), Value::Sequence(vec![])),
            ])
        );
    }

    #[test]
    fn test_function_with_and_without_parens() {
        let expected = Value::Function(vec![
            (name("p1"), Value::Int(0)),
            (name("p2"), Value::Set(vec![name("m1")])),
        ]);
        assert_eq!(parse_value_text("(p1 :> 0 @@ p2 :> {m1})"), expected);
        assert_eq!(parse_value_text("p1 :> 0 @@ p2 :> {m1}"), expected);
    }

    #[test]
    fn test_multiline_value() {
        let lines = vec![
            "<< [id |-> 1, ok |-> TRUE],".to_string(),
            "   [id |-> 2, ok |-> FALSE] >>".to_string(),
            "".to_string(),
        ];
        let value = parse_value_lines(&lines);
        assert_eq!(value.len(), 2);
        assert_eq!(
            value.to_string(),
            "<<[id |-> 1, ok |-> TRUE], [id |-> 2, ok |-> FALSE]>>"
        );
    }

    #[test]
    fn test_unparseable_is_raw() {
        assert_eq!(
            parse_value_text("1..3 \\cup S"),
            Value::Raw("1..3 \\cup S".to_string())
        );
        assert_eq!(
            parse_value_text("{1, 2"),
            Value::Raw("{1, 2".to_string())
        );
        assert_eq!(
            parse_value_text("\"open"),
            Value::Raw("\"open".to_string())
        );
    }

    fn nested_sets(depth: usize) -> String {
        format!("{}1{}", "{".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn test_nesting_up_to_limit_is_parsed() {
        let value = parse_value_text(&nested_sets(MAX_DEPTH - 1));

        let mut depth = 0;
        let mut current = &value;
        while let Value::Set(items) = current {
            depth += 1;
            current = &items[0];
        }
        assert_eq!(depth, MAX_DEPTH - 1);
        assert_eq!(*current, Value::Int(1));
    }

    #[test]
    fn test_deep_nesting_stays_raw() {
        let text = nested_sets(200_000);
        assert_eq!(parse_value_text(&text), Value::Raw(text));

        let text = nested_sets(MAX_DEPTH);
        assert_eq!(parse_value_text(&text), Value::Raw(text));
    }

    #[test]
    fn test_trait_impl_joins_lines() {
        let parser = TlaValueParser;
        let value = parser.parse_value(&["{a,".to_string(), "  b}".to_string()]);
        assert_eq!(value, Value::Set(vec![name("a"), name("b")]));
    }
}
