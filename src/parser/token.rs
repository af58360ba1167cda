//! Tokens produced by the tokenizer

use smol_str::SmolStr;

use super::token_kind::TokenKind;
use crate::base::SourceReference;
use crate::config::DEFAULT_DENOTATION_LIMIT;

/// A numeric literal: its value plus the text it was written as
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValue {
    pub value: f64,
    pub literal: SmolStr,
    pub is_integer: bool,
}

/// Payload of a content-bearing token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Identifier(SmolStr),
    /// String contents with the quotes stripped
    Text(SmolStr),
    Number(NumberValue),
    /// Comment contents without delimiters, trimmed
    Comment(SmolStr),
    /// The unrecognized input
    Illegal(SmolStr),
}

/// A token with its kind, serial index in the stream and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub serial: usize,
    pub source_ref: SourceReference,
    pub value: Option<TokenValue>,
}

impl Token {
    /// A token of a kind without payload
    pub fn fixed(kind: TokenKind, serial: usize, source_ref: SourceReference) -> Self {
        Self {
            kind,
            serial,
            source_ref,
            value: None,
        }
    }

    /// A content-bearing token; the kind follows from the payload
    pub fn with_value(value: TokenValue, serial: usize, source_ref: SourceReference) -> Self {
        let kind = match &value {
            TokenValue::Identifier(_) => TokenKind::IDENTIFIER,
            TokenValue::Text(_) => TokenKind::TEXT,
            TokenValue::Number(_) => TokenKind::NUMBER,
            TokenValue::Comment(_) => TokenKind::COMMENT,
            TokenValue::Illegal(_) => TokenKind::ILLEGAL,
        };
        Self {
            kind,
            serial,
            source_ref,
            value: Some(value),
        }
    }

    /// The textual payload: identifier name, string contents, number
    /// literal, comment text or illegal input.
    pub fn text(&self) -> Option<&str> {
        match self.value.as_ref()? {
            TokenValue::Identifier(s)
            | TokenValue::Text(s)
            | TokenValue::Comment(s)
            | TokenValue::Illegal(s) => Some(s),
            TokenValue::Number(n) => Some(&n.literal),
        }
    }

    pub fn number(&self) -> Option<&NumberValue> {
        match &self.value {
            Some(TokenValue::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Short human-readable description for diagnostics.
    ///
    /// Payloads longer than the default limit are cut and end in `...`.
    pub fn denotation(&self) -> String {
        self.denotation_with_limit(DEFAULT_DENOTATION_LIMIT)
    }

    pub fn denotation_with_limit(&self, limit: usize) -> String {
        let payload = self.text().map(|s| truncate(s, limit));
        match (self.kind, payload) {
            (TokenKind::TEXT, Some(p)) => format!("string '{p}'"),
            (TokenKind::NUMBER, Some(p)) => format!("number {p}"),
            (TokenKind::COMMENT, Some(_)) => "comment".to_string(),
            (kind, Some(p)) => format!("{kind} \"{p}\""),
            (kind, None) if kind.is_keyword() => format!("keyword {kind}"),
            (kind, None) => kind.to_string(),
        }
    }
}

fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(limit).collect();
        cut.push_str("...");
        cut
    }
}
