//! Logos-based tokenizer for OCL constraint text
//!
//! Fast tokenization using the logos crate. Unrecognized input never stops
//! the tokenizer: it becomes an ILLEGAL token and scanning resumes right
//! after it, so one pass finds every lexical error of a constraint.

use logos::Logos;
use smol_str::SmolStr;

use super::token::{NumberValue, Token, TokenValue};
use super::token_kind::TokenKind;
use crate::base::{LineIndex, SourceReference};
use crate::config::OclOptions;

/// Tokenizer wrapping the logos-generated scanner
///
/// Yields every token of the input followed by exactly one END_OF_TEXT token.
pub struct Tokenizer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    lines: LineIndex<'a>,
    serial: usize,
    emit_comments: bool,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, &OclOptions::default())
    }

    pub fn with_options(input: &'a str, options: &OclOptions) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            lines: LineIndex::new(input),
            serial: 0,
            emit_comments: options.emit_comments,
            finished: false,
        }
    }

    fn source_ref(&self, start: usize, text: &str) -> SourceReference {
        let (line, col_from) = self.lines.line_col(start);
        // A reference stays on one line; block comments keep their first line
        let width = text.chars().take_while(|&c| c != '\n').count();
        let col_to = col_from + width.saturating_sub(1);
        SourceReference::for_token(line, col_from, col_to, self.serial)
    }

    fn end_of_text(&mut self) -> Token {
        let (line, col) = self.lines.line_col(self.inner.source().len());
        let source_ref = SourceReference::for_token(line, col, col, self.serial);
        self.finished = true;
        Token::fixed(TokenKind::END_OF_TEXT, self.serial, source_ref)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(result) = self.inner.next() else {
                return Some(self.end_of_text());
            };
            let text = self.inner.slice();
            let source_ref = self.source_ref(self.inner.span().start, text);

            let token = match result {
                Ok(LogosToken::LineComment | LogosToken::BlockComment) if !self.emit_comments => {
                    continue;
                }
                Ok(LogosToken::UnterminatedText | LogosToken::UnterminatedComment) | Err(()) => {
                    tracing::debug!(
                        "illegal input {:?} at line {}, column {}",
                        text,
                        source_ref.line_no,
                        source_ref.col_from
                    );
                    Token::with_value(TokenValue::Illegal(text.into()), self.serial, source_ref)
                }
                Ok(logos_token) => make_token(logos_token, text, self.serial, source_ref),
            };
            self.serial += 1;
            return Some(token);
        }
    }
}

fn make_token(
    logos_token: LogosToken,
    text: &str,
    serial: usize,
    source_ref: SourceReference,
) -> Token {
    let value = match logos_token {
        LogosToken::Ident => TokenValue::Identifier(text.into()),
        LogosToken::Text => TokenValue::Text(text[1..text.len() - 1].into()),
        LogosToken::Integer | LogosToken::Real => TokenValue::Number(NumberValue {
            value: text.parse().unwrap_or(f64::NAN),
            literal: SmolStr::new(text),
            is_integer: logos_token == LogosToken::Integer,
        }),
        LogosToken::LineComment => TokenValue::Comment(text[2..].trim().into()),
        LogosToken::BlockComment => TokenValue::Comment(text[2..text.len() - 2].trim().into()),
        fixed => return Token::fixed(fixed.into(), serial, source_ref),
    };
    Token::with_value(value, serial, source_ref)
}

/// Tokenize an entire string into a Vec, END_OF_TEXT included
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

/// Tokenize with explicit options
pub fn tokenize_with(input: &str, options: &OclOptions) -> Vec<Token> {
    Tokenizer::with_options(input, options).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum LogosToken {
    // =========================================================================
    // COMMENTS
    // =========================================================================
    #[regex(r"--[^\n]*")]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockComment,

    /// `/*` without a closing `*/`; scanning resumes after the opener
    #[token("/*")]
    UnterminatedComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"'[^'\n]*'")]
    Text,

    /// A string missing its closing quote runs to the end of its line
    #[regex(r"'[^'\n]*")]
    UnterminatedText,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+(\.[0-9]+)?[eE][+-]?[0-9]+|[0-9]+\.[0-9]+")]
    Real,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("::")]
    ColonColon,
    #[token("<>")]
    LtGt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token(".")]
    Dot,

    // =========================================================================
    // KEYWORDS (alphabetical, longest match wins in logos)
    // =========================================================================
    #[token("and")]
    AndKw,
    #[token("attr")]
    AttrKw,
    #[token("body")]
    BodyKw,
    #[token("context")]
    ContextKw,
    #[token("def")]
    DefKw,
    #[token("derive")]
    DeriveKw,
    #[token("else")]
    ElseKw,
    #[token("endif")]
    EndifKw,
    #[token("endpackage")]
    EndpackageKw,
    #[token("if")]
    IfKw,
    #[token("implies")]
    ImpliesKw,
    #[token("in")]
    InKw,
    #[token("init")]
    InitKw,
    #[token("inv")]
    InvKw,
    #[token("let")]
    LetKw,
    #[token("not")]
    NotKw,
    #[token("oper")]
    OperKw,
    #[token("or")]
    OrKw,
    #[token("package")]
    PackageKw,
    #[token("post")]
    PostKw,
    #[token("pre")]
    PreKw,
    #[token("then")]
    ThenKw,
    #[token("xor")]
    XorKw,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Content-bearing
            LineComment | BlockComment => TokenKind::COMMENT,
            UnterminatedComment | UnterminatedText => TokenKind::ILLEGAL,
            Ident => TokenKind::IDENTIFIER,
            Text => TokenKind::TEXT,
            Integer | Real => TokenKind::NUMBER,

            // Multi-char punctuation
            ColonColon => TokenKind::DOUBLE_COLON,
            LtGt => TokenKind::NOT_EQUAL,
            LtEq => TokenKind::LESS_EQUAL,
            GtEq => TokenKind::GREATER_EQUAL,
            Arrow => TokenKind::ARROW,

            // Single-char punctuation
            LParen => TokenKind::O_BRACKET,
            RParen => TokenKind::C_BRACKET,
            LBracket => TokenKind::O_SQ_BRACKET,
            RBracket => TokenKind::C_SQ_BRACKET,
            LBrace => TokenKind::O_BRACE,
            RBrace => TokenKind::C_BRACE,
            Pipe => TokenKind::BAR,
            Comma => TokenKind::COMMA,
            Semicolon => TokenKind::SEMICOLON,
            Colon => TokenKind::COLON,
            Eq => TokenKind::EQUAL,
            Lt => TokenKind::LESS,
            Gt => TokenKind::GREATER,
            Plus => TokenKind::PLUS,
            Minus => TokenKind::MINUS,
            Star => TokenKind::TIMES,
            Slash => TokenKind::SLASH,
            Dot => TokenKind::DOT,

            // Keywords
            AndKw => TokenKind::AND_KW,
            AttrKw => TokenKind::ATTR_KW,
            BodyKw => TokenKind::BODY_KW,
            ContextKw => TokenKind::CONTEXT_KW,
            DefKw => TokenKind::DEF_KW,
            DeriveKw => TokenKind::DERIVE_KW,
            ElseKw => TokenKind::ELSE_KW,
            EndifKw => TokenKind::ENDIF_KW,
            EndpackageKw => TokenKind::ENDPACKAGE_KW,
            IfKw => TokenKind::IF_KW,
            ImpliesKw => TokenKind::IMPLIES_KW,
            InKw => TokenKind::IN_KW,
            InitKw => TokenKind::INIT_KW,
            InvKw => TokenKind::INV_KW,
            LetKw => TokenKind::LET_KW,
            NotKw => TokenKind::NOT_KW,
            OperKw => TokenKind::OPER_KW,
            OrKw => TokenKind::OR_KW,
            PackageKw => TokenKind::PACKAGE_KW,
            PostKw => TokenKind::POST_KW,
            PreKw => TokenKind::PRE_KW,
            ThenKw => TokenKind::THEN_KW,
            XorKw => TokenKind::XOR_KW,
        }
    }
}
