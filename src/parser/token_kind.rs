//! Token kinds for the OCL tokenizer
//!
//! This enum defines every lexical category the tokenizer produces, together
//! with the two static tables translating fixed lexemes to kinds and back.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// All token kinds of the supported OCL subset
///
/// Content-bearing kinds (identifiers, text, numbers, comments, illegal input)
/// carry a payload on the token and have no unique lexical form. Every other
/// kind except [`TokenKind::END_OF_TEXT`] has exactly one lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // =========================================================================
    // CONTENT-BEARING
    // =========================================================================
    IDENTIFIER,
    TEXT,    // 'quoted'
    NUMBER,  // 42, 2.5, 1e3
    COMMENT, // -- ... or /* ... */
    ILLEGAL,

    // =========================================================================
    // PUNCTUATION AND OPERATORS
    // =========================================================================
    O_BRACKET,     // (
    C_BRACKET,     // )
    O_SQ_BRACKET,  // [
    C_SQ_BRACKET,  // ]
    O_BRACE,       // {
    C_BRACE,       // }
    BAR,           // |
    COMMA,         // ,
    SEMICOLON,     // ;
    COLON,         // :
    DOUBLE_COLON,  // ::
    EQUAL,         // =
    NOT_EQUAL,     // <>
    LESS,          // <
    GREATER,       // >
    LESS_EQUAL,    // <=
    GREATER_EQUAL, // >=
    PLUS,          // +
    MINUS,         // -
    TIMES,         // *
    SLASH,         // /
    DOT,           // .
    ARROW,         // ->

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    AND_KW,
    OR_KW,
    XOR_KW,
    NOT_KW,
    IMPLIES_KW,
    IF_KW,
    THEN_KW,
    ELSE_KW,
    ENDIF_KW,
    LET_KW,
    IN_KW,
    CONTEXT_KW,
    INV_KW,
    ATTR_KW,
    DEF_KW,
    ENDPACKAGE_KW,
    OPER_KW,
    PACKAGE_KW,
    POST_KW,
    PRE_KW,
    INIT_KW,
    DERIVE_KW,
    BODY_KW,

    // =========================================================================
    // SENTINEL
    // =========================================================================
    END_OF_TEXT,
}

/// Every kind with a unique lexeme, paired with that lexeme
const FIXED_FORMS: &[(TokenKind, &str)] = &[
    (TokenKind::O_BRACKET, "("),
    (TokenKind::C_BRACKET, ")"),
    (TokenKind::O_SQ_BRACKET, "["),
    (TokenKind::C_SQ_BRACKET, "]"),
    (TokenKind::O_BRACE, "{"),
    (TokenKind::C_BRACE, "}"),
    (TokenKind::BAR, "|"),
    (TokenKind::COMMA, ","),
    (TokenKind::SEMICOLON, ";"),
    (TokenKind::COLON, ":"),
    (TokenKind::DOUBLE_COLON, "::"),
    (TokenKind::EQUAL, "="),
    (TokenKind::NOT_EQUAL, "<>"),
    (TokenKind::LESS, "<"),
    (TokenKind::GREATER, ">"),
    (TokenKind::LESS_EQUAL, "<="),
    (TokenKind::GREATER_EQUAL, ">="),
    (TokenKind::PLUS, "+"),
    (TokenKind::MINUS, "-"),
    (TokenKind::TIMES, "*"),
    (TokenKind::SLASH, "/"),
    (TokenKind::DOT, "."),
    (TokenKind::ARROW, "->"),
    (TokenKind::AND_KW, "and"),
    (TokenKind::OR_KW, "or"),
    (TokenKind::XOR_KW, "xor"),
    (TokenKind::NOT_KW, "not"),
    (TokenKind::IMPLIES_KW, "implies"),
    (TokenKind::IF_KW, "if"),
    (TokenKind::THEN_KW, "then"),
    (TokenKind::ELSE_KW, "else"),
    (TokenKind::ENDIF_KW, "endif"),
    (TokenKind::LET_KW, "let"),
    (TokenKind::IN_KW, "in"),
    (TokenKind::CONTEXT_KW, "context"),
    (TokenKind::INV_KW, "inv"),
    (TokenKind::ATTR_KW, "attr"),
    (TokenKind::DEF_KW, "def"),
    (TokenKind::ENDPACKAGE_KW, "endpackage"),
    (TokenKind::OPER_KW, "oper"),
    (TokenKind::PACKAGE_KW, "package"),
    (TokenKind::POST_KW, "post"),
    (TokenKind::PRE_KW, "pre"),
    (TokenKind::INIT_KW, "init"),
    (TokenKind::DERIVE_KW, "derive"),
    (TokenKind::BODY_KW, "body"),
];

static KIND_BY_LEXEME: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| FIXED_FORMS.iter().map(|&(kind, s)| (s, kind)).collect());

static LEXEME_BY_KIND: LazyLock<FxHashMap<TokenKind, &'static str>> =
    LazyLock::new(|| FIXED_FORMS.iter().copied().collect());

impl TokenKind {
    /// Look up the kind of a fixed lexeme (operator, punctuation or keyword).
    pub fn from_lexeme(lexeme: &str) -> Option<TokenKind> {
        KIND_BY_LEXEME.get(lexeme).copied()
    }

    /// The unique lexeme of this kind, if it has one.
    pub fn lexeme(self) -> Option<&'static str> {
        LEXEME_BY_KIND.get(&self).copied()
    }

    /// All `(kind, lexeme)` pairs of the fixed-form kinds
    pub fn fixed_forms() -> impl Iterator<Item = (TokenKind, &'static str)> {
        FIXED_FORMS.iter().copied()
    }

    /// Check if tokens of this kind carry a payload
    pub fn is_content_bearing(self) -> bool {
        matches!(
            self,
            Self::IDENTIFIER | Self::TEXT | Self::NUMBER | Self::COMMENT | Self::ILLEGAL
        )
    }

    /// Check if this is a reserved word
    pub fn is_keyword(self) -> bool {
        self >= Self::AND_KW && self <= Self::BODY_KW
    }

    /// Check if this kind has a unique lexeme
    pub fn is_fixed_form(self) -> bool {
        !self.is_content_bearing() && self != Self::END_OF_TEXT
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(lexeme) => write!(f, "\"{lexeme}\""),
            None => {
                let name = match self {
                    Self::IDENTIFIER => "identifier",
                    Self::TEXT => "string",
                    Self::NUMBER => "number",
                    Self::COMMENT => "comment",
                    Self::ILLEGAL => "illegal character",
                    _ => "end of text",
                };
                f.write_str(name)
            }
        }
    }
}
