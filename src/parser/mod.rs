//! Tokenizer front end for OCL constraint text
//!
//! This module turns normalized constraint text into a token stream:
//! - **logos** for fast scanning
//! - [`TokenKind`] with static lexeme tables for the fixed-form kinds
//! - [`Token`] carrying a serial index and a [`SourceReference`](crate::base::SourceReference)
//!
//! ## Architecture
//!
//! ```text
//! Constraint text
//!     ↓
//! Tokenizer (logos) → Tokens with TokenKind and SourceReference
//!     ↓
//! Grammar (external) → ExpressionBuilder calls
//!     ↓
//! HIR → Typed OCL expression tree
//! ```

mod lexer;
mod token;
mod token_kind;

pub use lexer::{Tokenizer, tokenize, tokenize_with};
pub use token::{NumberValue, Token, TokenValue};
pub use token_kind::TokenKind;
