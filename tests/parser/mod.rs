//! Tokenizer tests
//!
//! Token streams, lexeme tables and denotations.
