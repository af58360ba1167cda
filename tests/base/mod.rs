//! Source reference tests
//!
//! Merge algebra over column and token ranges.
