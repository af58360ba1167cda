//! Position tracking for tokens and AST nodes
//!
//! A reference covers an inclusive column range on one line plus the inclusive
//! range of token serials it was built from. Composite nodes collect several
//! references in a sorted list so a diagnostic can underline exactly the
//! pieces of text a construct was assembled from, gaps included.

use std::fmt;

use super::error::SpanError;

/// Where another reference lies relative to this one.
///
/// The numeric form (see [`RelativePosition::value`]) runs from `-2`
/// (entirely before) to `2` (entirely after).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelativePosition {
    /// Ends at least one position before this range starts
    Before,
    /// Ends exactly one position before this range starts
    AdjacentBefore,
    /// Shares at least one position with this range
    Overlapping,
    /// Starts exactly one position after this range ends
    AdjacentAfter,
    /// Starts at least two positions after this range ends
    After,
}

impl RelativePosition {
    pub fn value(self) -> i8 {
        match self {
            Self::Before => -2,
            Self::AdjacentBefore => -1,
            Self::Overlapping => 0,
            Self::AdjacentAfter => 1,
            Self::After => 2,
        }
    }

    /// Overlapping or touching ranges can be merged into one.
    pub fn is_mergeable(self) -> bool {
        self.value().abs() <= 1
    }
}

/// A range in source text (all fields 0-indexed, all ranges inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceReference {
    pub line_no: usize,
    pub col_from: usize,
    pub col_to: usize,
    pub tok_from: usize,
    pub tok_to: usize,
}

impl SourceReference {
    pub fn new(
        line_no: usize,
        col_from: usize,
        col_to: usize,
        tok_from: usize,
        tok_to: usize,
    ) -> Self {
        Self {
            line_no,
            col_from,
            col_to,
            tok_from,
            tok_to,
        }
    }

    /// Reference for a single token spanning `col_from..=col_to`
    pub fn for_token(line_no: usize, col_from: usize, col_to: usize, serial: usize) -> Self {
        Self::new(line_no, col_from, col_to, serial, serial)
    }

    fn bounds(&self, by_token: bool) -> (usize, usize) {
        if by_token {
            (self.tok_from, self.tok_to)
        } else {
            (self.col_from, self.col_to)
        }
    }

    /// Classify where `other` lies relative to `self`.
    ///
    /// References on different lines are never adjacent: they always come out
    /// as [`RelativePosition::Before`] or [`RelativePosition::After`].
    pub fn relative_position(&self, other: &SourceReference, by_token: bool) -> RelativePosition {
        if other.line_no < self.line_no {
            return RelativePosition::Before;
        }
        if other.line_no > self.line_no {
            return RelativePosition::After;
        }

        let (from, to) = self.bounds(by_token);
        let (other_from, other_to) = other.bounds(by_token);

        if other_to + 1 < from {
            RelativePosition::Before
        } else if other_to + 1 == from {
            RelativePosition::AdjacentBefore
        } else if other_from > to + 1 {
            RelativePosition::After
        } else if other_from == to + 1 {
            RelativePosition::AdjacentAfter
        } else {
            RelativePosition::Overlapping
        }
    }

    pub fn can_be_merged(&self, other: &SourceReference, by_token: bool) -> bool {
        self.relative_position(other, by_token).is_mergeable()
    }

    /// Widen this reference to the union of both ranges.
    ///
    /// Callers check [`can_be_merged`](Self::can_be_merged) first; the line
    /// number of `self` is kept as is.
    pub fn merge(&mut self, other: &SourceReference) {
        self.col_from = self.col_from.min(other.col_from);
        self.col_to = self.col_to.max(other.col_to);
        self.tok_from = self.tok_from.min(other.tok_from);
        self.tok_to = self.tok_to.max(other.tok_to);
    }

    /// Checked form of [`merge`](Self::merge).
    pub fn try_merge(&mut self, other: &SourceReference, by_token: bool) -> Result<(), SpanError> {
        let position = self.relative_position(other, by_token);
        if !position.is_mergeable() {
            return Err(SpanError::NotMergeable {
                target: *self,
                other: *other,
                position,
            });
        }
        self.merge(other);
        Ok(())
    }

    /// Fold this reference into a sorted list of pairwise separated references.
    ///
    /// Entries that overlap or touch `self` always form one contiguous run in
    /// such a list. With no such entry the reference is inserted in order, a
    /// single touching entry is widened in place, and a longer run collapses
    /// into one entry. The list is sorted and separated again on return.
    pub fn merge_into(&self, refs: &mut Vec<SourceReference>, by_token: bool) {
        let mut run: Option<(usize, usize)> = None;
        let mut insert_at = refs.len();

        for (i, existing) in refs.iter().enumerate() {
            let position = self.relative_position(existing, by_token);
            if position.is_mergeable() {
                run = Some(match run {
                    Some((first, _)) => (first, i),
                    None => (i, i),
                });
            } else if position == RelativePosition::After {
                insert_at = i;
                break;
            }
        }

        match run {
            None => refs.insert(insert_at, *self),
            Some((first, last)) if first == last => refs[first].merge(self),
            Some((first, last)) => {
                let mut collapsed = *self;
                for existing in &refs[first..=last] {
                    collapsed.merge(existing);
                }
                refs.splice(first..=last, std::iter::once(collapsed));
            }
        }
    }

    /// Fold every reference of `others` into `target`.
    ///
    /// Used to derive a parent node's span from the spans of its children.
    pub fn merge_all(
        target: &mut Vec<SourceReference>,
        others: &[SourceReference],
        by_token: bool,
    ) {
        for other in others {
            other.merge_into(target, by_token);
        }
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, columns {}-{}",
            self.line_no + 1,
            self.col_from + 1,
            self.col_to + 1
        )
    }
}
