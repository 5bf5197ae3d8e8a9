//! Machine-readable result contracts shared between the lampcheck engine and
//! whatever renders its output (CLI, tables, a web page).

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    ReverseComplement,
    NotFound,
}

impl Orientation {
    pub fn is_reverse(&self) -> bool {
        *self == Orientation::ReverseComplement
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Forward => "forward",
            Self::ReverseComplement => "reverse-complement",
            Self::NotFound => "not found",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfRole {
    F1c,
    F2,
    B1c,
    B2,
}

impl HalfRole {
    pub fn reverse_bound(forward_family: bool) -> Self {
        if forward_family { Self::F1c } else { Self::B1c }
    }

    pub fn forward_bound(forward_family: bool) -> Self {
        if forward_family { Self::F2 } else { Self::B2 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::F1c => "F1c",
            Self::F2 => "F2",
            Self::B1c => "B1c",
            Self::B2 => "B2",
        }
    }
}

impl fmt::Display for HalfRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A stem-loop found near one terminus of a primer.
///
/// Both spans are in the coordinates of the full scanned primer: `terminal`
/// is the stem strand touching the scanned end, `partner` the complementary
/// strand on the other side of the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HairpinResult {
    pub stem: String,
    pub stem_rc: String,
    pub stem_length: usize,
    pub loop_length: usize,
    pub terminal: Span,
    pub partner: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimerRecord {
    pub primer_a: String,
    pub primer_b: String,
    pub tail: String,
    pub tail_rc: String,
    pub binding_pos: usize,
    pub match_length: usize,
}
