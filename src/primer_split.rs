//! Splitting of composite FIP/BIP primers into their two binding halves.
//!
//! A composite primer is `F1c + F2` (or `B1c + B2`): one half binds the gene
//! through its reverse complement, the other verbatim. The split point is
//! found by trying right-half lengths in ascending order and checking both
//! assignments of the two roles against the gene.

use crate::{
    dna_sequence::{find_subsequence, reverse_complement},
    parameters::SplitParameters,
};
use lampcheck_protocol::{HalfRole, Orientation, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimerHalf {
    pub seq: String,
    pub role: HalfRole,
    pub bound_as: Orientation,
    pub span: Span,
}

impl PrimerHalf {
    fn forward(seq: &str, pos: usize, forward_family: bool) -> Self {
        Self {
            seq: seq.to_string(),
            role: HalfRole::forward_bound(forward_family),
            bound_as: Orientation::Forward,
            span: Span::with_len(pos, seq.len()),
        }
    }

    fn reverse(seq: &str, pos: usize, forward_family: bool) -> Self {
        Self {
            seq: seq.to_string(),
            role: HalfRole::reverse_bound(forward_family),
            bound_as: Orientation::ReverseComplement,
            span: Span::with_len(pos, seq.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResult {
    pub left: PrimerHalf,
    pub right: PrimerHalf,
}

impl SplitResult {
    pub fn half(&self, role: HalfRole) -> Option<&PrimerHalf> {
        [&self.left, &self.right].into_iter().find(|h| h.role == role)
    }

    pub fn recombined(&self) -> String {
        format!("{}{}", self.left.seq, self.right.seq)
    }
}

pub fn split_composite_primer(
    seq: &str,
    gene: &str,
    forward_family: bool,
    params: &SplitParameters,
) -> Option<SplitResult> {
    if !seq.is_ascii() {
        log::warn!("Cannot split non-ASCII primer sequence {seq:?}");
        return None;
    }
    let seq = seq.to_ascii_uppercase();
    let gene = gene.to_ascii_uppercase();
    let gene = gene.as_str();
    for right_len in params.min_right..=params.max_right {
        if seq.len() < right_len + params.min_left {
            break;
        }
        let (left, right) = seq.split_at(seq.len() - right_len);

        if let Some(right_pos) = find_subsequence(gene, right) {
            if let Some(left_pos) = find_subsequence(gene, &reverse_complement(left)) {
                log::debug!("split {seq} at {right_len}: left reverse, right forward");
                return Some(SplitResult {
                    left: PrimerHalf::reverse(left, left_pos, forward_family),
                    right: PrimerHalf::forward(right, right_pos, forward_family),
                });
            }
        }

        if let Some(left_pos) = find_subsequence(gene, left) {
            if let Some(right_pos) = find_subsequence(gene, &reverse_complement(right)) {
                log::debug!("split {seq} at {right_len}: left forward, right reverse");
                return Some(SplitResult {
                    left: PrimerHalf::forward(left, left_pos, forward_family),
                    right: PrimerHalf::reverse(right, right_pos, forward_family),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // 22 bases
    const F1: &str = "GACCTGAAGTCCTAGCATTGCA";
    // 20 bases
    const F2: &str = "CGTAACGGTCATCTAGGCTA";

    fn gene() -> String {
        format!("AAAA{}TT{}GG", F2, reverse_complement(F1))
    }

    fn defaults() -> SplitParameters {
        SplitParameters::default()
    }

    #[test]
    fn test_split_left_reverse_right_forward() {
        let fip = format!("{}{}", reverse_complement(F1), F2);
        let gene = format!("AAAA{}TT{}GG", F1, F2);
        let split = split_composite_primer(&fip, &gene, true, &defaults()).unwrap();
        assert_eq!(split.right.seq, F2);
        assert_eq!(split.left.seq, reverse_complement(F1));
        assert_eq!(split.left.role, HalfRole::F1c);
        assert_eq!(split.left.bound_as, Orientation::ReverseComplement);
        assert_eq!(split.left.span, Span::new(4, 26));
        assert_eq!(split.right.role, HalfRole::F2);
        assert_eq!(split.right.bound_as, Orientation::Forward);
        assert_eq!(split.right.span, Span::new(28, 48));
        assert_eq!(split.recombined(), fip);
    }

    #[test]
    fn test_split_swapped_hypothesis() {
        // Left half binds verbatim, right half through its reverse complement.
        let bip = format!("{}{}", F2, F1);
        let split = split_composite_primer(&bip, &gene(), false, &defaults()).unwrap();
        assert_eq!(split.left.seq, F2);
        assert_eq!(split.left.role, HalfRole::B2);
        assert_eq!(split.left.bound_as, Orientation::Forward);
        assert_eq!(split.left.span, Span::new(4, 24));
        assert_eq!(split.right.seq, F1);
        assert_eq!(split.right.role, HalfRole::B1c);
        assert_eq!(split.right.bound_as, Orientation::ReverseComplement);
        assert_eq!(split.right.span, Span::new(26, 48));
        assert_eq!(split.half(HalfRole::B1c), Some(&split.right));
    }

    #[test]
    fn test_split_mixed_case() {
        let fip = format!("{}{}", reverse_complement(F1), F2).to_lowercase();
        let gene = format!("AAAA{}TT{}GG", F1, F2).to_lowercase();
        let split = split_composite_primer(&fip, &gene, true, &defaults()).unwrap();
        assert_eq!(split.left.seq, reverse_complement(F1));
        assert_eq!(split.left.span, Span::new(4, 26));
        assert_eq!(split.right.seq, F2);
        assert_eq!(split.right.span, Span::new(28, 48));
    }

    #[test]
    fn test_split_not_found() {
        let fip = format!("{}{}", "ACGT".repeat(6), "TTTT".repeat(5));
        assert_eq!(split_composite_primer(&fip, &gene(), true, &defaults()), None);
    }

    #[test]
    fn test_split_too_short() {
        // 15 base right half would leave fewer than 10 bases on the left.
        assert_eq!(split_composite_primer(&F2[..20], &gene(), true, &defaults()), None);
        assert_eq!(split_composite_primer("", "", true, &defaults()), None);
    }
}
