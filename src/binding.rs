use crate::dna_sequence::{find_subsequence, reverse_complement};
use lampcheck_protocol::{Orientation, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub span: Option<Span>,
    pub orientation: Orientation,
}

impl Binding {
    pub fn not_found() -> Self {
        Self {
            span: None,
            orientation: Orientation::NotFound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.span.is_some()
    }
}

pub fn locate_binding(seq: &str, gene: &str) -> Binding {
    let seq = seq.to_ascii_uppercase();
    let gene = gene.to_ascii_uppercase();
    if let Some(pos) = find_subsequence(&gene, &seq) {
        return Binding {
            span: Some(Span::with_len(pos, seq.len())),
            orientation: Orientation::Forward,
        };
    }
    if let Some(pos) = find_subsequence(&gene, &reverse_complement(&seq)) {
        return Binding {
            span: Some(Span::with_len(pos, seq.len())),
            orientation: Orientation::ReverseComplement,
        };
    }
    Binding::not_found()
}
