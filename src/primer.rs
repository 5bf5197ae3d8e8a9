//! The primer record and the pure state transition applied when a caller
//! moves one of its bound coordinates.

use crate::{
    binding::Binding,
    dna_sequence::reverse_complement,
    error::EngineError,
    hairpin::{scan_3prime, scan_5prime},
    parameters::{AnalysisParameters, HairpinParameters},
    primer_checks::gc_fraction,
    primer_split::{PrimerHalf, SplitResult},
};
use lampcheck_protocol::{HairpinResult, Orientation, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeBinding {
    Split(SplitResult),
    NotSplit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimerBinding {
    #[default]
    Pending,
    Simple(Binding),
    Composite(CompositeBinding),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primer {
    pub name: String,
    pub seq: String,
    #[serde(default)]
    pub binding: PrimerBinding,
    #[serde(default)]
    pub hairpin3: Option<HairpinResult>,
    #[serde(default)]
    pub hairpin5: Option<HairpinResult>,
    #[serde(default)]
    pub gc_fraction: Option<f32>,
}

impl Primer {
    pub fn new(name: &str, seq: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            seq: seq.trim().to_ascii_uppercase(),
            binding: PrimerBinding::Pending,
            hairpin3: None,
            hairpin5: None,
            gc_fraction: None,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.binding, PrimerBinding::Composite(_))
    }

    pub fn is_forward_family(&self) -> bool {
        self.name
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'F'))
    }

    pub fn split(&self) -> Option<&SplitResult> {
        match &self.binding {
            PrimerBinding::Composite(CompositeBinding::Split(split)) => Some(split),
            _ => None,
        }
    }

    pub fn simple_binding(&self) -> Option<&Binding> {
        match &self.binding {
            PrimerBinding::Simple(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn orientation_label(&self) -> String {
        match &self.binding {
            PrimerBinding::Pending => "pending".to_string(),
            PrimerBinding::Simple(b) => b.orientation.to_string(),
            PrimerBinding::Composite(CompositeBinding::Split(_)) => "split".to_string(),
            PrimerBinding::Composite(CompositeBinding::NotSplit) => "not split".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::invalid_input(format!(
                "Primer with sequence '{}' has no name",
                self.seq
            )));
        }
        if self.seq.is_empty() {
            return Err(EngineError::invalid_input(format!(
                "Primer '{}' has no sequence",
                self.name
            )));
        }
        if !self.seq.is_ascii() {
            return Err(EngineError::invalid_input(format!(
                "Primer '{}' has non-ASCII characters in its sequence",
                self.name
            )));
        }
        Ok(())
    }

    pub fn scan_hairpins(&mut self, params: &HairpinParameters) {
        self.hairpin3 = scan_3prime(&self.seq, params);
        self.hairpin5 = scan_5prime(&self.seq, params);
    }

    pub fn clear_hairpins(&mut self) {
        self.hairpin3 = None;
        self.hairpin5 = None;
    }

    pub fn update_gc_fraction(&mut self) {
        self.gc_fraction = gc_fraction(&self.seq);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditTarget {
    Whole,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEdit {
    pub target: EditTarget,
    pub start: usize,
    pub end: usize,
}

/// Re-derives a primer from the gene after one of its coordinates moved.
///
/// The fragment at `start..end` is read from the gene and reverse
/// complemented when the edited part binds as reverse complement. The full
/// sequence is rebuilt from that fragment (left + right for composites) and
/// both hairpin scans are rerun. `primer` itself is left untouched.
pub fn recompute(
    primer: &Primer,
    gene: &str,
    edit: &PositionEdit,
    params: &AnalysisParameters,
) -> Result<Primer, EngineError> {
    if edit.end < edit.start {
        return Err(EngineError::invalid_input(format!(
            "Primer '{}': end {} is before start {}",
            primer.name, edit.end, edit.start
        )));
    }
    let fragment = gene.get(edit.start..edit.end).ok_or_else(|| {
        EngineError::invalid_input(format!(
            "Primer '{}': range {}..{} is outside the gene (length {})",
            primer.name,
            edit.start,
            edit.end,
            gene.len()
        ))
    })?;
    let fragment = fragment.to_ascii_uppercase();
    let span = Span::new(edit.start, edit.end);

    let mut ret = primer.clone();
    match (&primer.binding, edit.target) {
        (PrimerBinding::Simple(binding), EditTarget::Whole) => {
            let orientation = match binding.orientation {
                Orientation::ReverseComplement => Orientation::ReverseComplement,
                _ => Orientation::Forward,
            };
            ret.seq = oriented_fragment(&fragment, orientation);
            ret.binding = PrimerBinding::Simple(Binding {
                span: Some(span),
                orientation,
            });
        }
        (PrimerBinding::Composite(CompositeBinding::Split(split)), EditTarget::Left)
        | (PrimerBinding::Composite(CompositeBinding::Split(split)), EditTarget::Right) => {
            let mut split = split.clone();
            let half: &mut PrimerHalf = match edit.target {
                EditTarget::Left => &mut split.left,
                _ => &mut split.right,
            };
            half.seq = oriented_fragment(&fragment, half.bound_as);
            half.span = span;
            ret.seq = split.recombined();
            ret.binding = PrimerBinding::Composite(CompositeBinding::Split(split));
        }
        (binding, target) => {
            return Err(EngineError::invalid_input(format!(
                "Primer '{}': cannot edit {:?} range of a {} primer",
                primer.name,
                target,
                binding_kind(binding)
            )));
        }
    }
    ret.scan_hairpins(&params.hairpin);
    ret.update_gc_fraction();
    Ok(ret)
}

fn oriented_fragment(fragment: &str, orientation: Orientation) -> String {
    if orientation.is_reverse() {
        reverse_complement(fragment)
    } else {
        fragment.to_string()
    }
}

fn binding_kind(binding: &PrimerBinding) -> &'static str {
    match binding {
        PrimerBinding::Pending => "pending",
        PrimerBinding::Simple(_) => "simple",
        PrimerBinding::Composite(CompositeBinding::Split(_)) => "split composite",
        PrimerBinding::Composite(CompositeBinding::NotSplit) => "unsplit composite",
    }
}
