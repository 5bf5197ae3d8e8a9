//! Stem-loop detection near the 3' and 5' ends of a single primer.
//!
//! Only a short terminal window is scanned. For each stem length, longest
//! first, the terminal bases are taken as one strand of the stem and their
//! reverse complement is looked up at exactly the position implied by each
//! loop length, shortest loop first. The first hit wins.

use crate::{
    dna_sequence::reverse_complement,
    parameters::{HairpinParameters, MIN_HAIRPIN_LOOP},
};
use lampcheck_protocol::{HairpinResult, Span};

struct ScanWindow<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> ScanWindow<'a> {
    fn three_prime(seq: &'a str, window: usize) -> Self {
        let offset = seq.len().saturating_sub(window);
        Self {
            text: &seq[offset..],
            offset,
        }
    }

    fn five_prime(seq: &'a str, window: usize) -> Self {
        Self {
            text: &seq[..seq.len().min(window)],
            offset: 0,
        }
    }

    fn hairpin(
        &self,
        stem: &str,
        stem_rc: String,
        loop_length: usize,
        terminal: Span,
        partner: Span,
    ) -> HairpinResult {
        HairpinResult {
            stem: stem.to_string(),
            stem_rc,
            stem_length: stem.len(),
            loop_length,
            terminal: terminal.shifted(self.offset),
            partner: partner.shifted(self.offset),
        }
    }
}

pub fn scan_3prime(seq: &str, params: &HairpinParameters) -> Option<HairpinResult> {
    if !seq.is_ascii() {
        log::warn!("Skipping hairpin scan of non-ASCII sequence {seq:?}");
        return None;
    }
    let seq = seq.to_ascii_uppercase();
    let seq = seq.as_str();
    let window = ScanWindow::three_prime(seq, params.window);
    let text = window.text;
    let len = text.len();

    for stem_len in (params.min_stem..=params.max_stem).rev() {
        if stem_len == 0 || 2 * stem_len + MIN_HAIRPIN_LOOP > len {
            continue;
        }
        let stem_start = len - stem_len;
        let stem = &text[stem_start..];
        let stem_rc = reverse_complement(stem);
        for loop_len in MIN_HAIRPIN_LOOP..=params.max_loop {
            let Some(candidate) = stem_start.checked_sub(loop_len + stem_len) else {
                break;
            };
            if text[candidate..candidate + stem_len] == stem_rc {
                log::debug!("3' hairpin stem {stem} loop {loop_len} in {seq}");
                return Some(window.hairpin(
                    stem,
                    stem_rc,
                    loop_len,
                    Span::new(stem_start, len),
                    Span::with_len(candidate, stem_len),
                ));
            }
        }
    }
    None
}

pub fn scan_5prime(seq: &str, params: &HairpinParameters) -> Option<HairpinResult> {
    if !seq.is_ascii() {
        log::warn!("Skipping hairpin scan of non-ASCII sequence {seq:?}");
        return None;
    }
    let seq = seq.to_ascii_uppercase();
    let seq = seq.as_str();
    let window = ScanWindow::five_prime(seq, params.window);
    let text = window.text;
    let len = text.len();

    for stem_len in (params.min_stem..=params.max_stem).rev() {
        if stem_len == 0 || 2 * stem_len + MIN_HAIRPIN_LOOP > len {
            continue;
        }
        let stem = &text[..stem_len];
        let stem_rc = reverse_complement(stem);
        for loop_len in MIN_HAIRPIN_LOOP..=params.max_loop {
            let candidate = stem_len + loop_len;
            if candidate + stem_len > len {
                break;
            }
            if text[candidate..candidate + stem_len] == stem_rc {
                log::debug!("5' hairpin stem {stem} loop {loop_len} in {seq}");
                return Some(window.hairpin(
                    stem,
                    stem_rc,
                    loop_len,
                    Span::new(0, stem_len),
                    Span::with_len(candidate, stem_len),
                ));
            }
        }
    }
    None
}

pub fn scan_hairpin_3prime(
    seq: &str,
    max_stem: Option<usize>,
    min_stem: Option<usize>,
    max_loop: Option<usize>,
) -> Option<HairpinResult> {
    scan_3prime(seq, &with_overrides(max_stem, min_stem, max_loop))
}

pub fn scan_hairpin_5prime(
    seq: &str,
    max_stem: Option<usize>,
    min_stem: Option<usize>,
    max_loop: Option<usize>,
) -> Option<HairpinResult> {
    scan_5prime(seq, &with_overrides(max_stem, min_stem, max_loop))
}

fn with_overrides(
    max_stem: Option<usize>,
    min_stem: Option<usize>,
    max_loop: Option<usize>,
) -> HairpinParameters {
    let defaults = HairpinParameters::default();
    HairpinParameters {
        max_stem: max_stem.unwrap_or(defaults.max_stem),
        min_stem: min_stem.unwrap_or(defaults.min_stem),
        max_loop: max_loop.unwrap_or(defaults.max_loop),
        window: defaults.window,
    }
}
