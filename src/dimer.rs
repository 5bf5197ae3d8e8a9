use crate::{
    dna_sequence::{find_subsequence, reverse_complement},
    parameters::DimerParameters,
};
use itertools::Itertools;
use lampcheck_protocol::DimerRecord;

fn three_prime_tail_match(
    name_a: &str,
    seq_a: &str,
    name_b: &str,
    seq_b: &str,
    params: &DimerParameters,
) -> Option<DimerRecord> {
    if !seq_a.is_ascii() || !seq_b.is_ascii() {
        log::warn!("Skipping dimer check of {name_a} against {name_b}: non-ASCII sequence");
        return None;
    }
    let seq_a = seq_a.to_ascii_uppercase();
    let seq_b = seq_b.to_ascii_uppercase();
    for match_len in (params.min_match..=params.max_match).rev() {
        if match_len == 0 || match_len > seq_a.len() {
            continue;
        }
        let tail = &seq_a[seq_a.len() - match_len..];
        let tail_rc = reverse_complement(tail);
        if let Some(pos) = find_subsequence(&seq_b, &tail_rc) {
            return Some(DimerRecord {
                primer_a: name_a.to_string(),
                primer_b: name_b.to_string(),
                tail: tail.to_string(),
                tail_rc,
                binding_pos: pos,
                match_length: match_len,
            });
        }
    }
    None
}

pub fn check_dimer_pair(
    name_a: &str,
    seq_a: &str,
    name_b: &str,
    seq_b: &str,
    params: &DimerParameters,
) -> Vec<DimerRecord> {
    [
        three_prime_tail_match(name_a, seq_a, name_b, seq_b, params),
        three_prime_tail_match(name_b, seq_b, name_a, seq_a, params),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn check_all_dimers<'a, I>(primers: I, params: &DimerParameters) -> Vec<DimerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let primers: Vec<(&str, &str)> = primers.into_iter().collect();
    let ret: Vec<DimerRecord> = primers
        .iter()
        .tuple_combinations()
        .flat_map(|((name_a, seq_a), (name_b, seq_b))| {
            check_dimer_pair(name_a, seq_a, name_b, seq_b, params)
        })
        .collect();
    log::debug!(
        "{} dimer records across {} primers",
        ret.len(),
        primers.len()
    );
    ret
}
