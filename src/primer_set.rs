//! Parsing of `NAME=SEQUENCE` primer lists.

use crate::{dna_sequence::normalize_primer_text, error::EngineError, primer::Primer};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref PRIMER_LINE: Regex = Regex::new(r"^\s*([^=\s][^=]*?)\s*=\s*([A-Za-z\s]+?)\s*$")
        .expect("valid primer line regex");
}

pub fn parse_primer_text(text: &str) -> Result<Vec<Primer>, EngineError> {
    let mut ret = vec![];
    let mut seen = HashSet::new();
    for (lnum, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let caps = PRIMER_LINE.captures(line).ok_or_else(|| {
            EngineError::invalid_input(format!(
                "Line {}: expected NAME=SEQUENCE, found '{}'",
                lnum + 1,
                trimmed
            ))
        })?;
        let name = caps[1].trim().to_string();
        if !seen.insert(name.to_ascii_uppercase()) {
            return Err(EngineError::invalid_input(format!(
                "Line {}: duplicate primer name '{}'",
                lnum + 1,
                name
            )));
        }
        let seq = normalize_primer_text(&caps[2]);
        ret.push(Primer::new(&name, &seq));
    }
    log::debug!("Parsed {} primers", ret.len());
    Ok(ret)
}

pub fn load_primer_file(path: &str) -> Result<Vec<Primer>, EngineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| EngineError::io(format!("Could not read primer file '{path}': {e}")))?;
    parse_primer_text(&text)
}
