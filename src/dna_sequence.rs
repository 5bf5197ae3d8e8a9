use anyhow::{Result, anyhow};
use bio::io::fasta;
use serde::{Deserialize, Serialize};
use std::{fmt, fs::File, path::Path};

const GENBANK_EXTENSIONS: &[&str] = &["gb", "gbk", "genbank"];

#[inline(always)]
pub fn letter_complement(letter: u8) -> u8 {
    match letter {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

pub fn reverse_complement(seq: &str) -> String {
    seq.as_bytes()
        .iter()
        .rev()
        .map(|c| letter_complement(*c))
        .map(char::from)
        .collect()
}

pub fn reverse_complement_bytes(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|c| letter_complement(*c)).collect()
}

pub fn normalize_primer_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn clean_gene_text(text: &str) -> String {
    text.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'A' | 'C' | 'G' | 'T'))
        .collect()
}

pub fn find_subsequence(haystack: &str, needle: &str) -> Option<usize> {
    let (haystack, needle) = (haystack.as_bytes(), needle.as_bytes());
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneSequence {
    name: Option<String>,
    seq: String,
}

impl GeneSequence {
    pub fn from_sequence(sequence: &str) -> Self {
        Self {
            name: None,
            seq: clean_gene_text(sequence),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn from_fasta_file(filename: &str) -> Result<GeneSequence> {
        let file = File::open(filename)?;
        Self::first_fasta_record(fasta::Reader::new(file).records(), filename)
    }

    pub fn from_genbank_file(filename: &str) -> Result<GeneSequence> {
        let seq = gb_io::reader::parse_file(filename)?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No GenBank record in '{filename}'"))?;
        let text = String::from_utf8_lossy(&seq.seq);
        Ok(Self::from_sequence(&text).with_name(seq.name))
    }

    pub fn from_path(filename: &str) -> Result<GeneSequence> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if GENBANK_EXTENSIONS.contains(&extension.as_str()) {
            return Self::from_genbank_file(filename);
        }
        let text = std::fs::read_to_string(filename)?;
        let head = text.trim_start();
        if head.starts_with('>') {
            Self::first_fasta_record(fasta::Reader::new(text.as_bytes()).records(), filename)
        } else if head.starts_with("LOCUS") {
            Self::from_genbank_file(filename)
        } else {
            let name = Path::new(filename)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string());
            Ok(Self::from_sequence(&text).with_name(name))
        }
    }

    fn first_fasta_record(
        mut records: impl Iterator<Item = std::io::Result<fasta::Record>>,
        filename: &str,
    ) -> Result<GeneSequence> {
        let record = records
            .next()
            .ok_or_else(|| anyhow!("No FASTA record in '{filename}'"))??;
        let text = String::from_utf8_lossy(record.seq());
        Ok(Self::from_sequence(&text).with_name(Some(record.id().to_string())))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.seq
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

impl fmt::Display for GeneSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.seq)
    }
}

impl From<String> for GeneSequence {
    fn from(s: String) -> Self {
        GeneSequence::from_sequence(&s)
    }
}
