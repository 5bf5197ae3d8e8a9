//! Advisory checks shown next to the analysis: recommended length per primer
//! role and GC content. None of these change binding, hairpin or dimer results.

use crate::primer::Primer;
use csv::ReaderBuilder;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBand {
    pub min_len: usize,
    pub max_len: usize,
}

impl LengthBand {
    pub fn contains(&self, len: usize) -> bool {
        (self.min_len..=self.max_len).contains(&len)
    }
}

pub struct LengthBands {
    bands: HashMap<String, LengthBand>,
}

impl LengthBands {
    fn from_text(csv_text: &str) -> Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());
        let mut bands = HashMap::new();
        for record in rdr.records() {
            let record = record?;
            let (Some(role), Some(min_len), Some(max_len)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                continue;
            };
            let (Ok(min_len), Ok(max_len)) = (min_len.parse(), max_len.parse()) else {
                continue;
            };
            bands.insert(role.to_ascii_uppercase(), LengthBand { min_len, max_len });
        }
        Ok(Self { bands })
    }

    pub fn get(&self, role: &str) -> Option<LengthBand> {
        self.bands.get(&role.trim().to_ascii_uppercase()).copied()
    }

    fn check(&self, label: &str, role: &str, len: usize) -> Option<String> {
        let band = self.get(role)?;
        if band.contains(len) {
            return None;
        }
        Some(format!(
            "{label} is {len} bp, recommended {}-{} bp for {role}",
            band.min_len, band.max_len
        ))
    }

    pub fn length_warnings(&self, primer: &Primer) -> Vec<String> {
        let mut ret = vec![];
        ret.extend(self.check(&primer.name, &primer.name, primer.seq.len()));
        if let Some(split) = primer.split() {
            for half in [&split.left, &split.right] {
                let label = format!("{} {}", primer.name, half.role);
                ret.extend(self.check(&label, half.role.name(), half.seq.len()));
            }
        }
        ret
    }
}

impl Default for LengthBands {
    fn default() -> Self {
        let text = include_str!("../assets/primer_length_bands.csv");
        Self::from_text(text).unwrap_or_else(|e| {
            log::error!("Could not read built-in primer length bands: {e}");
            Self {
                bands: HashMap::new(),
            }
        })
    }
}

pub fn gc_fraction(seq: &str) -> Option<f32> {
    if seq.is_empty() {
        return None;
    }
    let gc = seq
        .bytes()
        .map(|c| c.to_ascii_uppercase())
        .filter(|&c| c == b'G' || c == b'C')
        .count() as f32;
    Some(gc / seq.len() as f32)
}
