use crate::{
    LENGTH_BANDS,
    analysis::{AnalysisSummary, SkippedPrimer},
    dna_sequence::GeneSequence,
    error::LampError,
    primer::Primer,
};
use csv::WriterBuilder;
use lampcheck_protocol::{DimerRecord, HairpinResult};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Json,
    Tsv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub gene_name: Option<String>,
    pub gene_length: usize,
    pub primers: Vec<Primer>,
    pub dimers: Vec<DimerRecord>,
    pub skipped: Vec<SkippedPrimer>,
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn new(gene: &GeneSequence, primers: &[Primer], summary: &AnalysisSummary) -> Self {
        let warnings = primers
            .iter()
            .flat_map(|p| LENGTH_BANDS.length_warnings(p))
            .collect();
        Self {
            gene_name: gene.name().map(|s| s.to_string()),
            gene_length: gene.len(),
            primers: primers.to_vec(),
            dimers: summary.dimers.clone(),
            skipped: summary.skipped.clone(),
            warnings,
        }
    }

    pub fn to_json(&self) -> Result<String, LampError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_tsv<W: Write>(&self, out: W) -> Result<(), LampError> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(out);
        wtr.write_record([
            "name",
            "sequence",
            "length",
            "gc",
            "orientation",
            "start",
            "end",
            "left_role",
            "left_range",
            "right_role",
            "right_range",
            "hairpin_3prime",
            "hairpin_5prime",
        ])?;
        for p in &self.primers {
            let (start, end) = match p.simple_binding().and_then(|b| b.span) {
                Some(span) => (span.start.to_string(), span.end.to_string()),
                None => (String::new(), String::new()),
            };
            let (left_role, left_range, right_role, right_range) = match p.split() {
                Some(split) => (
                    split.left.role.to_string(),
                    split.left.span.to_string(),
                    split.right.role.to_string(),
                    split.right.span.to_string(),
                ),
                None => Default::default(),
            };
            wtr.write_record([
                p.name.clone(),
                p.seq.clone(),
                p.seq.len().to_string(),
                p.gc_fraction.map(|gc| format!("{gc:.2}")).unwrap_or_default(),
                p.orientation_label(),
                start,
                end,
                left_role,
                left_range,
                right_role,
                right_range,
                hairpin_cell(p.hairpin3.as_ref()),
                hairpin_cell(p.hairpin5.as_ref()),
            ])?;
        }
        wtr.write_record(["# dimers"])?;
        wtr.write_record([
            "primer_a",
            "primer_b",
            "tail",
            "tail_rc",
            "binding_pos",
            "match_length",
        ])?;
        for d in &self.dimers {
            wtr.write_record([
                d.primer_a.clone(),
                d.primer_b.clone(),
                d.tail.clone(),
                d.tail_rc.clone(),
                d.binding_pos.to_string(),
                d.match_length.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_to_path(&self, path: &str, format: ReportFormat) -> Result<(), LampError> {
        match format {
            ReportFormat::Json => std::fs::write(path, self.to_json()?)?,
            ReportFormat::Tsv => self.write_tsv(std::fs::File::create(path)?)?,
        }
        Ok(())
    }
}

fn hairpin_cell(hairpin: Option<&HairpinResult>) -> String {
    hairpin
        .map(|h| {
            format!(
                "{}@{}/{}@{} loop {}",
                h.stem, h.terminal, h.stem_rc, h.partner, h.loop_length
            )
        })
        .unwrap_or_default()
}
