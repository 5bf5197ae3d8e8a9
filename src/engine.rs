use crate::{
    analysis::{AnalysisSummary, analyze, dimers_for},
    dna_sequence::GeneSequence,
    error::{EngineError, ErrorCode},
    parameters::AnalysisParameters,
    primer::{Primer, PositionEdit, recompute},
    primer_set::{load_primer_file, parse_primer_text},
    report_export::{AnalysisReport, ReportFormat},
};
use serde::{Deserialize, Serialize};

pub type OpId = String;
pub type RunId = String;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisState {
    pub gene: GeneSequence,
    pub primers: Vec<Primer>,
    #[serde(default)]
    pub summary: AnalysisSummary,
    #[serde(default)]
    pub parameters: AnalysisParameters,
}

impl AnalysisState {
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport::new(&self.gene, &self.primers, &self.summary)
    }

    fn primer_index(&self, name: &str) -> Option<usize> {
        self.primers
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    fn reset_analysis(&mut self) {
        for primer in self.primers.iter_mut() {
            *primer = Primer::new(&primer.name, &primer.seq);
        }
        self.summary = AnalysisSummary::default();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    SetGene {
        sequence: String,
        name: Option<String>,
    },
    LoadGene {
        path: String,
    },
    SetPrimers {
        text: String,
    },
    LoadPrimers {
        path: String,
    },
    AddPrimer {
        name: String,
        sequence: String,
    },
    Analyze,
    EditPosition {
        primer: String,
        edit: PositionEdit,
    },
    SetParameter {
        name: String,
        value: serde_json::Value,
    },
    ExportReport {
        path: String,
        format: ReportFormat,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub run_id: RunId,
    pub ops: Vec<Operation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpResult {
    pub op_id: OpId,
    pub changed_primers: Vec<String>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub run_id: RunId,
    pub op: Operation,
    pub result: OpResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_operations: Vec<String>,
    pub supported_report_formats: Vec<String>,
    pub composite_names: Vec<String>,
}

pub trait Engine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError>;
    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError>;
    fn snapshot(&self) -> &AnalysisState;
}

#[derive(Debug, Clone, Default)]
pub struct LampEngine {
    state: AnalysisState,
    journal: Vec<OperationRecord>,
    op_counter: u64,
}

impl LampEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: AnalysisState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn with_parameters(parameters: AnalysisParameters) -> Self {
        Self::from_state(AnalysisState {
            parameters,
            ..AnalysisState::default()
        })
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn capabilities() -> Capabilities {
        Capabilities {
            protocol_version: "v1".to_string(),
            supported_operations: vec![
                "SetGene".to_string(),
                "LoadGene".to_string(),
                "SetPrimers".to_string(),
                "LoadPrimers".to_string(),
                "AddPrimer".to_string(),
                "Analyze".to_string(),
                "EditPosition".to_string(),
                "SetParameter".to_string(),
                "ExportReport".to_string(),
            ],
            supported_report_formats: vec!["Json".to_string(), "Tsv".to_string()],
            composite_names: AnalysisParameters::default().composite_names,
        }
    }

    pub fn operation_log(&self) -> &[OperationRecord] {
        &self.journal
    }

    fn next_op_id(&mut self) -> OpId {
        self.op_counter += 1;
        format!("op-{}", self.op_counter)
    }

    fn set_gene(&mut self, gene: GeneSequence, result: &mut OpResult) {
        if gene.is_empty() {
            result
                .warnings
                .push("Gene contains no A/C/G/T bases; nothing will bind".to_string());
        }
        result.messages.push(format!(
            "Set gene '{}' ({} bp)",
            gene.name().unwrap_or("unnamed"),
            gene.len()
        ));
        self.state.gene = gene;
        self.state.reset_analysis();
    }

    fn set_primers(&mut self, primers: Vec<Primer>, result: &mut OpResult) {
        result.changed_primers = primers.iter().map(|p| p.name.clone()).collect();
        result
            .messages
            .push(format!("Loaded {} primers", primers.len()));
        self.state.primers = primers;
        self.state.reset_analysis();
    }

    fn apply_internal(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        let op_id = self.next_op_id();
        let mut result = OpResult {
            op_id,
            changed_primers: vec![],
            warnings: vec![],
            messages: vec![],
        };

        match op {
            Operation::SetGene { sequence, name } => {
                let gene = GeneSequence::from_sequence(&sequence).with_name(name);
                self.set_gene(gene, &mut result);
            }
            Operation::LoadGene { path } => {
                let gene = GeneSequence::from_path(&path).map_err(|e| EngineError {
                    code: ErrorCode::Io,
                    message: format!("Could not load gene from '{path}': {e}"),
                })?;
                self.set_gene(gene, &mut result);
            }
            Operation::SetPrimers { text } => {
                let primers = parse_primer_text(&text)?;
                self.set_primers(primers, &mut result);
            }
            Operation::LoadPrimers { path } => {
                let primers = load_primer_file(&path)?;
                self.set_primers(primers, &mut result);
            }
            Operation::AddPrimer { name, sequence } => {
                let primer = Primer::new(&name, &sequence);
                primer.validate()?;
                if self.state.primer_index(&primer.name).is_some() {
                    return Err(EngineError::invalid_input(format!(
                        "Primer '{}' already exists",
                        primer.name
                    )));
                }
                result.changed_primers.push(primer.name.clone());
                result
                    .messages
                    .push(format!("Added primer '{}' ({} bp)", primer.name, primer.seq.len()));
                self.state.primers.push(primer);
                self.state.reset_analysis();
            }
            Operation::Analyze => {
                let state = &mut self.state;
                state.summary = analyze(state.gene.as_str(), &mut state.primers, &state.parameters);
                result.changed_primers = state.primers.iter().map(|p| p.name.clone()).collect();
                for skipped in &state.summary.skipped {
                    result.warnings.push(format!(
                        "Skipped primer #{} '{}': {}",
                        skipped.index + 1,
                        skipped.name,
                        skipped.reason
                    ));
                }
                result.messages.push(format!(
                    "Analysed {} primers, {} dimer records",
                    state.primers.len(),
                    state.summary.dimers.len()
                ));
            }
            Operation::EditPosition { primer, edit } => {
                let idx = self.state.primer_index(&primer).ok_or_else(|| {
                    EngineError::not_found(format!("Primer '{primer}' not found"))
                })?;
                let state = &mut self.state;
                let updated = recompute(
                    &state.primers[idx],
                    state.gene.as_str(),
                    &edit,
                    &state.parameters,
                )?;
                result.messages.push(format!(
                    "Primer '{}' is now {} ({} bp)",
                    updated.name,
                    updated.seq,
                    updated.seq.len()
                ));
                result.changed_primers.push(updated.name.clone());
                state.primers[idx] = updated;
                state.summary.dimers = dimers_for(&state.primers, &state.parameters);
            }
            Operation::SetParameter { name, value } => {
                self.state.parameters.set(&name, &value)?;
                result
                    .messages
                    .push(format!("Set parameter '{name}' to {value}"));
                self.state.reset_analysis();
            }
            Operation::ExportReport { path, format } => {
                self.state.report().save_to_path(&path, format)?;
                result
                    .messages
                    .push(format!("Wrote {format:?} report to '{path}'"));
            }
        }

        Ok(result)
    }
}

impl Engine for LampEngine {
    fn apply(&mut self, op: Operation) -> Result<OpResult, EngineError> {
        let run_id = "interactive".to_string();
        let result = self.apply_internal(op.clone())?;
        self.journal.push(OperationRecord {
            run_id,
            op,
            result: result.clone(),
        });
        Ok(result)
    }

    fn apply_workflow(&mut self, wf: Workflow) -> Result<Vec<OpResult>, EngineError> {
        let mut results = Vec::new();
        for op in &wf.ops {
            let result = self.apply_internal(op.clone())?;
            self.journal.push(OperationRecord {
                run_id: wf.run_id.clone(),
                op: op.clone(),
                result: result.clone(),
            });
            results.push(result);
        }
        Ok(results)
    }

    fn snapshot(&self) -> &AnalysisState {
        &self.state
    }
}
