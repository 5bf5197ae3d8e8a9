use lampcheck::{
    Orientation, Span,
    dna_sequence::reverse_complement,
    engine::{Engine, LampEngine, Operation, Workflow},
    error::ErrorCode,
    primer::{EditTarget, PositionEdit},
    report_export::ReportFormat,
};
use std::fs;

const F1: &str = "GACCTGAAGTCCTAGCATTGCA";
const F2: &str = "CGTAACGGTCATCTAGGCTA";
const B3_SITE: &str = "TCAGGTTCAAGCGATTCT";

fn gene() -> String {
    format!("AAAA{F1}TT{F2}GG{B3_SITE}AAAA")
}

fn write_inputs(dir: &std::path::Path) -> (String, String) {
    let gene_path = dir.join("target.fa");
    fs::write(&gene_path, format!(">target demo gene\n{}\n", gene().to_lowercase())).unwrap();
    let primers_path = dir.join("primers.txt");
    fs::write(
        &primers_path,
        format!(
            "# demo set\nF3=AAAAGACCTGAAGTCC\nB3={}\nFIP={}{}\n",
            reverse_complement(B3_SITE),
            reverse_complement(F1),
            F2
        ),
    )
    .unwrap();
    (
        gene_path.to_string_lossy().to_string(),
        primers_path.to_string_lossy().to_string(),
    )
}

#[test]
fn analyze_edit_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let (gene_path, primers_path) = write_inputs(dir.path());
    let tsv_path = dir.path().join("report.tsv");

    let mut engine = LampEngine::new();
    let results = engine
        .apply_workflow(Workflow {
            run_id: "it".to_string(),
            ops: vec![
                Operation::LoadGene { path: gene_path },
                Operation::LoadPrimers { path: primers_path },
                Operation::Analyze,
                Operation::EditPosition {
                    primer: "FIP".to_string(),
                    edit: PositionEdit {
                        target: EditTarget::Right,
                        start: 28,
                        end: 46,
                    },
                },
                Operation::ExportReport {
                    path: tsv_path.to_string_lossy().to_string(),
                    format: ReportFormat::Tsv,
                },
            ],
        })
        .unwrap();
    assert_eq!(results.len(), 5);

    let state = engine.snapshot();
    assert_eq!(state.gene.name(), Some("target"));
    assert_eq!(state.gene.as_str(), gene());

    let b3 = state.primers[1].simple_binding().unwrap();
    assert_eq!(b3.orientation, Orientation::ReverseComplement);
    assert_eq!(b3.span, Some(Span::new(50, 68)));

    let fip = &state.primers[2];
    let split = fip.split().unwrap();
    assert_eq!(split.left.span, Span::new(4, 26));
    assert_eq!(split.right.span, Span::new(28, 46));
    assert_eq!(split.right.seq, &F2[..18]);
    assert_eq!(fip.seq, format!("{}{}", reverse_complement(F1), &F2[..18]));

    let tsv = fs::read_to_string(&tsv_path).unwrap();
    let fip_row = tsv.lines().find(|l| l.starts_with("FIP\t")).unwrap();
    assert!(fip_row.contains("\tsplit\t"));
    assert!(fip_row.contains("28..46"));
    assert!(tsv.lines().any(|l| l == "# dimers"));
}

#[test]
fn workflow_stops_at_first_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.fa");
    let mut engine = LampEngine::new();
    let err = engine
        .apply_workflow(Workflow {
            run_id: "broken".to_string(),
            ops: vec![
                Operation::SetGene {
                    sequence: gene(),
                    name: None,
                },
                Operation::LoadGene {
                    path: missing.to_string_lossy().to_string(),
                },
                Operation::Analyze,
            ],
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Io);
    assert_eq!(engine.operation_log().len(), 1);
    assert_eq!(engine.snapshot().gene.as_str(), gene());
}

#[test]
fn workflow_from_json() {
    let json = format!(
        r#"{{
            "run_id": "json",
            "ops": [
                {{"SetGene": {{"sequence": "{}", "name": "g"}}}},
                {{"SetPrimers": {{"text": "F3=AAAAGACCTGAAGTCC\nLF=GGGGGGGGGGGGGGGG"}}}},
                {{"SetParameter": {{"name": "hairpin.max_loop", "value": 8}}}},
                "Analyze"
            ]
        }}"#,
        gene()
    );
    let wf: Workflow = serde_json::from_str(&json).unwrap();
    let mut engine = LampEngine::new();
    let results = engine.apply_workflow(wf).unwrap();
    assert_eq!(results[3].changed_primers, vec!["F3", "LF"]);
    let state = engine.snapshot();
    assert_eq!(state.parameters.hairpin.max_loop, 8);
    assert_eq!(
        state.primers[1].simple_binding().unwrap().orientation,
        Orientation::NotFound
    );
    assert_eq!(state.primers[1].orientation_label(), "not found");
}
