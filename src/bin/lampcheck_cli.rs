use env_logger::Env;
use lampcheck::{
    HairpinResult, about,
    dimer::check_dimer_pair,
    dna_sequence::{normalize_primer_text, reverse_complement},
    engine::{Engine, LampEngine, Operation, Workflow},
    hairpin::{scan_3prime, scan_5prime},
    parameters::AnalysisParameters,
    report_export::ReportFormat,
};
use serde::Serialize;
use std::{env, fs};

#[derive(Serialize)]
struct HairpinSummary {
    sequence: String,
    three_prime: Option<HairpinResult>,
    five_prime: Option<HairpinResult>,
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  lampcheck_cli --version\n  \
  lampcheck_cli [--params PATH] capabilities\n  \
  lampcheck_cli analyze GENE_FILE PRIMERS_FILE [--params PATH] [--tsv PATH]\n  \
  lampcheck_cli revcomp SEQ\n  \
  lampcheck_cli [--params PATH] hairpin SEQ\n  \
  lampcheck_cli [--params PATH] dimer SEQ_A SEQ_B\n  \
  lampcheck_cli [--params PATH] op '<operation-json>'\n  \
  lampcheck_cli [--params PATH] workflow '<workflow-json>'\n\n  \
  Tip: pass @file.json instead of inline JSON"
    );
}

fn load_json_arg(value: &str) -> Result<String, String> {
    if let Some(path) = value.strip_prefix('@') {
        fs::read_to_string(path).map_err(|e| format!("Could not read JSON file '{path}': {e}"))
    } else {
        Ok(value.to_string())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Could not serialize JSON output: {e}"))?;
    println!("{text}");
    Ok(())
}

fn parse_global_params_arg(args: &[String]) -> Result<(AnalysisParameters, usize), String> {
    if args.len() >= 3 && args[1] == "--params" {
        let params = AnalysisParameters::load_from_path(&args[2]).map_err(|e| e.to_string())?;
        return Ok((params, 3));
    }
    Ok((AnalysisParameters::default(), 1))
}

#[derive(Debug, Default, PartialEq)]
struct AnalyzeOptions {
    params_path: Option<String>,
    tsv_path: Option<String>,
}

fn parse_analyze_options(args: &[String]) -> Result<AnalyzeOptions, String> {
    let mut ret = AnalyzeOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--params" => &mut ret.params_path,
            "--tsv" => &mut ret.tsv_path,
            other => return Err(format!("Unknown argument '{other}' for analyze")),
        };
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {arg}"))?;
        *slot = Some(value.to_string());
    }
    Ok(ret)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        return Err("Missing command".to_string());
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    let (params, cmd_idx) = parse_global_params_arg(&args)?;
    if args.len() <= cmd_idx {
        usage();
        return Err("Missing command".to_string());
    }

    let command = &args[cmd_idx];

    match command.as_str() {
        "capabilities" => {
            print_json(&LampEngine::capabilities())?;
            Ok(())
        }
        "analyze" => {
            if args.len() <= cmd_idx + 2 {
                usage();
                return Err("analyze requires: GENE_FILE PRIMERS_FILE".to_string());
            }
            let gene_path = args[cmd_idx + 1].clone();
            let primers_path = args[cmd_idx + 2].clone();
            let options = parse_analyze_options(&args[cmd_idx + 3..])?;
            let params = match &options.params_path {
                Some(path) => {
                    AnalysisParameters::load_from_path(path).map_err(|e| e.to_string())?
                }
                None => params,
            };

            let mut engine = LampEngine::with_parameters(params);
            let mut ops = vec![
                Operation::LoadGene { path: gene_path },
                Operation::LoadPrimers { path: primers_path },
                Operation::Analyze,
            ];
            if let Some(path) = options.tsv_path {
                ops.push(Operation::ExportReport {
                    path,
                    format: ReportFormat::Tsv,
                });
            }
            let results = engine
                .apply_workflow(Workflow {
                    run_id: "cli-analyze".to_string(),
                    ops,
                })
                .map_err(|e| e.to_string())?;
            for warning in results.iter().flat_map(|r| r.warnings.iter()) {
                eprintln!("Warning: {warning}");
            }
            print_json(&engine.snapshot().report())
        }
        "revcomp" => {
            let seq = args
                .get(cmd_idx + 1)
                .ok_or_else(|| "Missing sequence for revcomp".to_string())?;
            println!("{}", reverse_complement(&normalize_primer_text(seq)));
            Ok(())
        }
        "hairpin" => {
            let seq = args
                .get(cmd_idx + 1)
                .ok_or_else(|| "Missing sequence for hairpin".to_string())?;
            let sequence = normalize_primer_text(seq);
            print_json(&HairpinSummary {
                three_prime: scan_3prime(&sequence, &params.hairpin),
                five_prime: scan_5prime(&sequence, &params.hairpin),
                sequence,
            })
        }
        "dimer" => {
            if args.len() <= cmd_idx + 2 {
                usage();
                return Err("dimer requires: SEQ_A SEQ_B".to_string());
            }
            let seq_a = normalize_primer_text(&args[cmd_idx + 1]);
            let seq_b = normalize_primer_text(&args[cmd_idx + 2]);
            print_json(&check_dimer_pair("A", &seq_a, "B", &seq_b, &params.dimer))
        }
        "op" => {
            if args.len() <= cmd_idx + 1 {
                usage();
                return Err("Missing operation JSON".to_string());
            }
            let json = load_json_arg(&args[cmd_idx + 1])?;
            let op: Operation =
                serde_json::from_str(&json).map_err(|e| format!("Invalid operation JSON: {e}"))?;

            let mut engine = LampEngine::with_parameters(params);
            let result = engine.apply(op).map_err(|e| e.to_string())?;
            print_json(&result)
        }
        "workflow" => {
            if args.len() <= cmd_idx + 1 {
                usage();
                return Err("Missing workflow JSON".to_string());
            }
            let json = load_json_arg(&args[cmd_idx + 1])?;
            let workflow: Workflow =
                serde_json::from_str(&json).map_err(|e| format!("Invalid workflow JSON: {e}"))?;

            let mut engine = LampEngine::with_parameters(params);
            let results = engine.apply_workflow(workflow).map_err(|e| e.to_string())?;
            print_json(&serde_json::json!({
                "results": results,
                "report": engine.snapshot().report(),
            }))
        }
        _ => {
            usage();
            Err(format!("Unknown command '{command}'"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_analyze_options() {
        let options =
            parse_analyze_options(&strings(&["--params", "p.json", "--tsv", "out.tsv"])).unwrap();
        assert_eq!(options.params_path.as_deref(), Some("p.json"));
        assert_eq!(options.tsv_path.as_deref(), Some("out.tsv"));
        assert_eq!(
            parse_analyze_options(&[]).unwrap(),
            AnalyzeOptions::default()
        );
    }

    #[test]
    fn test_analyze_options_errors() {
        let err = parse_analyze_options(&strings(&["--strict"])).unwrap_err();
        assert!(err.contains("--strict"));
        let err = parse_analyze_options(&strings(&["--tsv"])).unwrap_err();
        assert_eq!(err, "Missing value for --tsv");
    }
}
