use crate::{
    binding::locate_binding,
    dimer::check_all_dimers,
    error::EngineError,
    parameters::AnalysisParameters,
    primer::{CompositeBinding, Primer, PrimerBinding},
    primer_split::split_composite_primer,
};
use lampcheck_protocol::DimerRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPrimer {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub dimers: Vec<DimerRecord>,
    pub skipped: Vec<SkippedPrimer>,
}

pub fn analyze_primer(
    gene: &str,
    primer: &mut Primer,
    params: &AnalysisParameters,
) -> Result<(), EngineError> {
    primer.validate()?;
    primer.seq.make_ascii_uppercase();
    if params.is_composite_name(&primer.name) {
        match split_composite_primer(
            &primer.seq,
            gene,
            primer.is_forward_family(),
            &params.split,
        ) {
            Some(split) => {
                primer.binding = PrimerBinding::Composite(CompositeBinding::Split(split));
                primer.scan_hairpins(&params.hairpin);
            }
            None => {
                log::debug!("Composite primer '{}' could not be split", primer.name);
                primer.binding = PrimerBinding::Composite(CompositeBinding::NotSplit);
                if params.scan_unsplit_hairpins {
                    primer.scan_hairpins(&params.hairpin);
                } else {
                    primer.clear_hairpins();
                }
            }
        }
    } else {
        primer.binding = PrimerBinding::Simple(locate_binding(&primer.seq, gene));
        primer.scan_hairpins(&params.hairpin);
    }
    primer.update_gc_fraction();
    Ok(())
}

pub fn analyze(
    gene: &str,
    primers: &mut [Primer],
    params: &AnalysisParameters,
) -> AnalysisSummary {
    let gene = gene.to_ascii_uppercase();
    let gene = gene.as_str();
    let mut skipped = vec![];
    for (index, primer) in primers.iter_mut().enumerate() {
        if let Err(e) = analyze_primer(gene, primer, params) {
            log::warn!("Skipping primer #{}: {}", index + 1, e.message);
            primer.binding = PrimerBinding::Pending;
            primer.clear_hairpins();
            primer.gc_fraction = None;
            skipped.push(SkippedPrimer {
                index,
                name: primer.name.clone(),
                reason: e.message,
            });
        }
    }
    let dimers = dimers_for(primers, params);
    log::info!(
        "Analysed {} primers against {} bp: {} dimer records, {} skipped",
        primers.len(),
        gene.len(),
        dimers.len(),
        skipped.len()
    );
    AnalysisSummary { dimers, skipped }
}

pub fn dimers_for(primers: &[Primer], params: &AnalysisParameters) -> Vec<DimerRecord> {
    check_all_dimers(
        primers
            .iter()
            .filter(|p| p.binding != PrimerBinding::Pending)
            .map(|p| (p.name.as_str(), p.seq.as_str())),
        &params.dimer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna_sequence::reverse_complement;
    use lampcheck_protocol::{HalfRole, Orientation, Span};

    // F1 at 4..26, F2 at 28..48, B3 binding site at 50..68
    const F1: &str = "GACCTGAAGTCCTAGCATTGCA";
    const F2: &str = "CGTAACGGTCATCTAGGCTA";
    const B3_SITE: &str = "TCAGGTTCAAGCGATTCT";

    fn gene() -> String {
        format!("AAAA{F1}TT{F2}GG{B3_SITE}AAAA")
    }

    fn primer_set() -> Vec<Primer> {
        vec![
            Primer::new("F3", "AAAAGACCTGAAGTCC"),
            Primer::new("B3", &reverse_complement(B3_SITE)),
            Primer::new("FIP", &format!("{}{}", reverse_complement(F1), F2)),
            Primer::new("BIP", &format!("{}{}", "ACGT".repeat(5), "TTTT".repeat(5))),
            Primer::new("LF", "GGGGGGGGGGGGGGGG"),
        ]
    }

    #[test]
    fn test_analyze_positions_every_primer() {
        let gene = gene();
        let mut primers = primer_set();
        let summary = analyze(&gene, &mut primers, &AnalysisParameters::default());
        assert!(summary.skipped.is_empty());

        let f3 = primers[0].simple_binding().unwrap();
        assert_eq!(f3.orientation, Orientation::Forward);
        assert_eq!(f3.span, Some(Span::new(0, 16)));

        let b3 = primers[1].simple_binding().unwrap();
        assert_eq!(b3.orientation, Orientation::ReverseComplement);
        assert_eq!(b3.span, Some(Span::new(50, 68)));

        let fip = primers[2].split().unwrap();
        assert_eq!(fip.left.role, HalfRole::F1c);
        assert_eq!(fip.left.span, Span::new(4, 26));
        assert_eq!(fip.right.role, HalfRole::F2);
        assert_eq!(fip.right.span, Span::new(28, 48));

        assert_eq!(
            primers[3].binding,
            PrimerBinding::Composite(CompositeBinding::NotSplit)
        );
        assert_eq!(primers[3].orientation_label(), "not split");

        let lf = primers[4].simple_binding().unwrap();
        assert_eq!(lf.orientation, Orientation::NotFound);
        assert_eq!(lf.span, None);
        assert!(primers.iter().all(|p| p.gc_fraction.is_some()));
    }

    #[test]
    fn test_unsplit_composite_hairpin_policy() {
        let gene = gene();
        // Would fold at the 3' end: GGGG ... CCCC over a 6 base loop.
        let bip = format!("{}GGGGTTTTTTCCCC", "T".repeat(16));
        let mut primers = vec![Primer::new("BIP", &bip)];
        analyze(&gene, &mut primers, &AnalysisParameters::default());
        assert_eq!(
            primers[0].binding,
            PrimerBinding::Composite(CompositeBinding::NotSplit)
        );
        assert_eq!(primers[0].hairpin3, None);

        let params = AnalysisParameters {
            scan_unsplit_hairpins: true,
            ..AnalysisParameters::default()
        };
        analyze(&gene, &mut primers, &params);
        assert_eq!(primers[0].hairpin3.as_ref().unwrap().stem, "CCCC");
    }

    #[test]
    fn test_simple_primer_hairpins_scanned_even_when_unbound() {
        let seq = format!("{}GGGGTTTTTTCCCC", "T".repeat(10));
        let mut primers = vec![Primer::new("F3", &seq)];
        analyze(&gene(), &mut primers, &AnalysisParameters::default());
        assert_eq!(
            primers[0].simple_binding().unwrap().orientation,
            Orientation::NotFound
        );
        assert_eq!(primers[0].hairpin3.as_ref().unwrap().stem_length, 4);
    }

    #[test]
    fn test_lowercase_gene_and_primers() {
        let gene = gene().to_lowercase();
        let mut primers = primer_set();
        for p in primers.iter_mut() {
            p.seq = p.seq.to_lowercase();
        }
        let summary = analyze(&gene, &mut primers, &AnalysisParameters::default());
        assert!(summary.skipped.is_empty());
        assert_eq!(primers[0].seq, "AAAAGACCTGAAGTCC");
        assert_eq!(
            primers[0].simple_binding().unwrap().span,
            Some(Span::new(0, 16))
        );
        assert_eq!(
            primers[1].simple_binding().unwrap().orientation,
            Orientation::ReverseComplement
        );
        assert_eq!(primers[2].split().unwrap().right.span, Span::new(28, 48));

        let mut upper = primer_set();
        let upper_summary = analyze(
            &gene.to_uppercase(),
            &mut upper,
            &AnalysisParameters::default(),
        );
        assert_eq!(summary, upper_summary);
        assert_eq!(upper, primers);
    }

    #[test]
    fn test_non_ascii_primer_is_skipped() {
        let mut primers = vec![
            Primer::new("FIP", "GACCTGAAGTCCTAGCATTGCAÄCGTAACGGTCATCTAGGCTA"),
            Primer::new("F3", "AAAAGACCTGAAGTCC"),
        ];
        let summary = analyze(&gene(), &mut primers, &AnalysisParameters::default());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].name, "FIP");
        assert!(summary.skipped[0].reason.contains("non-ASCII"));
        assert_eq!(primers[0].binding, PrimerBinding::Pending);
        assert!(primers[1].simple_binding().unwrap().is_bound());
    }

    #[test]
    fn test_malformed_primer_is_skipped() {
        let mut primers = vec![
            Primer::new("F3", "AAAAGACCTGAAGTCC"),
            Primer::new("B3", ""),
            Primer::new("", "ACGTACGT"),
        ];
        let summary = analyze(&gene(), &mut primers, &AnalysisParameters::default());
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[0].index, 1);
        assert_eq!(summary.skipped[0].name, "B3");
        assert_eq!(primers[1].binding, PrimerBinding::Pending);
        assert!(primers[0].simple_binding().is_some());
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let gene = gene();
        let mut primers = primer_set();
        let first = analyze(&gene, &mut primers, &AnalysisParameters::default());
        let snapshot = primers.clone();
        let second = analyze(&gene, &mut primers, &AnalysisParameters::default());
        assert_eq!(first, second);
        assert_eq!(snapshot, primers);
    }

    #[test]
    fn test_empty_inputs() {
        let mut primers: Vec<Primer> = vec![];
        let summary = analyze("", &mut primers, &AnalysisParameters::default());
        assert_eq!(summary, AnalysisSummary::default());

        let mut primers = vec![Primer::new("F3", "ACGTACGTAC")];
        analyze("", &mut primers, &AnalysisParameters::default());
        assert_eq!(primers[0].simple_binding().unwrap().span, None);
    }

    #[test]
    fn test_dimers_use_full_composite_sequence() {
        let gene = gene();
        let mut primers = vec![
            Primer::new("FIP", &format!("{}{}", reverse_complement(F1), F2)),
            // Pairs with the 3' end of F2 (...AGGCTA).
            Primer::new("LB", "TTTTTTTAGCCTTTTT"),
        ];
        let summary = analyze(&gene, &mut primers, &AnalysisParameters::default());
        let fip_into_lb: Vec<_> = summary
            .dimers
            .iter()
            .filter(|d| d.primer_a == "FIP")
            .collect();
        assert_eq!(fip_into_lb.len(), 1);
        assert_eq!(fip_into_lb[0].tail, "AGGCTA");
        assert_eq!(fip_into_lb[0].match_length, 6);
        assert_eq!(fip_into_lb[0].binding_pos, 6);
    }
}
