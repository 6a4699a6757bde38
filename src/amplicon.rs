//! Pairs forward/reverse primer hits on an indexed contig into amplicon
//! records (spec.md §4.F).

use crate::alphabet::reverse_complement;
use crate::error::Error;
use crate::fasta::Contig;
use crate::index;
use crate::primer::{Primer, PrimerList};

/// Start positions at which a primer's forward expansions (`fwd_positions`)
/// and reverse-complement expansions (`rc_positions`) occur in one contig.
#[derive(Debug, Clone, Default)]
pub struct PrimerMatch {
    pub fwd_positions: Vec<usize>,
    pub rc_positions: Vec<usize>,
}

/// One predicted amplicon.
#[derive(Debug, Clone)]
pub struct Amplicon {
    pub orientation: char,
    pub forward_label: Vec<u8>,
    pub reverse_label: Vec<u8>,
    pub bases: Vec<u8>,
    pub start: usize,
    pub end: usize,
    pub length: usize,
    pub file: String,
    pub contig_identifier: Vec<u8>,
}

/// Queries the suffix index (`sequence` + its suffix array) once per
/// expansion (and once per reverse-complement expansion) of `primer`,
/// accumulating every start position.
fn match_primer(sequence: &[u8], suffix_array: &[u32], primer: &Primer) -> PrimerMatch {
    let mut fwd_positions = Vec::new();
    for expansion in &primer.expansions {
        fwd_positions.extend(index::lookup(sequence, suffix_array, expansion));
    }

    let mut rc_positions = Vec::new();
    for expansion in &primer.rc_expansions {
        rc_positions.extend(index::lookup(sequence, suffix_array, expansion));
    }

    // The suffix index's lookup order is unspecified (spec §4.D); sort so
    // that the enumerator's own ordering guarantee (§4.F, by ascending
    // hit index) is reproducible regardless of the index's internals.
    fwd_positions.sort_unstable();
    rc_positions.sort_unstable();

    PrimerMatch {
        fwd_positions,
        rc_positions,
    }
}

/// Enumerates every amplicon on one indexed contig, pairing every forward
/// primer with every reverse primer. `max_sequence == 0` disables the
/// length gate. Preserves the Go source's pre-clamp length-gate quirk
/// (spec.md §4.F step 3 / §9 note 1): the gate is computed from the raw
/// hit-index difference, before the primer length that widens `end` is
/// folded in, while the reported `length` field is the post-clamp
/// `end - start`.
pub fn enumerate_amplicons(
    file: &str,
    contig: &Contig,
    suffix_array: &[u32],
    primers: &PrimerList,
    max_sequence: usize,
) -> Result<Vec<Amplicon>, Error> {
    let forward_matches: Vec<PrimerMatch> = primers
        .forward
        .iter()
        .map(|p| match_primer(&contig.sequence, suffix_array, p))
        .collect();
    let reverse_matches: Vec<PrimerMatch> = primers
        .reverse
        .iter()
        .map(|p| match_primer(&contig.sequence, suffix_array, p))
        .collect();

    let mut amplicons = Vec::new();
    let identifier = contig.identifier().to_vec();

    for (f_primer, f_match) in primers.forward.iter().zip(&forward_matches) {
        for (r_primer, r_match) in primers.reverse.iter().zip(&reverse_matches) {
            for &f_idx in &f_match.fwd_positions {
                for &r_idx in &r_match.rc_positions {
                    if f_idx > r_idx {
                        continue;
                    }
                    let gate_length = r_idx + r_primer.len() - f_idx;
                    if max_sequence > 0 && gate_length > max_sequence {
                        continue;
                    }
                    let start = f_idx;
                    let end = r_idx + r_primer.len();
                    amplicons.push(Amplicon {
                        orientation: '+',
                        forward_label: f_primer.label.clone(),
                        reverse_label: r_primer.label.clone(),
                        bases: contig.sequence[start..end].to_vec(),
                        start,
                        end,
                        length: end - start,
                        file: file.to_string(),
                        contig_identifier: identifier.clone(),
                    });
                }
            }

            for &f_idx in &f_match.rc_positions {
                for &r_idx in &r_match.fwd_positions {
                    if r_idx > f_idx {
                        continue;
                    }
                    let gate_length = f_idx + f_primer.len() - r_idx;
                    if max_sequence > 0 && gate_length > max_sequence {
                        continue;
                    }
                    let start = r_idx;
                    let end = f_idx + f_primer.len();
                    let bases = reverse_complement(&contig.sequence[start..end])?;
                    amplicons.push(Amplicon {
                        orientation: '-',
                        forward_label: f_primer.label.clone(),
                        reverse_label: r_primer.label.clone(),
                        bases,
                        start,
                        end,
                        length: end - start,
                        file: file.to_string(),
                        contig_identifier: identifier.clone(),
                    });
                }
            }
        }
    }

    Ok(amplicons)
}
