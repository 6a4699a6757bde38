//! Generates a deterministic synthetic reference FASTA and a matching
//! two-section primer list with planted amplicons, for manually
//! exercising the pipeline and for feeding `benches/engine.rs`.
//!
//! Adapted from the single-primer-panel generator this crate's ancestor
//! shipped as `gen_synthetic`: here the planted data takes the shape of
//! forward/reverse primer pairs bracketing a known amplicon rather than
//! unpaired, occasionally-mismatched primers, since `neben` has no
//! mismatch tolerance to exercise.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    if args.primer_len == 0 {
        bail!("--primer-len must be > 0");
    }
    if args.amplicon_len <= 2 * args.primer_len {
        bail!("--amplicon-len must be greater than twice --primer-len");
    }
    if args.amplicon_count == 0 {
        bail!("--amplicon-count must be > 0");
    }
    if args.bases < args.amplicon_count * args.amplicon_len {
        bail!("--bases is too small to fit --amplicon-count non-overlapping amplicons");
    }

    let mut rng = XorShift64::new(args.seed);
    let sequence = generate_sequence(args.bases, &mut rng);
    write_fasta(&args.reference_out, "synthetic_chr1", &sequence)?;
    write_primers(
        &args.primers_out,
        &sequence,
        args.amplicon_count,
        args.primer_len,
        args.amplicon_len,
        &mut rng,
    )?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "gen-synthetic",
    version,
    about = "Generate deterministic synthetic FASTA + primer panel for neben"
)]
struct Args {
    #[arg(long, default_value = "benchmarks/generated/reference.fa")]
    reference_out: PathBuf,

    #[arg(long, default_value = "benchmarks/generated/primers.txt")]
    primers_out: PathBuf,

    #[arg(long, default_value_t = 2_000_000)]
    bases: usize,

    #[arg(long, default_value_t = 16)]
    amplicon_count: usize,

    #[arg(long, default_value_t = 20)]
    primer_len: usize,

    #[arg(long, default_value_t = 150)]
    amplicon_len: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn generate_sequence(len: usize, rng: &mut XorShift64) -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(BASES[(rng.next_u32() as usize) & 3]);
    }
    out
}

fn write_fasta(path: &PathBuf, contig_name: &str, sequence: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, ">{contig_name}")?;
    for chunk in sequence.chunks(80) {
        writeln!(writer, "{}", String::from_utf8_lossy(chunk))?;
    }
    writer.flush()?;
    Ok(())
}

/// Plants `amplicon_count` forward/reverse primer pairs directly into
/// `sequence` at non-overlapping windows so every planted pair produces
/// exactly one `+` orientation amplicon of length `amplicon_len`, then
/// writes the two-section (forward, blank line, reverse) primer list
/// `neben` expects. The reverse primer written to the panel is the
/// reverse complement of the bases planted at the amplicon's 3' end, so
/// the matcher's own reverse-complement expansion lands back on those
/// planted bases.
fn write_primers(
    path: &PathBuf,
    sequence: &[u8],
    amplicon_count: usize,
    primer_len: usize,
    amplicon_len: usize,
    rng: &mut XorShift64,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    let window = sequence.len() / amplicon_count;
    let mut forward_lines = Vec::with_capacity(amplicon_count);
    let mut reverse_lines = Vec::with_capacity(amplicon_count);

    for i in 0..amplicon_count {
        let window_start = i * window;
        let slack = window.saturating_sub(amplicon_len).max(1);
        let start = window_start + (rng.next_u32() as usize) % slack;

        let forward_primer = &sequence[start..start + primer_len];
        let reverse_window_start = start + amplicon_len - primer_len;
        let reverse_window = &sequence[reverse_window_start..reverse_window_start + primer_len];
        let reverse_primer = reverse_complement(reverse_window);

        forward_lines.push(format!(
            "{}\tfwd_{:04}",
            String::from_utf8_lossy(forward_primer),
            i + 1
        ));
        reverse_lines.push(format!(
            "{}\trev_{:04}",
            String::from_utf8_lossy(&reverse_primer),
            i + 1
        ));
    }

    let file =
        File::create(path).with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in &forward_lines {
        writeln!(writer, "{line}")?;
    }
    writeln!(writer)?;
    for line in &reverse_lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}

fn reverse_complement(bases: &[u8]) -> Vec<u8> {
    bases
        .iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                0xA5A5_A5A5_A5A5_A5A5
            } else {
                seed
            },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 32) as u32
    }
}
