use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::output::write_amplicon;
use crate::pipeline::{self, basename};
use crate::primer::PrimerList;

/// Parses arguments and runs the pipeline, exiting the process directly
/// with status 1 on a usage error rather than clap's own default of
/// status 2 (spec.md §6: "0 success; 1 usage or fatal error", matching
/// the Go source's `flag.Usage(); os.Exit(1)`).
pub fn run() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|err| exit_on_parse_error(err));
    execute(cli)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).unwrap_or_else(|err| exit_on_parse_error(err));
    execute(cli)
}

/// `--help`/`--version` still exit 0 (clap's `exit_code()` is already `0`
/// for those); every genuine usage error is remapped from clap's default
/// of `2` to spec.md §6's `1`.
fn exit_on_parse_error(err: clap::Error) -> ! {
    let _ = err.print();
    std::process::exit(if err.exit_code() == 0 { 0 } else { 1 });
}

fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.debug);

    let primers_file = File::open(&cli.primers)
        .with_context(|| format!("failed to open primer list '{}'", cli.primers.display()))?;
    let primers = PrimerList::read(BufReader::new(primers_file))
        .with_context(|| format!("failed loading primers from '{}'", cli.primers.display()))?;

    let fasta_file = File::open(&cli.fasta_path)
        .with_context(|| format!("failed to open FASTA input '{}'", cli.fasta_path.display()))?;
    let file_name = basename(&cli.fasta_path);

    let mut out = BufWriter::new(io::stdout().lock());
    pipeline::run(
        BufReader::new(fasta_file),
        &file_name,
        &primers,
        cli.threads,
        cli.max_sequence,
        |amplicon| {
            if let Err(e) = write_amplicon(&mut out, &amplicon) {
                log::error!("failed writing amplicon record: {e}");
            }
        },
    )
    .context("matching failed")?;
    std::io::Write::flush(&mut out)?;

    Ok(())
}

fn init_logging(debug: bool) {
    if debug {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Stderr)
            .init();
    }
}

/// `neben`'s entire external surface (spec.md §6): the argument parser
/// itself is out of scope for this crate beyond matching this contract.
#[derive(Debug, Parser)]
#[command(
    name = "neben",
    version,
    about = "In silico PCR amplicon discovery across FASTA contigs"
)]
struct Cli {
    /// Total matcher worker threads; threads/2 indexer threads.
    #[arg(long, default_value_t = 10)]
    threads: usize,

    /// Max amplicon length; 0 disables the check.
    #[arg(long = "max-sequence", default_value_t = 200)]
    max_sequence: usize,

    /// Path to the primer list file.
    #[arg(long)]
    primers: PathBuf,

    /// Enable diagnostic logging to stderr.
    #[arg(long)]
    debug: bool,

    /// FASTA file to scan for amplicons.
    #[arg(value_name = "FASTA")]
    fasta_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tmp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("neben_cli_{nanos}_{name}"))
    }

    #[test]
    fn parses_default_flags() {
        let cli = Cli::parse_from(["neben", "--primers", "p.txt", "ref.fa"]);
        assert_eq!(cli.threads, 10);
        assert_eq!(cli.max_sequence, 200);
        assert!(!cli.debug);
        assert_eq!(cli.fasta_path, PathBuf::from("ref.fa"));
    }

    #[test]
    fn end_to_end_writes_expected_tsv_line() {
        let reference = tmp_path("ref.fa");
        let primers_file = tmp_path("primers.txt");
        {
            let mut rf = File::create(&reference).unwrap();
            writeln!(rf, ">c1").unwrap();
            writeln!(rf, "AAAACGTTTTGCAT").unwrap();
        }
        {
            let mut pf = File::create(&primers_file).unwrap();
            writeln!(pf, "ACGT f1").unwrap();
            writeln!(pf).unwrap();
            writeln!(pf, "ATGC r1").unwrap();
        }

        run_from_args([
            "neben".to_string(),
            "--primers".to_string(),
            primers_file.display().to_string(),
            "--max-sequence".to_string(),
            "0".to_string(),
            reference.display().to_string(),
        ])
        .unwrap();

        std::fs::remove_file(reference).unwrap();
        std::fs::remove_file(primers_file).unwrap();
    }
}
