//! Three-stage producer/indexer/matcher pipeline (spec.md §4.E / §5).
//!
//! Stage 1 (single producer thread) reads the FASTA file and sends
//! contigs into a bounded queue of capacity `threads / 2`. Stage 2
//! (`threads / 2` indexer threads) drains that queue, builds each
//! contig's suffix array, and forwards an `IndexedContig` into a second
//! bounded queue of capacity `threads`. Stage 3 (`threads` matcher
//! threads) drains that queue, enumerates amplicons, and sends them to a
//! third bounded queue of the same capacity that the sink drains. This
//! mirrors the Go source's channel + `sync.WaitGroup` topology: a
//! channel's last sender going out of scope closes it, which is how
//! `crossbeam_channel` propagates shutdown from stage to stage here,
//! the same role `defer close(chan)` plays in the original.
//!
//! An I/O failure reading the FASTA stream is fatal (spec.md §7): the
//! producer thread stops early and its own `JoinHandle` is joined after
//! the sink loop drains, its error folded into the same slot matcher
//! errors use so `run` always reports the failure instead of silently
//! succeeding on a truncated read.

use std::io::BufRead;
use std::path::Path;
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::amplicon::{self, Amplicon};
use crate::error::Error;
use crate::fasta::{Contig, FastaSource};
use crate::index;
use crate::primer::PrimerList;

/// A contig plus the suffix array built over its sequence, handed from
/// the indexer stage to the matcher stage.
pub struct IndexedContig {
    pub contig: Contig,
    pub suffix_array: Vec<u32>,
}

/// Runs the full pipeline against `reader`, invoking `sink` once per
/// amplicon as matcher threads produce them. `sink` runs on the calling
/// thread, so output ordering across contigs is whatever order matcher
/// threads happen to finish in (spec.md §5 — not preserved across
/// contigs, preserved within one contig by the enumerator).
pub fn run<R, F>(
    reader: R,
    file_name: &str,
    primers: &PrimerList,
    threads: usize,
    max_sequence: usize,
    mut sink: F,
) -> Result<(), Error>
where
    R: BufRead + Send,
    F: FnMut(Amplicon),
{
    let threads = threads.max(1);
    let indexer_threads = (threads / 2).max(1);

    let (contig_tx, contig_rx) = bounded::<Contig>((threads / 2).max(1));
    let (indexed_tx, indexed_rx) = bounded::<IndexedContig>(threads);
    let (amplicon_tx, amplicon_rx) = bounded::<Amplicon>(threads);

    thread::scope(|scope| -> Result<(), Error> {
        let producer_handle = scope.spawn(move || run_producer(reader, contig_tx));

        let mut indexer_handles = Vec::with_capacity(indexer_threads);
        for worker in 0..indexer_threads {
            let contig_rx = contig_rx.clone();
            let indexed_tx = indexed_tx.clone();
            indexer_handles.push(scope.spawn(move || run_indexer(worker, contig_rx, indexed_tx)));
        }
        drop(contig_rx);
        drop(indexed_tx);

        let mut matcher_handles = Vec::with_capacity(threads);
        for worker in 0..threads {
            let indexed_rx = indexed_rx.clone();
            let amplicon_tx = amplicon_tx.clone();
            let file_name = file_name.to_string();
            matcher_handles.push(scope.spawn(move || {
                run_matcher(worker, indexed_rx, amplicon_tx, &file_name, primers, max_sequence)
            }));
        }
        drop(indexed_rx);
        drop(amplicon_tx);

        for amplicon in amplicon_rx.iter() {
            sink(amplicon);
        }

        for handle in indexer_handles {
            handle.join().expect("indexer thread panicked");
        }
        let mut match_error = None;
        for handle in matcher_handles {
            if let Err(e) = handle.join().expect("matcher thread panicked") {
                match_error.get_or_insert(e);
            }
        }
        if let Err(e) = producer_handle.join().expect("producer thread panicked") {
            match_error.get_or_insert(e);
        }

        match match_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

fn run_producer<R: BufRead>(reader: R, contig_tx: Sender<Contig>) -> Result<(), Error> {
    let mut result = Ok(());
    for contig in FastaSource::new(reader) {
        match contig {
            Ok(contig) => {
                log::debug!("producer: read contig {:?}", String::from_utf8_lossy(&contig.descriptor));
                if contig_tx.send(contig).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!("producer: failed reading FASTA input: {e}");
                result = Err(Error::from(e));
                break;
            }
        }
    }
    log::debug!("producer: shutdown");
    result
}

fn run_indexer(worker: usize, contig_rx: Receiver<Contig>, indexed_tx: Sender<IndexedContig>) {
    for contig in contig_rx.iter() {
        log::debug!(
            "indexer[{worker}]: start index {:?} ({} bytes)",
            String::from_utf8_lossy(&contig.descriptor),
            contig.sequence.len()
        );
        let suffix_array = index::build_suffix_array(&contig.sequence);
        if indexed_tx
            .send(IndexedContig {
                contig,
                suffix_array,
            })
            .is_err()
        {
            break;
        }
    }
    log::debug!("indexer[{worker}]: shutdown");
}

fn run_matcher(
    worker: usize,
    indexed_rx: Receiver<IndexedContig>,
    amplicon_tx: Sender<Amplicon>,
    file_name: &str,
    primers: &PrimerList,
    max_sequence: usize,
) -> Result<(), Error> {
    for indexed in indexed_rx.iter() {
        log::debug!(
            "matcher[{worker}]: start match {:?}",
            String::from_utf8_lossy(&indexed.contig.descriptor)
        );
        let amplicons = amplicon::enumerate_amplicons(
            file_name,
            &indexed.contig,
            &indexed.suffix_array,
            primers,
            max_sequence,
        )?;
        for amplicon in amplicons {
            if amplicon_tx.send(amplicon).is_err() {
                break;
            }
        }
    }
    log::debug!("matcher[{worker}]: shutdown");
    Ok(())
}

/// Returns the basename of `path`, falling back to the full path if it
/// has no file-name component (spec.md §4.G: output's `filename` field).
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    fn primers(text: &str) -> PrimerList {
        PrimerList::read(Cursor::new(text.as_bytes())).unwrap()
    }

    #[test]
    fn end_to_end_single_contig() {
        let fasta = ">c1\nAAAACGTTTTGCAT\n";
        let list = primers("ACGT f1\n\nATGC r1\n");
        let collected = Mutex::new(Vec::new());

        run(
            Cursor::new(fasta.as_bytes()),
            "ref.fa",
            &list,
            4,
            0,
            |amplicon| collected.lock().unwrap().push(amplicon),
        )
        .unwrap();

        let collected = collected.into_inner().unwrap();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].orientation, '+');
        assert_eq!(collected[0].start, 3);
        assert_eq!(collected[0].end, 14);
    }

    #[test]
    fn processes_multiple_contigs() {
        let fasta = ">c1\nAAAACGTTTTGCAT\n>c2\nATGCAAAACGT\n";
        let list = primers("ACGT f1\n\nATGC r1\n");
        let collected = Mutex::new(Vec::new());

        run(
            Cursor::new(fasta.as_bytes()),
            "ref.fa",
            &list,
            4,
            0,
            |amplicon| collected.lock().unwrap().push(amplicon),
        )
        .unwrap();

        let collected = collected.into_inner().unwrap();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn basename_strips_directory() {
        assert_eq!(basename(Path::new("/tmp/refs/genome.fa")), "genome.fa");
        assert_eq!(basename(Path::new("genome.fa")), "genome.fa");
    }

    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        }
    }

    #[test]
    fn surfaces_producer_io_error() {
        let list = primers("ACGT f1\n\nATGC r1\n");

        let err = run(
            std::io::BufReader::new(FailingReader),
            "ref.fa",
            &list,
            2,
            0,
            |_| {},
        )
        .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
    }
}
