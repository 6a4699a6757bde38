//! Lazy FASTA reader yielding contigs in file order.

use std::io::{BufRead, Lines};

/// A contig's descriptor and uppercased sequence bytes. `identifier` is
/// the descriptor truncated at its first space, used in output records.
#[derive(Debug, Clone)]
pub struct Contig {
    pub descriptor: Vec<u8>,
    pub sequence: Vec<u8>,
}

impl Contig {
    pub fn identifier(&self) -> &[u8] {
        match self.descriptor.iter().position(|&b| b == b' ') {
            Some(idx) => &self.descriptor[..idx],
            None => &self.descriptor,
        }
    }
}

/// Iterates `(descriptor, sequence)` contigs out of a line-oriented byte
/// stream. A line starting with `>` opens a new contig; everything else is
/// uppercased and appended to the current contig's sequence. Lines before
/// the first `>` are ignored. This mirrors the Go source's `readFasta`
/// goroutine, minus the channel send (the pipeline's producer stage wraps
/// this iterator to do that).
pub struct FastaSource<R: BufRead> {
    lines: Lines<R>,
    pending: Option<Contig>,
    done: bool,
}

impl<R: BufRead> FastaSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: None,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for FastaSource<R> {
    type Item = std::io::Result<Contig>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if let Some(header) = line.strip_prefix('>') {
                        let finished = self.pending.replace(Contig {
                            descriptor: header.as_bytes().to_vec(),
                            sequence: Vec::with_capacity(4096),
                        });
                        if let Some(contig) = finished {
                            return Some(Ok(contig));
                        }
                    } else if let Some(contig) = self.pending.as_mut() {
                        contig.sequence.extend(line.bytes().map(|b| b.to_ascii_uppercase()));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return self.pending.take().map(Ok);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn contigs(text: &str) -> Vec<Contig> {
        FastaSource::new(Cursor::new(text.as_bytes().to_vec()))
            .collect::<std::io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn parses_single_contig() {
        let c = contigs(">c1\nacgtACGT\n");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].descriptor, b"c1");
        assert_eq!(c[0].sequence, b"ACGTACGT");
    }

    #[test]
    fn parses_multiple_contigs_and_multiline_sequences() {
        let c = contigs(">c1 desc one\nAAAA\nCCCC\n>c2\nGGGG\n");
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].descriptor, b"c1 desc one");
        assert_eq!(c[0].sequence, b"AAAACCCC");
        assert_eq!(c[0].identifier(), b"c1");
        assert_eq!(c[1].sequence, b"GGGG");
    }

    #[test]
    fn ignores_lines_before_first_header() {
        let c = contigs("garbage\n>c1\nACGT\n");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].sequence, b"ACGT");
    }

    #[test]
    fn emits_final_contig_without_trailing_newline() {
        let c = contigs(">c1\nACGT");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].sequence, b"ACGT");
    }
}
