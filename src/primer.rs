//! Primer records and the two-section primer list loader.

use std::io::BufRead;

use crate::alphabet::{expand_degenerate, reverse_complement};
use crate::error::Error;

/// A single primer: its raw (uppercase) sequence, an opaque label, and the
/// eagerly-computed concrete expansions of both the sequence and its
/// reverse complement.
#[derive(Debug, Clone)]
pub struct Primer {
    pub label: Vec<u8>,
    pub sequence: Vec<u8>,
    pub expansions: Vec<Vec<u8>>,
    pub rc_expansions: Vec<Vec<u8>>,
}

impl Primer {
    /// `sequence` is uppercased before expansion; `label` is carried
    /// through byte-for-byte (it may be lowercase — see
    /// `PrimerList::read`'s no-whitespace case).
    pub fn new(sequence: &[u8], label: Vec<u8>) -> Result<Self, Error> {
        let sequence: Vec<u8> = sequence.to_ascii_uppercase();
        let rc = reverse_complement(&sequence)?;
        let expansions = expand_degenerate(&sequence)?;
        let rc_expansions = expand_degenerate(&rc)?;

        Ok(Self {
            label,
            sequence,
            expansions,
            rc_expansions,
        })
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Forward and reverse primer batches loaded from a primer list file.
#[derive(Debug, Clone, Default)]
pub struct PrimerList {
    pub forward: Vec<Primer>,
    pub reverse: Vec<Primer>,
}

impl PrimerList {
    /// Reads the two-section list format from spec.md §4.B / §6: a block
    /// of forward primer lines, one blank line, a block of reverse primer
    /// lines. A second blank line would start an undefined third section
    /// in the original Go source (spec.md §9 quirk #3); here it is
    /// rejected as `InvalidFormat` instead of silently toggling back to
    /// "forward".
    pub fn read<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut list = PrimerList::default();
        let mut section = Section::Forward;
        let mut blank_count = 0usize;

        for line in reader.lines() {
            let line = line.map_err(|e| Error::InvalidFormat(e.to_string()))?;

            if line.is_empty() {
                blank_count += 1;
                if blank_count == 1 {
                    section = section.toggle();
                }
                continue;
            }

            if blank_count >= 2 {
                return Err(Error::InvalidFormat(
                    "no primer data may follow a second blank line in the primer list"
                        .to_string(),
                ));
            }

            let (sequence, label) = split_primer_line(&line);
            let primer = Primer::new(sequence.as_bytes(), label)?;
            log::debug!(
                "add {:?} primer {}",
                section,
                String::from_utf8_lossy(&primer.label)
            );
            match section {
                Section::Forward => list.forward.push(primer),
                Section::Reverse => list.reverse.push(primer),
            }
        }

        if list.forward.is_empty() || list.reverse.is_empty() {
            return Err(Error::InvalidFormat(
                "at least one forward and one reverse primer sequence is required".to_string(),
            ));
        }

        Ok(list)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Forward,
    Reverse,
}

impl Section {
    fn toggle(self) -> Self {
        match self {
            Section::Forward => Section::Reverse,
            Section::Reverse => Section::Forward,
        }
    }
}

/// Splits a primer line at the first whitespace byte. The left token is
/// uppercased to become `sequence`; the right token, trimmed, becomes
/// `label`. A line with no whitespace uses the *original*, un-uppercased
/// bytes as the label (spec.md §9 quirk #2).
fn split_primer_line(line: &str) -> (String, Vec<u8>) {
    match line.find(|c: char| c.is_whitespace()) {
        Some(idx) => {
            let sequence = line[..idx].to_ascii_uppercase();
            let label = line[idx..].trim().as_bytes().to_vec();
            (sequence, label)
        }
        None => (line.to_ascii_uppercase(), line.as_bytes().to_vec()),
    }
}
