//! IUPAC nucleotide codes: complement table and degenerate expansion.

use crate::error::Error;

/// Complement of a single IUPAC byte, covering the canonical bases plus
/// `U` and the degeneracy codes. Unknown bytes have no complement.
pub fn complement(base: u8) -> Option<u8> {
    match base.to_ascii_uppercase() {
        b'A' => Some(b'T'),
        b'C' => Some(b'G'),
        b'G' => Some(b'C'),
        b'T' => Some(b'A'),
        b'U' => Some(b'A'),
        b'M' => Some(b'K'),
        b'R' => Some(b'Y'),
        b'W' => Some(b'W'),
        b'S' => Some(b'S'),
        b'Y' => Some(b'R'),
        b'K' => Some(b'M'),
        b'V' => Some(b'B'),
        b'H' => Some(b'D'),
        b'D' => Some(b'H'),
        b'B' => Some(b'V'),
        b'N' => Some(b'N'),
        _ => None,
    }
}

/// Reverses `seq` and complements each byte. The index in a resulting
/// `InvalidSequence` error refers to the position in the *original*,
/// unreversed sequence, matching the Go source's error message.
pub fn reverse_complement(seq: &[u8]) -> Result<Vec<u8>, Error> {
    let len = seq.len();
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let idx = len - i - 1;
        match complement(seq[idx]) {
            Some(c) => out.push(c),
            None => {
                return Err(Error::InvalidSequence {
                    byte: seq[idx],
                    index: idx,
                    sequence: String::from_utf8_lossy(seq).into_owned(),
                });
            }
        }
    }
    Ok(out)
}

/// All concrete bases a single IUPAC byte can stand for. `U` expands to
/// `T` (this is expansion, not complement); `N` and `-` expand to the
/// full alphabet.
fn degenerate_bases(base: u8) -> Option<&'static [u8]> {
    match base.to_ascii_uppercase() {
        b'A' => Some(&[b'A']),
        b'C' => Some(&[b'C']),
        b'G' => Some(&[b'G']),
        b'T' | b'U' => Some(&[b'T']),
        b'W' => Some(&[b'A', b'T']),
        b'S' => Some(&[b'G', b'C']),
        b'M' => Some(&[b'A', b'C']),
        b'K' => Some(&[b'G', b'T']),
        b'R' => Some(&[b'A', b'G']),
        b'Y' => Some(&[b'C', b'T']),
        b'B' => Some(&[b'C', b'G', b'T']),
        b'D' => Some(&[b'A', b'G', b'T']),
        b'H' => Some(&[b'A', b'C', b'T']),
        b'V' => Some(&[b'A', b'C', b'G']),
        b'N' | b'-' => Some(&[b'A', b'C', b'G', b'T']),
        _ => None,
    }
}

/// Cartesian product of `degenerate_bases` across every position in
/// `seq`, producing every concrete expansion in positional order. An
/// unrecognized byte is a fatal condition for a primer sequence, surfaced
/// as `InvalidPrimerBase` (the Go source panics here instead).
pub fn expand_degenerate(seq: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    if seq.is_empty() {
        return Ok(Vec::new());
    }

    let mut expansions: Vec<Vec<u8>> = vec![Vec::with_capacity(seq.len())];
    for &base in seq {
        let Some(choices) = degenerate_bases(base) else {
            return Err(Error::InvalidPrimerBase {
                byte: base,
                sequence: String::from_utf8_lossy(seq).into_owned(),
            });
        };

        let mut next = Vec::with_capacity(expansions.len() * choices.len());
        for prefix in &expansions {
            for &choice in choices {
                let mut extended = prefix.clone();
                extended.push(choice);
                next.push(extended);
            }
        }
        expansions = next;
    }

    Ok(expansions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_covers_degeneracy_codes() {
        assert_eq!(complement(b'A'), Some(b'T'));
        assert_eq!(complement(b'U'), Some(b'A'));
        assert_eq!(complement(b'R'), Some(b'Y'));
        assert_eq!(complement(b'N'), Some(b'N'));
        assert_eq!(complement(b'X'), None);
    }

    #[test]
    fn reverse_complement_is_an_involution() {
        let seq = b"ACGTACGT";
        let rc = reverse_complement(seq).unwrap();
        let rc2 = reverse_complement(&rc).unwrap();
        assert_eq!(rc2, seq);
    }

    #[test]
    fn reverse_complement_reports_original_index() {
        let err = reverse_complement(b"ACXT").unwrap_err();
        match err {
            Error::InvalidSequence { byte, index, .. } => {
                assert_eq!(byte, b'X');
                assert_eq!(index, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expand_degenerate_simple_bases() {
        let expansions = expand_degenerate(b"ACGT").unwrap();
        assert_eq!(expansions, vec![b"ACGT".to_vec()]);
    }

    #[test]
    fn expand_degenerate_cartesian_product() {
        let expansions = expand_degenerate(b"ARG").unwrap();
        let as_strings: Vec<String> = expansions
            .iter()
            .map(|e| String::from_utf8(e.clone()).unwrap())
            .collect();
        assert_eq!(as_strings, vec!["AAG", "AGG"]);
    }

    #[test]
    fn expand_degenerate_n_and_dash_cover_all_bases() {
        assert_eq!(expand_degenerate(b"N").unwrap().len(), 4);
        assert_eq!(expand_degenerate(b"-").unwrap().len(), 4);
    }

    #[test]
    fn expand_degenerate_unrecognized_byte_errors() {
        let err = expand_degenerate(b"AZT").unwrap_err();
        assert!(matches!(err, Error::InvalidPrimerBase { byte: b'Z', .. }));
    }
}
