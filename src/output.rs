//! Serializes amplicon records as tab-separated text (spec.md §4.G).

use std::io::{self, Write};

use crate::amplicon::Amplicon;

/// Writes one tab-separated line per amplicon to `out`, in the field
/// order spec.md §4.G defines. Callers are expected to wrap `out` in a
/// `BufWriter` and flush once after the whole run, the way the teacher's
/// `emit_hits` does.
pub fn write_amplicon<W: Write>(out: &mut W, amplicon: &Amplicon) -> io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        amplicon.orientation,
        String::from_utf8_lossy(&amplicon.forward_label),
        String::from_utf8_lossy(&amplicon.reverse_label),
        String::from_utf8_lossy(&amplicon.bases),
        amplicon.start,
        amplicon.end,
        amplicon.length,
        amplicon.file,
        String::from_utf8_lossy(&amplicon.contig_identifier),
    )
}
