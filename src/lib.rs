//! In silico PCR amplicon discovery: given degenerate forward/reverse
//! primers and a FASTA reference, enumerate every candidate amplicon a
//! primer pair could produce, within a configurable maximum length.

pub mod alphabet;
pub mod amplicon;
pub mod cli;
pub mod error;
pub mod fasta;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod primer;

pub use amplicon::{Amplicon, PrimerMatch};
pub use error::{Error, Result};
pub use fasta::{Contig, FastaSource};
pub use primer::{Primer, PrimerList};
