use std::fmt;
use std::io::Write;

use thiserror::Error;

/// The two sequence file formats understood by fastfilter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Fasta,
    Fastq,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Fasta => write!(f, "fasta"),
            Format::Fastq => write!(f, "fastq"),
        }
    }
}

/// A single FASTA or FASTQ record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// The full header line, without the leading marker or line terminator
    pub header: String,
    /// Residues; multi-line FASTA sequences are concatenated
    pub seq: String,
    /// Quality string, only present for FASTQ records
    pub qual: Option<String>,
}

#[derive(Error, Debug)]
pub enum WriteErr {
    #[error("record `{id}` has no quality scores and cannot be written as fastq")]
    MissingQuality { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SequenceRecord {
    /// The first whitespace-delimited token of the header. This is the key used for
    /// identifier matching.
    pub fn identifier(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }

    /// Writes the record in the given format.
    ///
    /// Writing a FASTQ record as FASTA drops the separator and quality lines. The reverse
    /// is never synthesised: a record without quality scores fails with
    /// `WriteErr::MissingQuality` when written as FASTQ.
    pub fn write(&self, writer: &mut impl Write, format: Format) -> Result<(), WriteErr> {
        match format {
            Format::Fasta => writeln!(writer, ">{}\n{}", self.header, self.seq)?,
            Format::Fastq => {
                let qual = self.qual.as_ref().ok_or_else(|| WriteErr::MissingQuality {
                    id: self.identifier().to_string(),
                })?;
                writeln!(writer, "@{}\n{}\n+\n{}", self.header, self.seq, qual)?
            }
        }
        Ok(())
    }
}
