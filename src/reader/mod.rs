use crate::record::{Format, SequenceRecord};
use anyhow::Context;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

pub mod bytes;
pub mod fasta;
pub mod fastq;

use bytes::{GenericBufReader, LineReader};
use fasta::FastaReader;
use fastq::FastqReader;

/// File suffixes which are transparently decompressed.
const GZIP_SUFFIXES: [&str; 2] = [".gz", ".bgz"];

#[derive(Error, Debug)]
pub enum ReadErr {
    #[error("cannot guess file type: first line starts with neither `>` nor `@`: `{first_line}`")]
    UnrecognizedFormat { first_line: String },

    #[error("fastq record starting at line {line} is truncated: expected 4 lines")]
    TruncatedRecord { line: usize },

    #[error("malformed record at line {line}: {msg}")]
    MalformedRecord { line: usize, msg: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Opens `path` for reading, wrapping it in a gzip decoder if it carries a compressed
/// suffix.
pub fn open_input(path: &str) -> anyhow::Result<GenericBufReader> {
    let file =
        File::open(Path::new(path)).with_context(|| format!("Unable to open file {path}"))?;

    let inner: Box<dyn Read> = if GZIP_SUFFIXES.iter().any(|s| path.ends_with(s)) {
        debug!("Decompressing {path} as gzip");
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    Ok(BufReader::new(inner))
}

/// Classifies a stream by the marker on its first non-empty line.
pub fn detect_format(reader: impl BufRead) -> Result<Format, ReadErr> {
    let mut lines = LineReader::new(reader);
    lines.skip_blank_lines()?;

    let first_line = lines.next_line()?.unwrap_or_default();
    match first_line.chars().next() {
        Some('>') => Ok(Format::Fasta),
        Some('@') => Ok(Format::Fastq),
        _ => Err(ReadErr::UnrecognizedFormat { first_line }),
    }
}

/// Detects the format of the file at `path`. The file is opened just for detection and
/// closed again, so callers reopen it and read from the first byte.
pub fn detect_file_format(path: &str) -> anyhow::Result<Format> {
    let reader = open_input(path)?;
    let format =
        detect_format(reader).with_context(|| format!("Unable to detect format of {path}"))?;
    Ok(format)
}

/// A lazy stream of records from either parser.
pub enum Records<R: BufRead> {
    Fasta(FastaReader<R>),
    Fastq(FastqReader<R>),
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R, format: Format) -> Self {
        match format {
            Format::Fasta => Records::Fasta(FastaReader::new(reader)),
            Format::Fastq => Records::Fastq(FastqReader::new(reader)),
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<SequenceRecord, ReadErr>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Records::Fasta(r) => r.next(),
            Records::Fastq(r) => r.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_by_marker() {
        assert_eq!(detect_format(">A\nAC\n".as_bytes()).unwrap(), Format::Fasta);
        assert_eq!(detect_format("\n\n@r\nA\n+\nI\n".as_bytes()).unwrap(), Format::Fastq);
    }

    #[test]
    fn unrecognized_format() {
        let err = detect_format("ACGT\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadErr::UnrecognizedFormat { ref first_line } if first_line == "ACGT"));

        let err = detect_format("".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadErr::UnrecognizedFormat { .. }));
    }

    #[test]
    fn detection_does_not_consume_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fastq");
        std::fs::write(&path, "@r1\nAC\n+\nII\n").unwrap();
        let path = path.to_str().unwrap();

        let format = detect_file_format(path).unwrap();
        assert_eq!(format, Format::Fastq);

        let records: Vec<_> = Records::new(open_input(path).unwrap(), format)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identifier(), "r1");
    }

    #[test]
    fn gzip_input_is_decompressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seqs.fa.gz");

        let mut encoder = flate2::write::GzEncoder::new(
            std::fs::File::create(&path).unwrap(),
            flate2::Compression::default(),
        );
        encoder.write_all(b">A desc\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let path = path.to_str().unwrap();
        assert_eq!(detect_file_format(path).unwrap(), Format::Fasta);
        let records: Vec<_> = Records::new(open_input(path).unwrap(), Format::Fasta)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(records[0].header, "A desc");
        assert_eq!(records[0].seq, "ACGT");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = match open_input("file_which_does_not_exist.fasta") {
            Err(e) => e,
            Ok(_) => panic!("opening a missing file should fail"),
        };
        assert!(format!("{err}").contains("file_which_does_not_exist.fasta"));
    }
}
