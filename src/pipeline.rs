use crate::filter::FilterSpec;
use crate::reader::{detect_file_format, open_input, Records};
use crate::record::Format;

use std::io::prelude::*;

use anyhow::{Context, Result};

/// Counts reported at the end of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub read: usize,
    pub kept: usize,
}

/// Streams every record of `input` through `spec`, writing the matches to `writer`.
///
/// # Arguments
///
/// * `input` - path to a FASTA or FASTQ file, optionally gzip-compressed.
/// * `spec` - the filter to apply to each record.
/// * `force_fasta` - write FASTA regardless of the input format.
/// * `writer` - destination for kept records.
///
/// # Errors
///
/// Fails if the input cannot be opened or its format cannot be recognised, if a record is
/// malformed or truncated, or if writing fails. Records written before the error remain
/// valid output.
pub fn run(
    input: &str,
    spec: &FilterSpec,
    force_fasta: bool,
    writer: &mut impl Write,
) -> Result<PipelineSummary> {
    let in_format = detect_file_format(input)?;
    debug!("Reading file {input} as filetype {in_format}");

    let out_format = if force_fasta {
        Format::Fasta
    } else {
        in_format
    };
    debug!("Writing output as {out_format}");

    // the detection handle is closed, so this reads from the start of the file again
    let reader = open_input(input)?;
    let mut summary = PipelineSummary::default();

    for rec in Records::new(reader, in_format) {
        let rec = rec.with_context(|| format!("Unable to parse {input}"))?;
        summary.read += 1;

        if spec.matches(&rec) {
            rec.write(writer, out_format)?;
            summary.kept += 1;
        }
    }

    writer.flush()?;
    Ok(summary)
}
