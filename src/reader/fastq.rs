use super::bytes::LineReader;
use super::ReadErr;
use crate::record::SequenceRecord;
use std::io::BufRead;

/// Lazily parses FASTQ records, four lines at a time: `@` header, sequence, `+` separator
/// and quality.
pub struct FastqReader<R: BufRead> {
    lines: LineReader<R>,
    done: bool,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            done: false,
        }
    }

    /// Reads a line that must exist because a record has already been started at `start`.
    fn required_line(&mut self, start: usize) -> Result<String, ReadErr> {
        self.lines
            .next_line()?
            .ok_or(ReadErr::TruncatedRecord { line: start })
    }

    fn next_record(&mut self) -> Result<Option<SequenceRecord>, ReadErr> {
        self.lines.skip_blank_lines()?;

        // line 1: header
        let header = match self.lines.next_line()? {
            None => return Ok(None),
            Some(line) => line,
        };
        let start = self.lines.line();
        let header = match header.strip_prefix('@') {
            Some(h) => h.to_string(),
            None => {
                return Err(ReadErr::MalformedRecord {
                    line: start,
                    msg: format!("expected an `@` header, got `{header}`"),
                })
            }
        };

        // line 2: sequence
        let seq = self.required_line(start)?;

        // line 3: separator
        let separator = self.required_line(start)?;
        if !separator.starts_with('+') {
            return Err(ReadErr::MalformedRecord {
                line: self.lines.line(),
                msg: format!("expected a `+` separator, got `{separator}`"),
            });
        }

        // line 4: quality
        let qual = self.required_line(start)?;
        if qual.len() != seq.len() {
            return Err(ReadErr::MalformedRecord {
                line: self.lines.line(),
                msg: format!(
                    "quality length {} does not match sequence length {}",
                    qual.len(),
                    seq.len()
                ),
            });
        }

        Ok(Some(SequenceRecord {
            header,
            seq,
            qual: Some(qual),
        }))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<SequenceRecord, ReadErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_record().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_four_line_records() {
        let input = indoc! {"
            @r1 lane=1
            ACGT
            +
            IIII
            @r2
            GG
            +r2
            #!

        "};
        let records: Vec<_> = FastqReader::new(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header, "r1 lane=1");
        assert_eq!(records[0].identifier(), "r1");
        assert_eq!(records[0].seq, "ACGT");
        assert_eq!(records[0].qual.as_deref(), Some("IIII"));
        assert_eq!(records[1].qual.as_deref(), Some("#!"));
    }

    #[test]
    fn truncated_record_is_an_error() {
        let input = "@r1\nACGT\n+\nIIII\n@r2\nAC\n";
        let mut reader = FastqReader::new(input.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, ReadErr::TruncatedRecord { line: 5 }));
        assert!(reader.next().is_none());
    }

    #[test]
    fn quality_length_must_match() {
        let input = "@r1\nACGT\n+\nIII\n";
        let err = FastqReader::new(input.as_bytes()).next().unwrap().unwrap_err();
        assert!(matches!(err, ReadErr::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn missing_separator_is_an_error() {
        let input = "@r1\nACGT\nIIII\n@r2\n";
        let err = FastqReader::new(input.as_bytes()).next().unwrap().unwrap_err();
        assert!(matches!(err, ReadErr::MalformedRecord { line: 3, .. }));
    }
}
