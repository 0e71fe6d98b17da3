use super::bytes::LineReader;
use super::ReadErr;
use crate::record::SequenceRecord;
use std::io::BufRead;

/// Lazily parses FASTA records. A record starts at a `>` line and extends over every
/// following line until the next `>` or EOF.
pub struct FastaReader<R: BufRead> {
    lines: LineReader<R>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
            done: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<SequenceRecord>, ReadErr> {
        self.lines.skip_blank_lines()?;

        let header = match self.lines.next_line()? {
            None => return Ok(None),
            Some(line) => match line.strip_prefix('>') {
                Some(header) => header.to_string(),
                None => {
                    return Err(ReadErr::MalformedRecord {
                        line: self.lines.line(),
                        msg: format!("expected a `>` header, got `{line}`"),
                    })
                }
            },
        };

        let mut seq = String::new();
        while let Some(line) = self.lines.peek_line()? {
            if line.starts_with('>') {
                break;
            }
            seq.push_str(line.trim_end());
            self.lines.next_line()?;
        }

        Ok(Some(SequenceRecord {
            header,
            seq,
            qual: None,
        }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
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
