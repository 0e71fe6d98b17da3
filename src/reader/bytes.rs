use std::io::{BufRead, BufReader, Read};

pub type GenericBufReader = BufReader<Box<dyn Read>>;

/// Line-oriented reader which tracks the current line number and allows a single line of
/// lookahead, which the FASTA parser needs to find the end of a multi-line record.
pub struct LineReader<R: BufRead> {
    reader: R,
    peeked: Option<String>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            line: 0,
        }
    }

    /// 1-based number of the line most recently returned by `next_line`
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next line with its `\n` or `\r\n` terminator removed. Returns `None` at EOF.
    pub fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let line = match self.peeked.take() {
            Some(line) => Some(line),
            None => self.read_line_trim_newline()?,
        };
        if line.is_some() {
            self.line += 1;
        }
        Ok(line)
    }

    /// Returns the next line without consuming it.
    pub fn peek_line(&mut self) -> std::io::Result<Option<&str>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line_trim_newline()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// Skips over blank lines, stopping before the first line with content.
    pub fn skip_blank_lines(&mut self) -> std::io::Result<()> {
        while let Some(line) = self.peek_line()? {
            if !line.trim().is_empty() {
                break;
            }
            self.next_line()?;
        }
        Ok(())
    }

    fn read_line_trim_newline(&mut self) -> std::io::Result<Option<String>> {
        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_terminators_and_counts_lines() {
        let mut reader = LineReader::new("a\r\nb\n\nc".as_bytes());
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(reader.peek_line().unwrap(), Some("b"));
        assert_eq!(reader.line(), 1);
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("b"));
        reader.skip_blank_lines().unwrap();
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(reader.line(), 4);
        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(reader.line(), 4);
    }
}
