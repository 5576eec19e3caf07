use std::io::BufRead;

/// A line-oriented source of input for `READ`. Lines are handed back
/// without their terminator; end of stream is signalled by `None`.
///
/// The executor consumes lines through this trait without caring whether
/// they come from a file or stdin — the concrete stream is selected by the
/// CLI front-end.
pub trait InputReader {
    fn read_line(&mut self) -> Option<String>;
}

/// The default [`InputReader`] over anything implementing [`BufRead`].
pub struct LineReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(source: R) -> LineReader<R> {
        LineReader { source }
    }
}

impl<R: BufRead> InputReader for LineReader<R> {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.source.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_without_terminator() {
        let mut reader = LineReader::new(Cursor::new(b"first\r\nsecond\nlast".to_vec()));
        assert_eq!(reader.read_line(), Some("first".to_owned()));
        assert_eq!(reader.read_line(), Some("second".to_owned()));
        assert_eq!(reader.read_line(), Some("last".to_owned()));
        assert_eq!(reader.read_line(), None);
    }

    #[test]
    fn empty_source_is_eof() {
        let mut reader = LineReader::new(Cursor::new(b"".to_vec()));
        assert_eq!(reader.read_line(), None);
    }
}
