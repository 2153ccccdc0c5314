use std::io::{self, BufRead, BufReader, Cursor, Read, Take};

/// A character stream over a serialized value, starting at offset 0.
///
/// The characters are yielded UTF-8 encoded, so draining the reader with
/// [`Read::read_to_string`] gives back exactly what
/// [`TextValue::retrieve`](crate::TextValue::retrieve) returns.
#[derive(Debug)]
pub enum TextReader {
    /// Snapshot of an in-memory value
    Memory(Cursor<String>),
    /// Temporary file, limited to the bytes written when the reader was opened
    File(BufReader<Take<fs_err::File>>),
}

impl TextReader {
    pub(crate) fn from_string(value: String) -> Self {
        Self::Memory(Cursor::new(value))
    }
}

impl Read for TextReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Memory(cursor) => cursor.read(buf),
            Self::File(file) => file.read(buf),
        }
    }
}

impl BufRead for TextReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Memory(cursor) => cursor.fill_buf(),
            Self::File(file) => file.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Memory(cursor) => cursor.consume(amt),
            Self::File(file) => file.consume(amt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_lines() {
        let reader = TextReader::from_string("first\nsecond".to_owned());
        let lines = reader.lines().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(lines, ["first", "second"]);
    }
}
