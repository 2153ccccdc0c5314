//! [`BufferedStringValue`], an appendable value that moves itself from memory to a temporary file
//! once it grows past [`MAX_BUFFER_SIZE`].

use std::{
    io::{BufReader, BufWriter, Read, Take, Write},
    path::{Path, PathBuf},
};

use fs_err::File;
use tempfile::TempPath;
use tracing::debug;

use crate::{AppendableValue, TextReader, TextValue, ValueError};

/// Maximum number of characters kept in memory before spilling to a temporary file
pub const MAX_BUFFER_SIZE: usize = 0x10000;
/// Growth step of the in-memory buffer
pub const BUFFER_INCREMENT: usize = 0x2000;
/// Capacity of the in-memory buffer of a new value
pub const INITIAL_BUFFER_SIZE: usize = 0x2000;

/// Prefix of the temporary file names
const TEMP_FILE_PREFIX: &str = "txt";
/// Read and write buffer size for the temporary file
const CHUNK_SIZE: usize = 0x2000;

/// An appendable serialized value that is either buffered in memory or backed by a temporary file
/// if its size exceeds [`MAX_BUFFER_SIZE`].
///
/// **Important**: call [`dispose`](AppendableValue::dispose) as soon as the value isn't used
/// anymore. Dropping a value that hasn't been disposed still removes its temporary file.
#[derive(Debug)]
pub struct BufferedStringValue {
    state: State,
    /// Where to create the temporary file. `None` is the process' temporary directory.
    temp_dir: Option<PathBuf>,
    closed: bool,
}

#[derive(Debug)]
enum State {
    /// `buffer.len()` is the amount of appended characters
    Memory { buffer: Vec<char> },
    Spilled(Spill),
    Disposed,
}

#[derive(Debug)]
struct Spill {
    /// `None` once closed.
    ///
    /// NOTE: declared before `path` so the file is closed before it's deleted on drop
    writer: Option<BufWriter<std::fs::File>>,
    path: TempPath,
    /// Characters written so far
    chars: u64,
    /// UTF-8 bytes written so far
    bytes: u64,
}

impl Spill {
    fn create(
        temp_dir: Option<&Path>,
        buffered: &[char],
        chunk: &[char],
    ) -> Result<Self, ValueError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX);
        let file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, path) = file.into_parts();
        debug!(
            path = %path.display(),
            chars = buffered.len() + chunk.len(),
            "spilling value to temporary file"
        );

        let mut spill = Self {
            writer: Some(BufWriter::with_capacity(CHUNK_SIZE, file)),
            path,
            chars: 0,
            bytes: 0,
        };
        spill.write(buffered)?;
        spill.write(chunk)?;
        Ok(spill)
    }

    fn write(&mut self, chunk: &[char]) -> Result<(), ValueError> {
        let writer = self.writer.as_mut().ok_or(ValueError::Closed)?;
        let encoded = chunk.iter().collect::<String>();
        writer.write_all(encoded.as_bytes())?;
        self.chars += chunk.len() as u64;
        self.bytes += encoded.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ValueError> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    /// Flushes and drops the writer. The writer is kept if flushing fails, so closing can be
    /// retried without losing buffered characters.
    fn close(&mut self) -> Result<(), ValueError> {
        self.flush()?;
        self.writer = None;
        Ok(())
    }

    /// Opens the file for reading, limited to what has been written so far.
    fn open(&mut self) -> Result<Take<fs_err::File>, ValueError> {
        self.flush()?;
        Ok(File::open(&*self.path)?.take(self.bytes))
    }

    /// Closes the writer and deletes the file, even if closing fails.
    fn delete(mut self) -> Result<(), ValueError> {
        let closed = self.close();
        let deleted = self.path.close();
        closed?;
        Ok(deleted?)
    }
}

impl BufferedStringValue {
    /// Creates an empty value that spills to the process' temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Memory {
                buffer: Vec::with_capacity(INITIAL_BUFFER_SIZE),
            },
            temp_dir: None,
            closed: false,
        }
    }

    /// Creates an empty value that spills to `temp_dir`.
    #[must_use]
    pub fn with_temp_dir(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: Some(temp_dir.into()),
            ..Self::new()
        }
    }

    /// Appends a whole string.
    ///
    /// # Errors
    ///
    /// See [`AppendableValue::append`].
    pub fn append_str(&mut self, s: &str) -> Result<(), ValueError> {
        let chars = s.chars().collect::<Vec<_>>();
        self.append(&chars, 0, chars.len())
    }

    /// Returns whether the value is backed by a temporary file.
    #[must_use]
    pub fn is_spilled(&self) -> bool {
        matches!(self.state, State::Spilled(_))
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self.state, State::Disposed)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Capacity of the in-memory buffer, or `None` when the value isn't in memory.
    #[must_use]
    pub fn buffer_capacity(&self) -> Option<usize> {
        match &self.state {
            State::Memory { buffer } => Some(buffer.capacity()),
            _ => None,
        }
    }

    /// Path of the backing temporary file, if the value has spilled.
    #[must_use]
    pub fn temp_path(&self) -> Option<&Path> {
        match &self.state {
            State::Spilled(spill) => Some(&spill.path),
            _ => None,
        }
    }
}

impl Default for BufferedStringValue {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `start..start + length` lies within `chars`.
fn region(chars: &[char], start: usize, length: usize) -> Result<&[char], ValueError> {
    start
        .checked_add(length)
        .and_then(|end| chars.get(start..end))
        .ok_or(ValueError::BadArgument {
            start,
            length,
            available: chars.len(),
        })
}

/// Converts a byte count into the capacity of a `String` holding that many bytes.
fn string_capacity(bytes: u64) -> Result<usize, ValueError> {
    isize::try_from(bytes)
        .ok()
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or(ValueError::TooLarge { length: bytes })
}

impl TextValue for BufferedStringValue {
    fn length(&self) -> Result<u64, ValueError> {
        match &self.state {
            State::Memory { buffer } => Ok(buffer.len() as u64),
            State::Spilled(spill) => Ok(spill.chars),
            State::Disposed => Err(ValueError::Disposed),
        }
    }

    fn retrieve(&mut self) -> Result<String, ValueError> {
        match &mut self.state {
            State::Memory { buffer } => Ok(buffer.iter().collect()),
            State::Spilled(spill) => {
                let capacity = string_capacity(spill.bytes)?;
                let mut reader = BufReader::with_capacity(CHUNK_SIZE, spill.open()?);
                let mut value = String::with_capacity(capacity);
                reader.read_to_string(&mut value)?;
                Ok(value)
            }
            State::Disposed => Err(ValueError::Disposed),
        }
    }

    fn reader(&mut self) -> Result<TextReader, ValueError> {
        match &mut self.state {
            State::Memory { buffer } => Ok(TextReader::from_string(buffer.iter().collect())),
            State::Spilled(spill) => {
                let file = spill.open()?;
                Ok(TextReader::File(BufReader::with_capacity(CHUNK_SIZE, file)))
            }
            State::Disposed => Err(ValueError::Disposed),
        }
    }
}

impl AppendableValue for BufferedStringValue {
    fn append(&mut self, chars: &[char], start: usize, length: usize) -> Result<(), ValueError> {
        if self.is_disposed() {
            return Err(ValueError::Disposed);
        }
        if self.closed {
            return Err(ValueError::Closed);
        }
        let chunk = region(chars, start, length)?;

        match &mut self.state {
            State::Memory { buffer } => {
                let required = buffer.len() + chunk.len();
                if required > MAX_BUFFER_SIZE {
                    // threshold for keeping data in memory exceeded
                    let spill = Spill::create(self.temp_dir.as_deref(), buffer, chunk)?;
                    self.state = State::Spilled(spill);
                } else {
                    if required > buffer.capacity() {
                        let capacity = (buffer.capacity() + BUFFER_INCREMENT).max(required);
                        buffer.reserve_exact(capacity - buffer.len());
                    }
                    buffer.extend_from_slice(chunk);
                }
                Ok(())
            }
            State::Spilled(spill) => spill.write(chunk),
            State::Disposed => Err(ValueError::Disposed),
        }
    }

    fn close(&mut self) -> Result<(), ValueError> {
        match &mut self.state {
            State::Memory { .. } => {}
            State::Spilled(spill) => spill.close()?,
            State::Disposed => return Err(ValueError::Disposed),
        }
        self.closed = true;
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), ValueError> {
        match std::mem::replace(&mut self.state, State::Disposed) {
            State::Memory { .. } => Ok(()),
            State::Spilled(spill) => spill.delete(),
            State::Disposed => Err(ValueError::Disposed),
        }
    }
}
