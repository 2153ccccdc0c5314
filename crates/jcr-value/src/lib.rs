//! # Serialized import values
//!
//! While a System View or Document View XML document is imported, the character data of every
//! property value arrives in chunks of unknown total length. This crate accumulates those chunks
//! and hands them to the importer as a [`Value`].
//!
//! - [`StringValue`] wraps a string that is already complete, e.g. an attribute value.
//! - [`BufferedStringValue`] is appended to while parsing. It starts out in memory and moves to a
//!   temporary file once it exceeds [`MAX_BUFFER_SIZE`](buffered::MAX_BUFFER_SIZE) characters.

pub mod buffered;
mod error;
mod reader;
mod string;

pub use buffered::BufferedStringValue;
pub use error::{ValueError, ValueErrorKind};
pub use reader::TextReader;
pub use string::StringValue;

/// A serialized property value read from an import XML document.
pub trait TextValue {
    /// Returns the length of the serialized value in characters.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::Disposed`] after disposal or [`ValueError::Io`] on storage errors.
    fn length(&self) -> Result<u64, ValueError>;

    /// Retrieves the serialized value.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::TooLarge`] when the value doesn't fit in a [`String`]. Use
    /// [`reader`](TextValue::reader) instead in that case.
    fn retrieve(&mut self) -> Result<String, ValueError>;

    /// Returns a fresh [`TextReader`] for reading the serialized value from the start.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::Disposed`] after disposal or [`ValueError::Io`] on storage errors.
    fn reader(&mut self) -> Result<TextReader, ValueError>;
}

/// A [`TextValue`] that can be appended to.
///
/// **Important**: call [`dispose`](AppendableValue::dispose) to free resources as soon as the value
/// isn't used anymore.
pub trait AppendableValue: TextValue {
    /// Appends `length` characters of `chars` starting at `start`.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::BadArgument`] if the region is out of bounds,
    /// [`ValueError::Closed`] after [`close`](AppendableValue::close) and [`ValueError::Disposed`]
    /// after [`dispose`](AppendableValue::dispose).
    fn append(&mut self, chars: &[char], start: usize, length: usize) -> Result<(), ValueError>;

    /// Closes this value. Further appends fail, reading is still possible.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::Disposed`] after disposal or [`ValueError::Io`] if flushing fails.
    fn close(&mut self) -> Result<(), ValueError>;

    /// Disposes this value, i.e. frees all bound resources. Every later call fails with
    /// [`ValueError::Disposed`], including another `dispose`.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::Io`] if the temporary file can't be closed or deleted.
    fn dispose(&mut self) -> Result<(), ValueError>;
}

/// Any serialized value carried by a property
#[derive(Debug)]
pub enum Value {
    String(StringValue),
    Buffered(BufferedStringValue),
}

impl Value {
    /// Returns the value as an [`AppendableValue`] if it is one.
    pub fn as_appendable_mut(&mut self) -> Option<&mut dyn AppendableValue> {
        match self {
            Self::String(_) => None,
            Self::Buffered(value) => Some(value),
        }
    }
}

impl TextValue for Value {
    fn length(&self) -> Result<u64, ValueError> {
        match self {
            Self::String(value) => value.length(),
            Self::Buffered(value) => value.length(),
        }
    }

    fn retrieve(&mut self) -> Result<String, ValueError> {
        match self {
            Self::String(value) => value.retrieve(),
            Self::Buffered(value) => value.retrieve(),
        }
    }

    fn reader(&mut self) -> Result<TextReader, ValueError> {
        match self {
            Self::String(value) => value.reader(),
            Self::Buffered(value) => value.reader(),
        }
    }
}

impl From<StringValue> for Value {
    fn from(value: StringValue) -> Self {
        Self::String(value)
    }
}

impl From<BufferedStringValue> for Value {
    fn from(value: BufferedStringValue) -> Self {
        Self::Buffered(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use pretty_assertions::assert_eq;

    use super::*;

    fn check_consistent(value: &mut Value) {
        let retrieved = value.retrieve().unwrap();
        assert_eq!(value.length().unwrap(), retrieved.chars().count() as u64);

        let mut read = String::new();
        value.reader().unwrap().read_to_string(&mut read).unwrap();
        assert_eq!(read, retrieved);
    }

    #[test]
    fn dispatch() {
        let mut string = Value::from("mix:referenceable");
        assert!(string.as_appendable_mut().is_none());
        check_consistent(&mut string);

        let mut buffered = Value::from(BufferedStringValue::new());
        let appendable = buffered.as_appendable_mut().unwrap();
        appendable.append(&['4', '2'], 0, 2).unwrap();
        appendable.close().unwrap();
        check_consistent(&mut buffered);
        assert_eq!(buffered.retrieve().unwrap(), "42");
    }

    #[test]
    fn spill_is_transparent() {
        let content = (0..1 << 20)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect::<Vec<_>>();
        let dir = tempfile::tempdir().unwrap();

        for chunk_size in [1000, 60_000, 1 << 20] {
            let mut value = BufferedStringValue::with_temp_dir(dir.path());
            for chunk in content.chunks(chunk_size) {
                value.append(chunk, 0, chunk.len()).unwrap();
            }
            value.close().unwrap();
            assert!(value.is_spilled());

            let mut value = Value::from(value);
            check_consistent(&mut value);
            assert_eq!(value.retrieve().unwrap(), content.iter().collect::<String>());
            value.as_appendable_mut().unwrap().dispose().unwrap();
        }
    }
}
