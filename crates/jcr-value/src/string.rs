use crate::{TextReader, TextValue, ValueError};

/// An immutable serialized value, e.g. one taken from an XML attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringValue {
    value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<String> for StringValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StringValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl TextValue for StringValue {
    fn length(&self) -> Result<u64, ValueError> {
        Ok(self.value.chars().count() as u64)
    }

    fn retrieve(&mut self) -> Result<String, ValueError> {
        Ok(self.value.clone())
    }

    fn reader(&mut self) -> Result<TextReader, ValueError> {
        Ok(TextReader::from_string(self.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn consistent() {
        let mut value = StringValue::new("nt:unstructured");
        assert_eq!(value.as_str(), "nt:unstructured");
        assert_eq!(value.length().unwrap(), 15);
        assert_eq!(value.retrieve().unwrap(), "nt:unstructured");

        // every reader starts from the beginning
        for _ in 0..2 {
            let mut read = String::new();
            value.reader().unwrap().read_to_string(&mut read).unwrap();
            assert_eq!(read, "nt:unstructured");
        }
    }

    #[test]
    fn length_counts_chars() {
        let value = StringValue::new("Grüße, 世界");
        assert_eq!(value.length().unwrap(), 9);
    }

    #[test]
    fn empty() {
        let mut value = StringValue::from("");
        assert_eq!(value.length().unwrap(), 0);
        assert_eq!(value.retrieve().unwrap(), "");
    }
}
