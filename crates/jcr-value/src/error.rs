use thiserror::Error;

/// Errors returned by [`TextValue`](crate::TextValue) and
/// [`AppendableValue`](crate::AppendableValue) operations
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("I/O error on temporary value storage")]
    Io(#[from] std::io::Error),

    #[error("this instance has already been disposed")]
    Disposed,

    #[error("this instance has already been closed")]
    Closed,

    #[error("size of value is too big ({length} bytes), use reader()")]
    TooLarge { length: u64 },

    #[error("invalid region {start}+{length} of a {available} character buffer")]
    BadArgument {
        start: usize,
        length: usize,
        available: usize,
    },
}

/// Field-less mirror of [`ValueError`] for matching without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueErrorKind {
    Io,
    Disposed,
    Closed,
    TooLarge,
    BadArgument,
}

impl ValueError {
    #[must_use]
    pub fn kind(&self) -> ValueErrorKind {
        match self {
            Self::Io(_) => ValueErrorKind::Io,
            Self::Disposed => ValueErrorKind::Disposed,
            Self::Closed => ValueErrorKind::Closed,
            Self::TooLarge { .. } => ValueErrorKind::TooLarge,
            Self::BadArgument { .. } => ValueErrorKind::BadArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind() {
        let io = ValueError::from(std::io::Error::other("disk full"));
        assert_eq!(io.kind(), ValueErrorKind::Io);
        assert_eq!(ValueError::Disposed.kind(), ValueErrorKind::Disposed);
        assert_eq!(
            ValueError::BadArgument {
                start: 3,
                length: 2,
                available: 4
            }
            .kind(),
            ValueErrorKind::BadArgument
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            ValueError::BadArgument {
                start: 3,
                length: 2,
                available: 4
            }
            .to_string(),
            "invalid region 3+2 of a 4 character buffer"
        );
    }
}
