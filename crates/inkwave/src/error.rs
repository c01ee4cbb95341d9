use std::{error, fmt, io};

/// An error that occurred while re-encoding a file.
#[derive(Debug)]
pub struct Error {
    inner: ErrorInner,
}

#[derive(Debug)]
enum ErrorInner {
    Io(io::Error),
    Write(wbf::write::Error),
    Format(String),
}

/// The kind of error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested output format is not supported.
    UnsupportedFormat,
    /// A validation error occurred while writing the file.
    Write,
    /// An I/O error occurred while writing the file.
    Io(io::ErrorKind),
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ErrorInner::Io(e) => e.fmt(f),
            ErrorInner::Write(e) => e.fmt(f),
            ErrorInner::Format(name) => write!(f, "Unsupported output format '{}'", name),
        }
    }
}

impl error::Error for Error {}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        match &self.inner {
            ErrorInner::Io(e) => ErrorKind::Io(e.kind()),
            ErrorInner::Write(_) => ErrorKind::Write,
            ErrorInner::Format(_) => ErrorKind::UnsupportedFormat,
        }
    }

    pub(crate) fn io(error: io::Error) -> Self {
        Self {
            inner: ErrorInner::Io(error),
        }
    }

    pub(crate) fn write(error: wbf::write::Error) -> Self {
        Self {
            inner: ErrorInner::Write(error),
        }
    }

    pub(crate) fn format(name: impl Into<String>) -> Self {
        Self {
            inner: ErrorInner::Format(name.into()),
        }
    }
}

/// The `Result` type for this library.
pub type Result<T> = std::result::Result<T, Error>;
