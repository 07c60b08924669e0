use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// The source model is neither a classifier nor a regressor.
    UnsupportedModelType(String),
    /// An activation identifier with no ncnn mapping.
    UnsupportedActivation(String),
    /// Model matrices disagree with the declared layer sizes.
    InvalidShape(String),
    /// A serialized model could not be parsed or failed validation.
    InvalidData(String),
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedModelType(msg) => write!(f, "unsupported model type: {msg}"),
            Error::UnsupportedActivation(msg) => write!(f, "unsupported activation: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
