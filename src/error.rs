use thiserror::Error;

/// Errors raised while converting an order export.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML, or its root element is missing or misnamed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A numeric, boolean or timestamp field holds text that cannot be converted.
    #[error("cannot convert {value:?} at {path} to {target}")]
    TypeConversion {
        path: String,
        value: String,
        target: &'static str,
    },

    /// The document could not be converted to or from JSON.
    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<minidom::Error> for Error {
    fn from(err: minidom::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
